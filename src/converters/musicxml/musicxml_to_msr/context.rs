//! Values under construction between an element's start and end events
//!
//! Each builder collects the children of one MusicXML construct and is
//! turned into MSR values when the construct's end tag is seen.

use super::lyrics::LyricBuild;
use crate::msr::attributes::{Clef, ClefSign, Key, KeyItem, KeyMode, Tempo, Time, TimeItem, TimeSymbol, Transpose};
use crate::msr::decorations::{Decorations, Dynamics, Ligature, OtherDynamics, Wedge, Words};
use crate::msr::harmony::{DegreeType, Figure, FiguredBass, Harmony, HarmonyDegree, HarmonyKind};
use crate::msr::note::{Accidental, NoteForm, NoteHead, StemDirection, TieKind};
use crate::msr::score::PartGroupSymbol;
use crate::msr::types::{Alteration, DiatonicStep, NoteType, Pitch, Placement, Rational, StartStop};

// ============================================================================
// NOTES
// ============================================================================

/// A `<tuplet>` notation on a note
#[derive(Debug, Clone, PartialEq)]
pub struct TupletMarker {
    pub kind: StartStop,
    pub number: u32,
    pub bracket: Option<bool>,
    pub show_number: Option<String>,
    /// From `<tuplet-actual>` and `<tuplet-normal>`, this tuplet's own ratio
    pub actual: Option<u32>,
    pub normal: Option<u32>,
    pub input_line: usize,
}

/// `<tremolo type="start|stop">`, one half of a double tremolo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleTremoloMarker {
    pub start: bool,
    pub marks: u8,
    pub input_line: usize,
}

#[derive(Debug, Clone)]
pub struct NoteBuild {
    pub input_line: usize,

    pub step: Option<DiatonicStep>,
    pub alteration: Alteration,
    pub octave: Option<i8>,
    pub display_step: Option<DiatonicStep>,
    pub display_octave: Option<i8>,
    pub rest: bool,
    pub measure_rest: bool,
    pub unpitched: bool,

    pub duration: Option<u32>,
    pub note_type: Option<NoteType>,
    pub dots: u8,
    pub actual_notes: Option<u32>,
    pub normal_notes: Option<u32>,

    pub chord: bool,
    pub grace: bool,
    pub grace_slash: bool,
    pub cue: bool,
    pub print_object: bool,
    pub voice: u32,
    pub staff: u32,

    pub tie: Option<TieKind>,
    pub stem: Option<StemDirection>,
    pub head: Option<NoteHead>,
    pub accidental: Option<Accidental>,

    /// Decorations carried by the note itself, not queued ones
    pub decorations: Decorations,
    pub tuplets: Vec<TupletMarker>,
    pub double_tremolo: Option<DoubleTremoloMarker>,
    pub lyrics: Vec<LyricBuild>,
}

impl NoteBuild {
    pub fn new(input_line: usize) -> Self {
        Self {
            input_line,
            step: None,
            alteration: Alteration::Natural,
            octave: None,
            display_step: None,
            display_octave: None,
            rest: false,
            measure_rest: false,
            unpitched: false,
            duration: None,
            note_type: None,
            dots: 0,
            actual_notes: None,
            normal_notes: None,
            chord: false,
            grace: false,
            grace_slash: false,
            cue: false,
            print_object: true,
            voice: 1,
            staff: 1,
            tie: None,
            stem: None,
            head: None,
            accidental: None,
            decorations: Decorations::default(),
            tuplets: Vec::new(),
            double_tremolo: None,
            lyrics: Vec::new(),
        }
    }

    /// (actual, normal) when the note is time-modified
    pub fn time_modification(&self) -> Option<(u32, u32)> {
        match (self.actual_notes, self.normal_notes) {
            (Some(actual), Some(normal)) if actual > 0 && normal > 0 && actual != normal => Some((actual, normal)),
            _ => None,
        }
    }

    fn display_pitch(&self) -> Option<Pitch> {
        let step = self.display_step?;
        Some(Pitch::new(step, Alteration::Natural, self.display_octave.unwrap_or(4)))
    }

    /// What sounds; `None` for a pitched note whose `<step>` is missing
    pub fn form(&self) -> Option<NoteForm> {
        if self.rest {
            return Some(NoteForm::Rest {
                measure: self.measure_rest,
                display: self.display_pitch(),
            });
        }
        if self.unpitched {
            return Some(NoteForm::Unpitched {
                display: self.display_pitch(),
            });
        }
        let step = self.step?;
        Some(NoteForm::Pitched(Pitch::new(
            step,
            self.alteration,
            self.octave.unwrap_or(4),
        )))
    }

    /// Merge a further `<tie>` or `<tied>` into the note's tie
    pub fn add_tie(&mut self, kind: TieKind) {
        self.tie = match (self.tie, kind) {
            (None, kind) => Some(kind),
            (Some(TieKind::Stop), TieKind::Start) | (Some(TieKind::Start), TieKind::Stop) => Some(TieKind::Continue),
            (Some(current), _) => Some(current),
        };
    }
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone)]
pub struct KeyBuild {
    pub fifths: i32,
    pub mode: KeyMode,
    pub cancel: Option<i32>,
    pub steps: Vec<DiatonicStep>,
    pub alters: Vec<Alteration>,
    pub staff_number: Option<u32>,
    pub input_line: usize,
}

impl KeyBuild {
    pub fn new(staff_number: Option<u32>, input_line: usize) -> Self {
        Self {
            fifths: 0,
            mode: KeyMode::Major,
            cancel: None,
            steps: Vec::new(),
            alters: Vec::new(),
            staff_number,
            input_line,
        }
    }

    pub fn build(self) -> Key {
        let items = self
            .steps
            .iter()
            .zip(self.alters.iter().copied().chain(std::iter::repeat(Alteration::Natural)))
            .map(|(step, alteration)| KeyItem {
                step: *step,
                alteration,
            })
            .collect();
        Key {
            fifths: self.fifths,
            mode: self.mode,
            cancel: self.cancel,
            items,
            staff_number: self.staff_number,
            input_line: self.input_line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimeBuild {
    pub symbol: TimeSymbol,
    pub beats: Vec<Vec<u32>>,
    pub beat_types: Vec<u32>,
    pub staff_number: Option<u32>,
    pub input_line: usize,
}

impl TimeBuild {
    pub fn new(symbol: TimeSymbol, staff_number: Option<u32>, input_line: usize) -> Self {
        Self {
            symbol,
            beats: Vec::new(),
            beat_types: Vec::new(),
            staff_number,
            input_line,
        }
    }

    pub fn build(self) -> Time {
        let items = self
            .beats
            .into_iter()
            .zip(self.beat_types)
            .map(|(beats, beat_type)| TimeItem { beats, beat_type })
            .collect();
        Time {
            symbol: self.symbol,
            items,
            staff_number: self.staff_number,
            input_line: self.input_line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClefBuild {
    pub sign: Option<ClefSign>,
    pub line: Option<u8>,
    pub octave_change: i8,
    pub staff_number: u32,
    pub input_line: usize,
}

impl ClefBuild {
    pub fn new(staff_number: u32, input_line: usize) -> Self {
        Self {
            sign: None,
            line: None,
            octave_change: 0,
            staff_number,
            input_line,
        }
    }

    pub fn build(self) -> Clef {
        let sign = self.sign.unwrap_or(ClefSign::G);
        Clef {
            sign,
            line: self.line.unwrap_or_else(|| sign.default_line()),
            octave_change: self.octave_change,
            staff_number: self.staff_number,
            input_line: self.input_line,
        }
    }
}

pub fn empty_transpose(input_line: usize) -> Transpose {
    Transpose {
        diatonic: 0,
        chromatic: 0,
        octave_change: 0,
        double: false,
        input_line,
    }
}

// ============================================================================
// DIRECTIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct DirectionBuild {
    pub placement: Option<Placement>,
    pub staff: u32,
    /// Absent when the direction names no `<voice>`
    pub voice: Option<u32>,
    pub words: Vec<Words>,
    pub dynamics: Vec<Dynamics>,
    pub other_dynamics: Vec<OtherDynamics>,
    pub wedges: Vec<Wedge>,
    pub ligatures: Vec<Ligature>,
    pub tempo: Option<Tempo>,
    /// `<sound tempo="...">`
    pub sound_tempo: Option<String>,
    pub input_line: usize,
}

impl DirectionBuild {
    pub fn new(placement: Option<Placement>, input_line: usize) -> Self {
        Self {
            placement,
            staff: 1,
            voice: None,
            words: Vec::new(),
            dynamics: Vec::new(),
            other_dynamics: Vec::new(),
            wedges: Vec::new(),
            ligatures: Vec::new(),
            tempo: None,
            sound_tempo: None,
            input_line,
        }
    }

    /// The direction's tempo: its metronome mark, else its sound tempo
    pub fn take_tempo(&mut self) -> Option<Tempo> {
        if let Some(tempo) = self.tempo.take() {
            return Some(tempo);
        }
        let per_minute = self.sound_tempo.take()?;
        Some(Tempo {
            beat_unit: Some(NoteType::Quarter),
            beat_unit_dots: 0,
            per_minute: Some(per_minute),
            words: None,
            parentheses: false,
            placement: self.placement,
            input_line: self.input_line,
        })
    }
}

pub fn empty_tempo(parentheses: bool, placement: Option<Placement>, input_line: usize) -> Tempo {
    Tempo {
        beat_unit: None,
        beat_unit_dots: 0,
        per_minute: None,
        words: None,
        parentheses,
        placement,
        input_line,
    }
}

// ============================================================================
// HARMONY AND FIGURED BASS
// ============================================================================

#[derive(Debug, Clone)]
pub struct DegreeBuild {
    pub value: u32,
    pub alteration: Alteration,
    pub degree_type: DegreeType,
}

impl Default for DegreeBuild {
    fn default() -> Self {
        Self {
            value: 0,
            alteration: Alteration::Natural,
            degree_type: DegreeType::Add,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarmonyBuild {
    pub root_step: Option<DiatonicStep>,
    pub root_alteration: Alteration,
    pub kind: HarmonyKind,
    pub kind_text: Option<String>,
    pub inversion: u32,
    pub bass_step: Option<DiatonicStep>,
    pub bass_alteration: Alteration,
    pub degrees: Vec<HarmonyDegree>,
    pub degree: Option<DegreeBuild>,
    pub staff_number: u32,
    pub input_line: usize,
}

impl HarmonyBuild {
    pub fn new(input_line: usize) -> Self {
        Self {
            root_step: None,
            root_alteration: Alteration::Natural,
            kind: HarmonyKind::Major,
            kind_text: None,
            inversion: 0,
            bass_step: None,
            bass_alteration: Alteration::Natural,
            degrees: Vec::new(),
            degree: None,
            staff_number: 1,
            input_line,
        }
    }

    pub fn finish_degree(&mut self) {
        if let Some(degree) = self.degree.take() {
            self.degrees.push(HarmonyDegree {
                value: degree.value,
                alteration: degree.alteration,
                degree_type: degree.degree_type,
            });
        }
    }

    /// `None` when the root step is missing
    pub fn build(self) -> Option<Harmony> {
        Some(Harmony {
            root_step: self.root_step?,
            root_alteration: self.root_alteration,
            kind: self.kind,
            kind_text: self.kind_text,
            inversion: self.inversion,
            bass_step: self.bass_step,
            bass_alteration: self.bass_alteration,
            degrees: self.degrees,
            whole_notes: None,
            staff_number: self.staff_number,
            input_line: self.input_line,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FiguredBassBuild {
    pub figures: Vec<Figure>,
    pub figure: Option<Figure>,
    pub parentheses: bool,
    pub whole_notes: Option<Rational>,
    pub input_line: usize,
}

impl FiguredBassBuild {
    pub fn new(parentheses: bool, input_line: usize) -> Self {
        Self {
            figures: Vec::new(),
            figure: None,
            parentheses,
            whole_notes: None,
            input_line,
        }
    }

    pub fn build(self) -> FiguredBass {
        FiguredBass {
            figures: self.figures,
            parentheses: self.parentheses,
            whole_notes: self.whole_notes,
            input_line: self.input_line,
        }
    }
}

// ============================================================================
// PART LIST, MOTION
// ============================================================================

#[derive(Debug, Clone)]
pub struct GroupBuild {
    pub number: u32,
    pub kind: Option<StartStop>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub symbol: PartGroupSymbol,
    pub display_x: Option<f32>,
    pub barline: bool,
    pub input_line: usize,
}

#[derive(Debug, Clone)]
pub struct ScorePartBuild {
    pub id: String,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub input_line: usize,
}

/// `<backup>` or `<forward>`
#[derive(Debug, Clone)]
pub struct MotionBuild {
    pub duration: u32,
    pub voice: u32,
    pub staff: u32,
    pub input_line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_merging() {
        let mut note = NoteBuild::new(1);
        note.add_tie(TieKind::Stop);
        note.add_tie(TieKind::Start);
        assert_eq!(note.tie, Some(TieKind::Continue));
    }

    #[test]
    fn test_time_modification_needs_a_ratio() {
        let mut note = NoteBuild::new(1);
        note.actual_notes = Some(3);
        assert_eq!(note.time_modification(), None);
        note.normal_notes = Some(2);
        assert_eq!(note.time_modification(), Some((3, 2)));
        note.normal_notes = Some(3);
        assert_eq!(note.time_modification(), None, "3:3 is not a tuplet");
    }

    #[test]
    fn test_key_items_pair_steps_and_alters() {
        let mut key = KeyBuild::new(None, 1);
        key.steps = vec![DiatonicStep::B, DiatonicStep::E];
        key.alters = vec![Alteration::Flat];
        let key = key.build();
        assert!(!key.is_traditional());
        assert_eq!(key.items[1].alteration, Alteration::Natural);
    }
}
