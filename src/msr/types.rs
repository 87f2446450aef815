//! Value types shared across the MSR tree
//!
//! Pitches, alterations, note types and the naming conventions the downstream
//! stage uses to spell them. Durations are whole-note rationals throughout:
//! a quarter note is `1/4`, a dotted half `3/4`.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

/// Whole-note durations and positions
pub type Rational = Rational32;

// ============================================================================
// PITCH NAMING CONVENTIONS
// ============================================================================

/// Note naming language for pitch names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchLanguage {
    /// Dutch: c d e f g a b (cis/ces for sharps/flats) - LilyPond default
    Nederlands,

    /// English: c d e f g a b (cs/cf for sharps/flats)
    English,

    /// German: c d e f g a h (cis/ces for sharps/flats)
    Deutsch,

    /// Italian: do re mi fa sol la si (dod/dob for sharps/flats)
    Italiano,
}

impl Default for PitchLanguage {
    fn default() -> Self {
        PitchLanguage::Nederlands
    }
}

/// How octaves are entered downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OctaveEntry {
    #[default]
    Absolute,
    Relative,
    Fixed,
}

/// Pitch naming conventions recorded on the score for the next stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PitchNaming {
    pub language: PitchLanguage,
    pub octave_entry: OctaveEntry,
}

// ============================================================================
// PITCH
// ============================================================================

/// Diatonic step, C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiatonicStep {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl DiatonicStep {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "C" => Some(DiatonicStep::C),
            "D" => Some(DiatonicStep::D),
            "E" => Some(DiatonicStep::E),
            "F" => Some(DiatonicStep::F),
            "G" => Some(DiatonicStep::G),
            "A" => Some(DiatonicStep::A),
            "B" => Some(DiatonicStep::B),
            _ => None,
        }
    }

    /// Semitones above C in the same octave
    pub fn semitones(self) -> i32 {
        match self {
            DiatonicStep::C => 0,
            DiatonicStep::D => 2,
            DiatonicStep::E => 4,
            DiatonicStep::F => 5,
            DiatonicStep::G => 7,
            DiatonicStep::A => 9,
            DiatonicStep::B => 11,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Alteration in quarter-tone steps, double flat to double sharp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Alteration {
    DoubleFlat,
    ThreeQuartersFlat,
    Flat,
    SemiFlat,
    Natural,
    SemiSharp,
    Sharp,
    ThreeQuartersSharp,
    DoubleSharp,
}

impl Alteration {
    /// Exact mapping of a MusicXML `<alter>` value (in semitones)
    pub fn from_semitones(semitones: f32) -> Option<Self> {
        let quarter_tones = semitones * 2.0;
        if (quarter_tones - quarter_tones.round()).abs() > f32::EPSILON {
            return None;
        }
        Self::from_quarter_tones(quarter_tones.round() as i32)
    }

    pub fn from_quarter_tones(quarter_tones: i32) -> Option<Self> {
        match quarter_tones {
            -4 => Some(Alteration::DoubleFlat),
            -3 => Some(Alteration::ThreeQuartersFlat),
            -2 => Some(Alteration::Flat),
            -1 => Some(Alteration::SemiFlat),
            0 => Some(Alteration::Natural),
            1 => Some(Alteration::SemiSharp),
            2 => Some(Alteration::Sharp),
            3 => Some(Alteration::ThreeQuartersSharp),
            4 => Some(Alteration::DoubleSharp),
            _ => None,
        }
    }

    pub fn quarter_tones(self) -> i32 {
        match self {
            Alteration::DoubleFlat => -4,
            Alteration::ThreeQuartersFlat => -3,
            Alteration::Flat => -2,
            Alteration::SemiFlat => -1,
            Alteration::Natural => 0,
            Alteration::SemiSharp => 1,
            Alteration::Sharp => 2,
            Alteration::ThreeQuartersSharp => 3,
            Alteration::DoubleSharp => 4,
        }
    }
}

/// Musical pitch: step, alteration and octave (4 = middle C octave)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pitch {
    pub step: DiatonicStep,
    pub alteration: Alteration,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: DiatonicStep, alteration: Alteration, octave: i8) -> Self {
        Self {
            step,
            alteration,
            octave,
        }
    }

    /// Quarter tones above C0
    pub fn quarter_tones(&self) -> i32 {
        self.octave as i32 * 24 + self.step.semitones() * 2 + self.alteration.quarter_tones()
    }

    /// Pitch name with absolute octave marks (c' is middle C)
    pub fn name(&self, language: PitchLanguage) -> String {
        format!("{}{}", self.note_name(language), octave_marks(self.octave))
    }

    /// Pitch name without octave marks
    pub fn note_name(&self, language: PitchLanguage) -> String {
        let (bases, suffixes): (&[&str; 7], [&str; 9]) = match language {
            PitchLanguage::Nederlands => (
                &["c", "d", "e", "f", "g", "a", "b"],
                ["eses", "eseh", "es", "eh", "", "ih", "is", "isih", "isis"],
            ),
            PitchLanguage::English => (
                &["c", "d", "e", "f", "g", "a", "b"],
                ["ff", "tqf", "f", "qf", "", "qs", "s", "tqs", "ss"],
            ),
            PitchLanguage::Deutsch => (
                &["c", "d", "e", "f", "g", "a", "h"],
                ["eses", "eseh", "es", "eh", "", "ih", "is", "isih", "isis"],
            ),
            PitchLanguage::Italiano => (
                &["do", "re", "mi", "fa", "sol", "la", "si"],
                ["bb", "bsb", "b", "sb", "", "sd", "d", "dsd", "dd"],
            ),
        };
        let suffix = suffixes[(self.alteration.quarter_tones() + 4) as usize];
        format!("{}{}", bases[self.step.index()], suffix)
    }
}

/// LilyPond-style absolute octave marks: c' is octave 4, c is octave 3
pub fn octave_marks(octave: i8) -> String {
    if octave >= 4 {
        "'".repeat((octave - 3) as usize)
    } else {
        ",".repeat((3 - octave as i32).max(0) as usize)
    }
}

// ============================================================================
// NOTE TYPES
// ============================================================================

/// Graphic note type, from `<type>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteType {
    Maxima,
    Long,
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    N16th,
    N32nd,
    N64th,
    N128th,
    N256th,
    N512th,
    N1024th,
}

impl NoteType {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "maxima" => Some(NoteType::Maxima),
            "long" => Some(NoteType::Long),
            "breve" => Some(NoteType::Breve),
            "whole" => Some(NoteType::Whole),
            "half" => Some(NoteType::Half),
            "quarter" => Some(NoteType::Quarter),
            "eighth" => Some(NoteType::Eighth),
            "16th" => Some(NoteType::N16th),
            "32nd" => Some(NoteType::N32nd),
            "64th" => Some(NoteType::N64th),
            "128th" => Some(NoteType::N128th),
            "256th" => Some(NoteType::N256th),
            "512th" => Some(NoteType::N512th),
            "1024th" => Some(NoteType::N1024th),
            _ => None,
        }
    }

    /// Duration of the undotted type in whole notes
    pub fn whole_notes(self) -> Rational {
        match self {
            NoteType::Maxima => Rational::from_integer(8),
            NoteType::Long => Rational::from_integer(4),
            NoteType::Breve => Rational::from_integer(2),
            other => Rational::new(1, 1 << (other as i32 - NoteType::Whole as i32)),
        }
    }

    /// Inverse of `whole_notes`, for exact powers of two only
    pub fn from_whole_notes(value: Rational) -> Option<Self> {
        const ALL: [NoteType; 14] = [
            NoteType::Maxima,
            NoteType::Long,
            NoteType::Breve,
            NoteType::Whole,
            NoteType::Half,
            NoteType::Quarter,
            NoteType::Eighth,
            NoteType::N16th,
            NoteType::N32nd,
            NoteType::N64th,
            NoteType::N128th,
            NoteType::N256th,
            NoteType::N512th,
            NoteType::N1024th,
        ];
        ALL.iter().copied().find(|t| t.whole_notes() == value)
    }
}

/// Placement above or below the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    Above,
    Below,
}

impl Placement {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "above" => Some(Placement::Above),
            "below" => Some(Placement::Below),
            _ => None,
        }
    }
}

/// Generic start/continue/stop marker used by slurs, ligatures, ties, extends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartStop {
    Start,
    Continue,
    Stop,
}

impl StartStop {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s {
            "start" => Some(StartStop::Start),
            "continue" => Some(StartStop::Continue),
            "stop" => Some(StartStop::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_names_by_language() {
        let c_sharp = Pitch::new(DiatonicStep::C, Alteration::Sharp, 4);
        assert_eq!(c_sharp.name(PitchLanguage::Nederlands), "cis'");
        assert_eq!(c_sharp.name(PitchLanguage::English), "cs'");
        assert_eq!(c_sharp.name(PitchLanguage::Italiano), "dod'");

        let b_flat = Pitch::new(DiatonicStep::B, Alteration::Flat, 3);
        assert_eq!(b_flat.name(PitchLanguage::Deutsch), "hes");
    }

    #[test]
    fn test_quarter_tone_names() {
        let pitch = Pitch::new(DiatonicStep::C, Alteration::SemiFlat, 4);
        assert_eq!(pitch.name(PitchLanguage::English), "cqf'");
        assert_eq!(pitch.name(PitchLanguage::Nederlands), "ceh'");

        let pitch = Pitch::new(DiatonicStep::D, Alteration::ThreeQuartersSharp, 2);
        assert_eq!(pitch.name(PitchLanguage::English), "dtqs,");
    }

    #[test]
    fn test_quarter_tones_from_c0() {
        let middle_c = Pitch::new(DiatonicStep::C, Alteration::Natural, 4);
        assert_eq!(middle_c.quarter_tones(), 96);

        let c_sharp = Pitch::new(DiatonicStep::C, Alteration::Sharp, 4);
        let d_flat = Pitch::new(DiatonicStep::D, Alteration::Flat, 4);
        assert_eq!(c_sharp.quarter_tones(), d_flat.quarter_tones());
    }

    #[test]
    fn test_note_type_whole_notes() {
        assert_eq!(NoteType::Quarter.whole_notes(), Rational::new(1, 4));
        assert_eq!(NoteType::N16th.whole_notes(), Rational::new(1, 16));
        assert_eq!(NoteType::Breve.whole_notes(), Rational::from_integer(2));
        assert_eq!(
            NoteType::from_whole_notes(Rational::new(1, 8)),
            Some(NoteType::Eighth)
        );
        assert_eq!(NoteType::from_whole_notes(Rational::new(3, 8)), None);
    }

    #[test]
    fn test_alteration_from_semitones() {
        assert_eq!(Alteration::from_semitones(-0.5), Some(Alteration::SemiFlat));
        assert_eq!(Alteration::from_semitones(1.0), Some(Alteration::Sharp));
        assert_eq!(Alteration::from_semitones(0.3), None);
        assert_eq!(Alteration::from_semitones(3.0), None);
    }
}
