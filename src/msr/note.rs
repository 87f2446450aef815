//! Notes and the containers built around them: chords, tuplets, double tremolos

use super::decorations::Decorations;
use super::harmony::{FiguredBass, Harmony};
use super::lyrics::Syllable;
use super::types::{NoteType, Pitch, PitchLanguage, Rational};
use serde::Serialize;
use std::fmt;

/// Document-unique note identity, used by non-owning back-references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NoteId(pub u32);

/// Final placement of a note, assigned once by the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteKind {
    Undetermined,
    Rest,
    Standalone,
    Grace,
    ChordMember,
    TupletMember,
    DoubleTremoloMember,
}

/// What sounds: a pitch, a rest, or an unpitched (percussion) note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteForm {
    Pitched(Pitch),
    Rest {
        /// Whole-measure rest, `<rest measure="yes">`
        measure: bool,
        display: Option<Pitch>,
    },
    Unpitched {
        display: Option<Pitch>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TieKind {
    Start,
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StemDirection {
    Up,
    Down,
    None,
    Double,
}

impl StemDirection {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "up" => Some(StemDirection::Up),
            "down" => Some(StemDirection::Down),
            "none" => Some(StemDirection::None),
            "double" => Some(StemDirection::Double),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteHeadKind {
    Normal,
    Slash,
    Triangle,
    Diamond,
    Square,
    Cross,
    X,
    CircleX,
    InvertedTriangle,
    ArrowDown,
    ArrowUp,
    Slashed,
    BackSlashed,
    Cluster,
    None,
    Do,
    Re,
    Mi,
    Fa,
    So,
    La,
    Ti,
}

impl NoteHeadKind {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "normal" => Some(NoteHeadKind::Normal),
            "slash" => Some(NoteHeadKind::Slash),
            "triangle" => Some(NoteHeadKind::Triangle),
            "diamond" => Some(NoteHeadKind::Diamond),
            "square" => Some(NoteHeadKind::Square),
            "cross" => Some(NoteHeadKind::Cross),
            "x" => Some(NoteHeadKind::X),
            "circle-x" => Some(NoteHeadKind::CircleX),
            "inverted triangle" => Some(NoteHeadKind::InvertedTriangle),
            "arrow down" => Some(NoteHeadKind::ArrowDown),
            "arrow up" => Some(NoteHeadKind::ArrowUp),
            "slashed" => Some(NoteHeadKind::Slashed),
            "back slashed" => Some(NoteHeadKind::BackSlashed),
            "cluster" => Some(NoteHeadKind::Cluster),
            "none" => Some(NoteHeadKind::None),
            "do" => Some(NoteHeadKind::Do),
            "re" => Some(NoteHeadKind::Re),
            "mi" => Some(NoteHeadKind::Mi),
            "fa" => Some(NoteHeadKind::Fa),
            "so" => Some(NoteHeadKind::So),
            "la" => Some(NoteHeadKind::La),
            "ti" => Some(NoteHeadKind::Ti),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteHead {
    pub kind: NoteHeadKind,
    pub filled: Option<bool>,
    pub parentheses: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccidentalKind {
    Sharp,
    Natural,
    Flat,
    DoubleSharp,
    SharpSharp,
    FlatFlat,
    NaturalSharp,
    NaturalFlat,
    QuarterFlat,
    QuarterSharp,
    ThreeQuartersFlat,
    ThreeQuartersSharp,
}

impl AccidentalKind {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "sharp" => Some(AccidentalKind::Sharp),
            "natural" => Some(AccidentalKind::Natural),
            "flat" => Some(AccidentalKind::Flat),
            "double-sharp" => Some(AccidentalKind::DoubleSharp),
            "sharp-sharp" => Some(AccidentalKind::SharpSharp),
            "flat-flat" => Some(AccidentalKind::FlatFlat),
            "natural-sharp" => Some(AccidentalKind::NaturalSharp),
            "natural-flat" => Some(AccidentalKind::NaturalFlat),
            "quarter-flat" => Some(AccidentalKind::QuarterFlat),
            "quarter-sharp" => Some(AccidentalKind::QuarterSharp),
            "three-quarters-flat" => Some(AccidentalKind::ThreeQuartersFlat),
            "three-quarters-sharp" => Some(AccidentalKind::ThreeQuartersSharp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accidental {
    pub kind: AccidentalKind,
    pub cautionary: bool,
    pub editorial: bool,
}

/// Single note event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub kind: NoteKind,
    pub form: NoteForm,
    pub input_line: usize,
    pub measure_number: String,
    pub staff_number: u32,
    pub voice_number: u32,

    pub sounding_whole_notes: Rational,
    pub display_whole_notes: Rational,
    pub dots: u8,
    pub graphic_type: Option<NoteType>,
    pub position_in_measure: Rational,

    pub tie: Option<TieKind>,
    pub grace_slash: bool,
    pub cue: bool,
    pub print_object: bool,
    pub stem: Option<StemDirection>,
    pub head: Option<NoteHead>,
    pub accidental: Option<Accidental>,

    pub decorations: Decorations,
    pub harmony: Option<Harmony>,
    pub figured_bass: Option<FiguredBass>,
    pub syllables: Vec<Syllable>,
}

impl Note {
    pub fn new(id: NoteId, form: NoteForm, input_line: usize) -> Self {
        Self {
            id,
            kind: NoteKind::Undetermined,
            form,
            input_line,
            measure_number: String::new(),
            staff_number: 1,
            voice_number: 1,
            sounding_whole_notes: Rational::from_integer(0),
            display_whole_notes: Rational::from_integer(0),
            dots: 0,
            graphic_type: None,
            position_in_measure: Rational::from_integer(0),
            tie: None,
            grace_slash: false,
            cue: false,
            print_object: true,
            stem: None,
            head: None,
            accidental: None,
            decorations: Decorations::default(),
            harmony: None,
            figured_bass: None,
            syllables: Vec::new(),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.form, NoteForm::Rest { .. })
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self.form {
            NoteForm::Pitched(pitch) => Some(pitch),
            _ => None,
        }
    }

    /// Short human-readable description for diagnostics
    pub fn describe(&self, language: PitchLanguage) -> String {
        let what = match self.form {
            NoteForm::Pitched(pitch) => pitch.name(language),
            NoteForm::Rest { .. } => "r".to_string(),
            NoteForm::Unpitched { .. } => "unpitched".to_string(),
        };
        format!(
            "{} {} (line {}, measure {})",
            what, self.sounding_whole_notes, self.input_line, self.measure_number
        )
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(PitchLanguage::Nederlands))
    }
}

/// Two or more simultaneous notes in one voice, built by promotion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chord {
    pub notes: Vec<Note>,
    pub sounding_whole_notes: Rational,
    pub display_whole_notes: Rational,
    pub position_in_measure: Rational,
    pub tie: Option<TieKind>,
    pub decorations: Decorations,
    pub harmony: Option<Harmony>,
    pub input_line: usize,
}

impl Chord {
    /// Seed a chord from its first note, copying the note's decorations
    pub fn from_first_note(mut note: Note) -> Self {
        note.kind = NoteKind::ChordMember;
        let mut decorations = Decorations::default();
        decorations.absorb(&note.decorations);
        Self {
            sounding_whole_notes: note.sounding_whole_notes,
            display_whole_notes: note.display_whole_notes,
            position_in_measure: note.position_in_measure,
            tie: note.tie,
            harmony: note.harmony.clone(),
            input_line: note.input_line,
            decorations,
            notes: vec![note],
        }
    }

    /// Add a further member, taking over its decorations
    pub fn add_note(&mut self, mut note: Note) {
        note.kind = NoteKind::ChordMember;
        note.position_in_measure = self.position_in_measure;
        self.decorations.absorb(&note.decorations);
        if self.harmony.is_none() {
            self.harmony = note.harmony.clone();
        }
        self.notes.push(note);
    }

    pub fn pitches(&self) -> Vec<Pitch> {
        self.notes.iter().filter_map(|n| n.pitch()).collect()
    }
}

/// Member of a tuplet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TupletMember {
    Note(Note),
    Chord(Chord),
    Tuplet(Tuplet),
}

impl TupletMember {
    pub fn sounding_whole_notes(&self) -> Rational {
        match self {
            TupletMember::Note(note) => note.sounding_whole_notes,
            TupletMember::Chord(chord) => chord.sounding_whole_notes,
            TupletMember::Tuplet(tuplet) => tuplet.sounding_whole_notes(),
        }
    }

    pub fn display_whole_notes(&self) -> Rational {
        match self {
            TupletMember::Note(note) => note.display_whole_notes,
            TupletMember::Chord(chord) => chord.display_whole_notes,
            TupletMember::Tuplet(tuplet) => tuplet.display_whole_notes(),
        }
    }
}

/// Notes scaled by actual/normal, e.g. 3 in the time of 2
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tuplet {
    pub number: u32,
    pub actual_notes: u32,
    pub normal_notes: u32,
    pub position_in_measure: Rational,
    pub bracket: Option<bool>,
    pub show_number: Option<String>,
    /// Started from `<time-modification>` alone, without a `<tuplet>` marker
    pub implicit: bool,
    pub members: Vec<TupletMember>,
    pub input_line: usize,
}

impl Tuplet {
    pub fn new(number: u32, actual_notes: u32, normal_notes: u32, position_in_measure: Rational, input_line: usize) -> Self {
        Self {
            number,
            actual_notes,
            normal_notes,
            position_in_measure,
            bracket: None,
            show_number: None,
            implicit: false,
            members: Vec::new(),
            input_line,
        }
    }

    pub fn sounding_whole_notes(&self) -> Rational {
        self.members
            .iter()
            .fold(Rational::from_integer(0), |acc, m| acc + m.sounding_whole_notes())
    }

    /// Add a note; rests and grace notes keep their kind
    pub fn add_note(&mut self, mut note: Note) {
        if note.kind == NoteKind::Undetermined {
            note.kind = NoteKind::TupletMember;
        }
        self.members.push(TupletMember::Note(note));
    }

    /// Written length of the members, scaled back into the tuplet's context
    pub fn display_whole_notes(&self) -> Rational {
        let total = self
            .members
            .iter()
            .fold(Rational::from_integer(0), |acc, m| acc + m.display_whole_notes());
        total * Rational::new(self.normal_notes.max(1) as i32, self.actual_notes.max(1) as i32)
    }

    pub fn add_chord(&mut self, chord: Chord) {
        self.members.push(TupletMember::Chord(chord));
    }

    pub fn add_tuplet(&mut self, tuplet: Tuplet) {
        self.members.push(TupletMember::Tuplet(tuplet));
    }

    /// Remove the last member if it is a note
    pub fn take_last_note(&mut self) -> Option<Note> {
        match self.members.last() {
            Some(TupletMember::Note(_)) => match self.members.pop() {
                Some(TupletMember::Note(note)) => Some(note),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn last_chord_mut(&mut self) -> Option<&mut Chord> {
        match self.members.last_mut() {
            Some(TupletMember::Chord(chord)) => Some(chord),
            _ => None,
        }
    }

    /// Notes directly owned by this tuplet, chords flattened
    pub fn notes(&self) -> Vec<&Note> {
        let mut notes = Vec::new();
        for member in &self.members {
            match member {
                TupletMember::Note(note) => notes.push(note),
                TupletMember::Chord(chord) => notes.extend(chord.notes.iter()),
                TupletMember::Tuplet(_) => {}
            }
        }
        notes
    }
}

/// One of the two alternating elements of a double tremolo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TremoloElement {
    Note(Note),
    Chord(Chord),
}

impl TremoloElement {
    pub fn sounding_whole_notes(&self) -> Rational {
        match self {
            TremoloElement::Note(note) => note.sounding_whole_notes,
            TremoloElement::Chord(chord) => chord.sounding_whole_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoubleTremolo {
    pub marks: u8,
    pub first: Option<TremoloElement>,
    pub second: Option<TremoloElement>,
    pub position_in_measure: Rational,
    pub input_line: usize,
}

impl DoubleTremolo {
    pub fn new(marks: u8, position_in_measure: Rational, input_line: usize) -> Self {
        Self {
            marks,
            first: None,
            second: None,
            position_in_measure,
            input_line,
        }
    }

    pub fn sounding_whole_notes(&self) -> Rational {
        let zero = Rational::from_integer(0);
        self.first.as_ref().map_or(zero, |e| e.sounding_whole_notes())
            + self.second.as_ref().map_or(zero, |e| e.sounding_whole_notes())
    }
}
