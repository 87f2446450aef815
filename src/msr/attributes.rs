//! Clefs, keys, time signatures, transposition and tempo

use super::types::{Alteration, DiatonicStep, NoteType, Placement, Rational};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClefSign {
    G,
    F,
    C,
    Percussion,
    Tab,
    Jianpu,
    None,
}

impl ClefSign {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "G" => Some(ClefSign::G),
            "F" => Some(ClefSign::F),
            "C" => Some(ClefSign::C),
            "percussion" => Some(ClefSign::Percussion),
            "TAB" => Some(ClefSign::Tab),
            "jianpu" => Some(ClefSign::Jianpu),
            "none" => Some(ClefSign::None),
            _ => None,
        }
    }

    /// Staff line the sign sits on when `<line>` is absent
    pub fn default_line(self) -> u8 {
        match self {
            ClefSign::G => 2,
            ClefSign::F => 4,
            ClefSign::C => 3,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clef {
    pub sign: ClefSign,
    pub line: u8,
    /// Octave transposition in [-2, 2]
    pub octave_change: i8,
    pub staff_number: u32,
    pub input_line: usize,
}

impl Clef {
    /// Conventional clef name, e.g. "treble" or "bass_8"
    pub fn name(&self) -> String {
        let base = match (self.sign, self.line) {
            (ClefSign::G, 1) => "french",
            (ClefSign::G, _) => "treble",
            (ClefSign::F, 3) => "varbaritone",
            (ClefSign::F, 5) => "subbass",
            (ClefSign::F, _) => "bass",
            (ClefSign::C, 1) => "soprano",
            (ClefSign::C, 2) => "mezzosoprano",
            (ClefSign::C, 4) => "tenor",
            (ClefSign::C, 5) => "baritone",
            (ClefSign::C, _) => "alto",
            (ClefSign::Percussion, _) => "percussion",
            (ClefSign::Tab, _) => "tab",
            (ClefSign::Jianpu, _) => "jianpu",
            (ClefSign::None, _) => "none",
        };
        match self.octave_change {
            1 => format!("{}^8", base),
            2 => format!("{}^15", base),
            -1 => format!("{}_8", base),
            -2 => format!("{}_15", base),
            _ => base.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyMode {
    Major,
    Minor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    None,
}

impl KeyMode {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "major" => Some(KeyMode::Major),
            "minor" => Some(KeyMode::Minor),
            "ionian" => Some(KeyMode::Ionian),
            "dorian" => Some(KeyMode::Dorian),
            "phrygian" => Some(KeyMode::Phrygian),
            "lydian" => Some(KeyMode::Lydian),
            "mixolydian" => Some(KeyMode::Mixolydian),
            "aeolian" => Some(KeyMode::Aeolian),
            "locrian" => Some(KeyMode::Locrian),
            "none" => Some(KeyMode::None),
            _ => None,
        }
    }
}

/// One step of a non-traditional key, `<key-step>` + `<key-alter>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyItem {
    pub step: DiatonicStep,
    pub alteration: Alteration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    pub fifths: i32,
    pub mode: KeyMode,
    pub cancel: Option<i32>,
    /// Non-empty for non-traditional keys
    pub items: Vec<KeyItem>,
    pub staff_number: Option<u32>,
    pub input_line: usize,
}

impl Key {
    pub fn is_traditional(&self) -> bool {
        self.items.is_empty()
    }

    /// Tonic of a traditional key, e.g. fifths -3 minor is C minor
    pub fn tonic(&self) -> (DiatonicStep, Alteration) {
        use Alteration::{Flat, Natural, Sharp};
        const MAJOR_TONICS: [(DiatonicStep, Alteration); 15] = [
            (DiatonicStep::C, Flat),
            (DiatonicStep::G, Flat),
            (DiatonicStep::D, Flat),
            (DiatonicStep::A, Flat),
            (DiatonicStep::E, Flat),
            (DiatonicStep::B, Flat),
            (DiatonicStep::F, Natural),
            (DiatonicStep::C, Natural),
            (DiatonicStep::G, Natural),
            (DiatonicStep::D, Natural),
            (DiatonicStep::A, Natural),
            (DiatonicStep::E, Natural),
            (DiatonicStep::B, Natural),
            (DiatonicStep::F, Sharp),
            (DiatonicStep::C, Sharp),
        ];
        // modes are read as the major key a few fifths away
        let shift = match self.mode {
            KeyMode::Minor | KeyMode::Aeolian => 3,
            KeyMode::Dorian => 2,
            KeyMode::Phrygian => 4,
            KeyMode::Lydian => -1,
            KeyMode::Mixolydian => 1,
            KeyMode::Locrian => 5,
            _ => 0,
        };
        let index = (self.fifths + shift + 7).clamp(0, 14) as usize;
        MAJOR_TONICS[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeSymbol {
    Common,
    Cut,
    SingleNumber,
    Note,
    DottedNote,
    SenzaMisura,
    None,
}

impl TimeSymbol {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "common" => Some(TimeSymbol::Common),
            "cut" => Some(TimeSymbol::Cut),
            "single-number" => Some(TimeSymbol::SingleNumber),
            "note" => Some(TimeSymbol::Note),
            "dotted-note" => Some(TimeSymbol::DottedNote),
            "normal" => Some(TimeSymbol::None),
            _ => None,
        }
    }
}

/// One `<beats>`/`<beat-type>` pair; `3+2` beats are kept split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeItem {
    pub beats: Vec<u32>,
    pub beat_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Time {
    pub symbol: TimeSymbol,
    pub items: Vec<TimeItem>,
    pub staff_number: Option<u32>,
    pub input_line: usize,
}

impl Time {
    pub fn common() -> Self {
        Self {
            symbol: TimeSymbol::None,
            items: vec![TimeItem {
                beats: vec![4],
                beat_type: 4,
            }],
            staff_number: None,
            input_line: 0,
        }
    }

    /// Full measure length in whole notes, `None` for senza misura
    pub fn measure_whole_notes(&self) -> Option<Rational> {
        if self.symbol == TimeSymbol::SenzaMisura || self.items.is_empty() {
            return None;
        }
        let mut total = Rational::from_integer(0);
        for item in &self.items {
            if item.beat_type == 0 {
                return None;
            }
            let beats: u32 = item.beats.iter().sum();
            total += Rational::new(beats as i32, item.beat_type as i32);
        }
        Some(total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transpose {
    pub diatonic: i32,
    pub chromatic: i32,
    pub octave_change: i32,
    pub double: bool,
    pub input_line: usize,
}

/// Metronome mark or `<sound tempo>` value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tempo {
    pub beat_unit: Option<NoteType>,
    pub beat_unit_dots: u8,
    pub per_minute: Option<String>,
    pub words: Option<String>,
    pub parentheses: bool,
    pub placement: Option<Placement>,
    pub input_line: usize,
}
