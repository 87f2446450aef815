//! Stanzas and syllables

use super::note::NoteId;
use super::types::Rational;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyllableKind {
    Single,
    Begin,
    Middle,
    End,
    Skip,
    MelismaFirst,
    MelismaOther,
    Rest,
}

impl SyllableKind {
    /// Kind from a `<syllabic>` value
    pub fn from_syllabic(s: &str) -> Option<Self> {
        match s.trim() {
            "single" => Some(SyllableKind::Single),
            "begin" => Some(SyllableKind::Begin),
            "middle" => Some(SyllableKind::Middle),
            "end" => Some(SyllableKind::End),
            _ => None,
        }
    }

    /// Whether the syllable carries sung text
    pub fn is_sung(self) -> bool {
        matches!(
            self,
            SyllableKind::Single | SyllableKind::Begin | SyllableKind::Middle | SyllableKind::End
        )
    }
}

/// State of an `<extend>` line at a syllable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtendKind {
    Standalone,
    Start,
    Continue,
    Stop,
}

impl ExtendKind {
    pub fn from_musicxml(s: Option<&str>) -> Option<Self> {
        match s {
            None => Some(ExtendKind::Standalone),
            Some("start") => Some(ExtendKind::Start),
            Some("continue") => Some(ExtendKind::Continue),
            Some("stop") => Some(ExtendKind::Stop),
            Some(_) => None,
        }
    }

    /// Whether the melisma goes on after this syllable
    pub fn keeps_melisma(self) -> bool {
        !matches!(self, ExtendKind::Stop)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Syllable {
    pub kind: SyllableKind,
    /// Texts joined by elisions
    pub texts: Vec<String>,
    pub stanza_number: String,
    pub extend: Option<ExtendKind>,
    pub whole_notes: Rational,
    /// The note this syllable is sung on, set once that note exists
    pub note: Option<NoteId>,
    pub input_line: usize,
}

impl Syllable {
    pub fn new(kind: SyllableKind, stanza_number: &str, whole_notes: Rational, input_line: usize) -> Self {
        Self {
            kind,
            texts: Vec::new(),
            stanza_number: stanza_number.to_string(),
            extend: None,
            whole_notes,
            note: None,
            input_line,
        }
    }

    pub fn text(&self) -> String {
        self.texts.join("_")
    }
}

/// One numbered verse within a voice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stanza {
    pub number: String,
    pub syllables: Vec<Syllable>,
}

impl Stanza {
    pub fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            syllables: Vec::new(),
        }
    }

    pub fn kinds(&self) -> Vec<SyllableKind> {
        self.syllables.iter().map(|s| s.kind).collect()
    }
}
