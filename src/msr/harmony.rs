//! Harmony (chord symbols) and figured bass

use super::types::{Alteration, DiatonicStep, Rational};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmonyKind {
    Major,
    Minor,
    Augmented,
    Diminished,
    Dominant,
    MajorSeventh,
    MinorSeventh,
    DiminishedSeventh,
    AugmentedSeventh,
    HalfDiminished,
    MajorMinor,
    MajorSixth,
    MinorSixth,
    DominantNinth,
    MajorNinth,
    MinorNinth,
    Dominant11th,
    Major11th,
    Minor11th,
    Dominant13th,
    Major13th,
    Minor13th,
    SuspendedSecond,
    SuspendedFourth,
    Neapolitan,
    Italian,
    French,
    German,
    Pedal,
    Power,
    Tristan,
    Other,
    None,
}

impl HarmonyKind {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "major" => Some(HarmonyKind::Major),
            "minor" => Some(HarmonyKind::Minor),
            "augmented" => Some(HarmonyKind::Augmented),
            "diminished" => Some(HarmonyKind::Diminished),
            "dominant" => Some(HarmonyKind::Dominant),
            "major-seventh" => Some(HarmonyKind::MajorSeventh),
            "minor-seventh" => Some(HarmonyKind::MinorSeventh),
            "diminished-seventh" => Some(HarmonyKind::DiminishedSeventh),
            "augmented-seventh" => Some(HarmonyKind::AugmentedSeventh),
            "half-diminished" => Some(HarmonyKind::HalfDiminished),
            "major-minor" => Some(HarmonyKind::MajorMinor),
            "major-sixth" => Some(HarmonyKind::MajorSixth),
            "minor-sixth" => Some(HarmonyKind::MinorSixth),
            "dominant-ninth" => Some(HarmonyKind::DominantNinth),
            "major-ninth" => Some(HarmonyKind::MajorNinth),
            "minor-ninth" => Some(HarmonyKind::MinorNinth),
            "dominant-11th" => Some(HarmonyKind::Dominant11th),
            "major-11th" => Some(HarmonyKind::Major11th),
            "minor-11th" => Some(HarmonyKind::Minor11th),
            "dominant-13th" => Some(HarmonyKind::Dominant13th),
            "major-13th" => Some(HarmonyKind::Major13th),
            "minor-13th" => Some(HarmonyKind::Minor13th),
            "suspended-second" => Some(HarmonyKind::SuspendedSecond),
            "suspended-fourth" => Some(HarmonyKind::SuspendedFourth),
            "Neapolitan" => Some(HarmonyKind::Neapolitan),
            "Italian" => Some(HarmonyKind::Italian),
            "French" => Some(HarmonyKind::French),
            "German" => Some(HarmonyKind::German),
            "pedal" => Some(HarmonyKind::Pedal),
            "power" => Some(HarmonyKind::Power),
            "Tristan" => Some(HarmonyKind::Tristan),
            "other" => Some(HarmonyKind::Other),
            "none" => Some(HarmonyKind::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DegreeType {
    Add,
    Alter,
    Subtract,
}

impl DegreeType {
    pub fn from_musicxml(s: &str) -> Option<Self> {
        match s.trim() {
            "add" => Some(DegreeType::Add),
            "alter" => Some(DegreeType::Alter),
            "subtract" => Some(DegreeType::Subtract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HarmonyDegree {
    pub value: u32,
    pub alteration: Alteration,
    pub degree_type: DegreeType,
}

/// A chord symbol, attached to the note that follows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Harmony {
    pub root_step: DiatonicStep,
    pub root_alteration: Alteration,
    pub kind: HarmonyKind,
    pub kind_text: Option<String>,
    pub inversion: u32,
    pub bass_step: Option<DiatonicStep>,
    pub bass_alteration: Alteration,
    pub degrees: Vec<HarmonyDegree>,
    /// `None` until resolved from `<duration>` or from the following note
    pub whole_notes: Option<Rational>,
    pub staff_number: u32,
    pub input_line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Figure {
    pub prefix: Option<String>,
    pub number: Option<u32>,
    pub suffix: Option<String>,
}

/// Figured bass annotation, attached to the note that follows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiguredBass {
    pub figures: Vec<Figure>,
    pub parentheses: bool,
    pub whole_notes: Option<Rational>,
    pub input_line: usize,
}
