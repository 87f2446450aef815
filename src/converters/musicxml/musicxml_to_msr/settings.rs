//! Translation settings and the read-only option queries the translator polls

use crate::msr::types::{OctaveEntry, PitchLanguage, PitchNaming};
use serde::{Deserialize, Serialize};

/// Decorations buffered until the next note is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecorationKind {
    Dynamics,
    OtherDynamics,
    Words,
    Slurs,
    Ligatures,
    Wedges,
}

impl DecorationKind {
    pub const ALL: [DecorationKind; 6] = [
        DecorationKind::Dynamics,
        DecorationKind::OtherDynamics,
        DecorationKind::Words,
        DecorationKind::Slurs,
        DecorationKind::Ligatures,
        DecorationKind::Wedges,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DecorationKind::Dynamics => "dynamics",
            DecorationKind::OtherDynamics => "other dynamics",
            DecorationKind::Words => "words",
            DecorationKind::Slurs => "slur",
            DecorationKind::Ligatures => "ligature",
            DecorationKind::Wedges => "wedge",
        }
    }
}

/// Queries answered by whoever owns the options; polled once per translator
pub trait OptionsQuery {
    /// Should a pending decoration skip rests and wait for the next note?
    fn delay_rest_attachment(&self, kind: DecorationKind) -> bool;

    /// Language and octave-entry conventions for pitch names
    fn pitch_naming(&self) -> PitchNaming;
}

/// Settings for a translation, loadable from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Note name language
    pub language: PitchLanguage,

    /// Octave entry mode for the downstream stage
    pub octave_entry: OctaveEntry,

    /// Delay pending dynamics past rests
    pub delay_rests_dynamics: bool,

    /// Delay pending other-dynamics past rests
    pub delay_rests_other_dynamics: bool,

    /// Delay pending words past rests
    pub delay_rests_words: bool,

    /// Delay pending slurs past rests
    pub delay_rests_slurs: bool,

    /// Delay pending ligatures past rests
    pub delay_rests_ligatures: bool,

    /// Delay pending wedges past rests
    pub delay_rests_wedges: bool,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            language: PitchLanguage::Nederlands,
            octave_entry: OctaveEntry::Absolute,
            delay_rests_dynamics: false,
            delay_rests_other_dynamics: false,
            delay_rests_words: false,
            delay_rests_slurs: false,
            delay_rests_ligatures: false,
            delay_rests_wedges: false,
        }
    }
}

impl TranslationSettings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the rest-delay policy for one decoration kind
    pub fn with_rest_delay(mut self, kind: DecorationKind, delay: bool) -> Self {
        match kind {
            DecorationKind::Dynamics => self.delay_rests_dynamics = delay,
            DecorationKind::OtherDynamics => self.delay_rests_other_dynamics = delay,
            DecorationKind::Words => self.delay_rests_words = delay,
            DecorationKind::Slurs => self.delay_rests_slurs = delay,
            DecorationKind::Ligatures => self.delay_rests_ligatures = delay,
            DecorationKind::Wedges => self.delay_rests_wedges = delay,
        }
        self
    }
}

impl OptionsQuery for TranslationSettings {
    fn delay_rest_attachment(&self, kind: DecorationKind) -> bool {
        match kind {
            DecorationKind::Dynamics => self.delay_rests_dynamics,
            DecorationKind::OtherDynamics => self.delay_rests_other_dynamics,
            DecorationKind::Words => self.delay_rests_words,
            DecorationKind::Slurs => self.delay_rests_slurs,
            DecorationKind::Ligatures => self.delay_rests_ligatures,
            DecorationKind::Wedges => self.delay_rests_wedges,
        }
    }

    fn pitch_naming(&self) -> PitchNaming {
        PitchNaming {
            language: self.language,
            octave_entry: self.octave_entry,
        }
    }
}
