//! MusicXML format converters
//!
//! This module contains the MusicXML to MSR translator.

pub mod musicxml_to_msr;

// Re-export for convenience
pub use musicxml_to_msr::{
    translate_musicxml,
    translate_with_reporter,
    DecorationKind,
    OptionsQuery,
    ParseError,
    Translation,
    TranslationError,
    TranslationSettings,
};
