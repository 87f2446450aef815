//! MusicXML to MSR translator
//!
//! This module turns a partwise MusicXML document into the Music Score
//! Representation (MSR) in one forward pass over the element tree.
//!
//! # Architecture
//!
//! ```text
//! MusicXML String
//!   ↓ [Parse with roxmltree, walker.rs]
//! Element start/end events
//!   ↓ [Translator: builders, pending queues, tuplet stack, chord promotion]
//! Score (part groups → parts → staves → voices → measures)
//! ```
//!
//! Recoverable problems become diagnostics and translation goes on. Only a
//! broken document or a violated structural invariant stops it.
//!
//! # Example
//!
//! ```ignore
//! use musicxml_msr::converters::musicxml::{translate_musicxml, TranslationSettings};
//!
//! let translation = translate_musicxml(xml, &TranslationSettings::default())?;
//! for diagnostic in translation.diagnostics.warnings() {
//!     println!("line {}: {}", diagnostic.line, diagnostic.message);
//! }
//! ```

pub mod arithmetic;
mod attributes;
pub mod barlines;
pub mod chords;
pub mod context;
mod directions;
pub mod element;
pub mod errors;
mod header;
pub mod lyrics;
mod notes;
pub mod part_groups;
pub mod pending;
pub mod registry;
pub mod settings;
pub mod translator;
pub mod tuplets;
pub mod walker;

pub use element::{ElementKind, XmlElement};
pub use errors::{ParseError, Result, TranslationError};
pub use settings::{DecorationKind, OptionsQuery, TranslationSettings};
pub use translator::Translator;
pub use walker::{walk_musicxml, ElementVisitor};

use crate::diagnostics::{Diagnostics, Reporter};
use crate::msr::score::Score;
use serde::Serialize;

/// A translated score and everything reported on the way
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub score: Score,
    pub diagnostics: Diagnostics,
}

/// Translate a MusicXML document with the default diagnostics collector
pub fn translate_musicxml(xml: &str, settings: &TranslationSettings) -> Result<Translation> {
    let mut diagnostics = Diagnostics::new();
    let score = translate_with_reporter(xml, settings, &mut diagnostics)?;
    log::info!(
        "translated {} part(s), {} diagnostic(s)",
        score.parts.len(),
        diagnostics.records.len()
    );
    Ok(Translation { score, diagnostics })
}

/// Translate a MusicXML document, sending diagnostics to `reporter`
pub fn translate_with_reporter(xml: &str, options: &dyn OptionsQuery, reporter: &mut dyn Reporter) -> Result<Score> {
    let mut translator = Translator::new(options, reporter);
    walk_musicxml(xml, &mut translator)?;
    Ok(translator.finish())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
