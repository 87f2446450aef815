//! Format converters
//!
//! This module contains converters from notation formats into MSR.

pub mod musicxml;

// Re-export for convenience
pub use musicxml::{translate_musicxml, Translation, TranslationError, TranslationSettings};
