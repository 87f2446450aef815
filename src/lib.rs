//! MusicXML to MSR WASM Module
//!
//! Translates partwise MusicXML into the Music Score Representation (MSR):
//! part groups, parts, staves, voices and measures, with chords, tuplets,
//! repeats, lyrics and harmonies resolved.

pub mod api;
pub mod converters;
pub mod diagnostics;
pub mod msr;

// Re-export commonly used types
pub use converters::musicxml::{translate_musicxml, Translation, TranslationError, TranslationSettings};
pub use diagnostics::{Diagnostics, Reporter};
pub use msr::score::Score;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("MusicXML to MSR WASM module initialized");
}
