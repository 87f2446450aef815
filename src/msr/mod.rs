//! Music Score Representation
//!
//! The semantic score tree built by the MusicXML translator:
//! score → part group → part → staff → voice → measure → musical events.
//! Every type derives `Serialize` so a host can inspect the tree as JSON.

pub mod attributes;
pub mod barline;
pub mod decorations;
pub mod harmony;
pub mod lyrics;
pub mod note;
pub mod score;
pub mod types;
pub mod voice;

pub use attributes::{Clef, ClefSign, Key, KeyMode, Tempo, Time, TimeSymbol, Transpose};
pub use barline::{
    Barline, BarlineCategory, BarlineLocation, BarlineSpec, BarlineStyle, EndingType, RepeatDirection,
};
pub use decorations::Decorations;
pub use harmony::{FiguredBass, Harmony};
pub use lyrics::{ExtendKind, Stanza, Syllable, SyllableKind};
pub use note::{Chord, DoubleTremolo, Note, NoteForm, NoteId, NoteKind, TremoloElement, Tuplet, TupletMember};
pub use score::{Part, PartGroup, PartGroupMember, PartGroupSymbol, PartIndex, Score, Staff};
pub use types::{Alteration, DiatonicStep, NoteType, OctaveEntry, Pitch, PitchLanguage, PitchNaming, Rational};
pub use voice::{Measure, MeasureElement, MeasureKind, Repeat, RepeatEnding, RepeatEndingKind, Segment, Voice, VoiceItem};
