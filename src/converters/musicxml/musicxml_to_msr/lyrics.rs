//! Syllable alignment: one syllable per note and stanza
//!
//! A note with `<lyric>` elements gets sung syllables. Every other stanza of
//! the voice gets a melisma syllable while an extend line is running, and a
//! skip otherwise, so that stanzas stay aligned with the notes.

use super::registry::VoiceKey;
use crate::diagnostics::Reporter;
use crate::msr::lyrics::{ExtendKind, Syllable, SyllableKind};
use crate::msr::note::Note;
use crate::msr::voice::Voice;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A `<lyric>` element as read from the document
#[derive(Debug, Clone, PartialEq)]
pub struct LyricBuild {
    pub stanza_number: String,
    pub syllabic: Option<SyllableKind>,
    pub texts: Vec<String>,
    pub extend: Option<ExtendKind>,
    /// `<humming/>` or `<laughing/>`
    pub wordless: bool,
    pub input_line: usize,
}

impl LyricBuild {
    pub fn new(stanza_number: &str, input_line: usize) -> Self {
        Self {
            stanza_number: stanza_number.to_string(),
            syllabic: None,
            texts: Vec::new(),
            extend: None,
            wordless: false,
            input_line,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct StanzaState {
    melisma: bool,
    last_had_lyric: bool,
}

impl StanzaState {
    fn melisma_kind(self) -> SyllableKind {
        if self.last_had_lyric {
            SyllableKind::MelismaFirst
        } else {
            SyllableKind::MelismaOther
        }
    }
}

#[derive(Debug, Default)]
pub struct LyricsAligner {
    voices: HashMap<VoiceKey, BTreeMap<String, StanzaState>>,
}

impl LyricsAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.voices.clear();
    }

    /// Emit the syllables for a new note that is not a chord member
    pub fn align(
        &mut self,
        key: VoiceKey,
        voice: &mut Voice,
        note: &mut Note,
        lyrics: Vec<LyricBuild>,
        reporter: &mut dyn Reporter,
    ) {
        let states = self.voices.entry(key).or_default();
        let whole_notes = note.sounding_whole_notes;
        let is_rest = note.is_rest();
        let mut given = BTreeSet::new();

        for lyric in lyrics {
            let number = lyric.stanza_number.clone();
            let state = states.entry(number.clone()).or_default();

            let kind = if is_rest {
                SyllableKind::Rest
            } else if lyric.wordless {
                SyllableKind::Skip
            } else if lyric.texts.is_empty() && lyric.extend.is_some() {
                state.melisma_kind()
            } else {
                match lyric.syllabic {
                    Some(kind) => kind,
                    None => {
                        reporter.report_warning(
                            lyric.input_line,
                            &format!("<lyric> without <syllabic> on note {}, using single", note),
                        );
                        SyllableKind::Single
                    }
                }
            };

            let mut syllable = Syllable::new(kind, &number, whole_notes, lyric.input_line);
            syllable.texts = lyric.texts;
            syllable.extend = lyric.extend;
            syllable.note = Some(note.id);

            state.melisma = !is_rest && lyric.extend.map_or(false, ExtendKind::keeps_melisma);
            state.last_had_lyric = kind.is_sung();

            voice.stanza_mut(&number).syllables.push(syllable.clone());
            note.syllables.push(syllable);
            given.insert(number);
        }

        let others: Vec<String> = voice
            .stanzas
            .keys()
            .filter(|number| !given.contains(*number))
            .cloned()
            .collect();
        for number in others {
            let state = states.entry(number.clone()).or_default();
            let kind = if state.melisma && !is_rest {
                state.melisma_kind()
            } else {
                state.melisma = false;
                SyllableKind::Skip
            };
            state.last_had_lyric = false;

            let mut syllable = Syllable::new(kind, &number, whole_notes, note.input_line);
            syllable.note = Some(note.id);
            voice.stanza_mut(&number).syllables.push(syllable);
        }
    }
}
