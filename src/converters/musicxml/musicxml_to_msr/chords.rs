//! Retroactive chord promotion
//!
//! Only the second and later notes of a chord carry `<chord/>`. By the time
//! the marker is seen, the first note already sits in its voice, tuplet or
//! double tremolo. Promotion takes it out and puts a chord in its place.

use super::errors::{Result, TranslationError};
use super::registry::VoiceKey;
use super::tuplets::TupletStack;
use crate::msr::note::{Chord, DoubleTremolo, Note, TremoloElement};
use crate::msr::voice::{MeasureElement, Voice};
use std::collections::HashMap;

/// Where the last non-chord note of a voice was put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePlacement {
    Voice,
    Tuplet,
    /// First slot of the double tremolo still being built
    DoubleTremoloFirst,
    /// Second slot of the double tremolo last appended to the voice
    DoubleTremoloSecond,
}

#[derive(Debug, Default)]
pub struct ChordBuilder {
    last_placement: HashMap<VoiceKey, NotePlacement>,
    ongoing: Option<VoiceKey>,
}

/// Containers a chord note may have to reach into
pub struct ChordTargets<'a> {
    pub voice: &'a mut Voice,
    pub tuplets: &'a mut TupletStack,
    pub tremolo: Option<&'a mut DoubleTremolo>,
}

impl ChordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_placed(&mut self, voice: VoiceKey, placement: NotePlacement) {
        self.last_placement.insert(voice, placement);
    }

    pub fn placement(&self, voice: VoiceKey) -> Option<NotePlacement> {
        self.last_placement.get(&voice).copied()
    }

    pub fn is_ongoing(&self) -> bool {
        self.ongoing.is_some()
    }

    /// A note without the chord marker, a backup or a measure end
    pub fn end(&mut self) {
        self.ongoing = None;
    }

    /// Forget placements at the end of a part
    pub fn reset(&mut self) {
        self.ongoing = None;
        self.last_placement.clear();
    }

    /// Add a note carrying `<chord/>`, promoting the previous note on the
    /// first one
    pub fn add_chord_note(&mut self, key: VoiceKey, note: Note, mut targets: ChordTargets<'_>) -> Result<()> {
        let line = note.input_line;
        let Some(placement) = self.placement(key) else {
            return Err(TranslationError::internal(
                line,
                format!("chord note {} has no previous note in voice {}", note, key.voice),
            ));
        };

        if self.ongoing != Some(key) {
            log::debug!("promoting the note before line {} to a chord ({:?})", line, placement);
            let first = take_first_note(placement, targets.voice, targets.tuplets, targets.tremolo.as_deref_mut())
                .ok_or_else(|| {
                    TranslationError::internal(line, "the chord's first note is missing from its voice")
                })?;
            let mut chord = Chord::from_first_note(first);
            chord.add_note(note);
            put_chord(placement, chord, targets.voice, targets.tuplets, targets.tremolo)
                .map_err(|_| TranslationError::internal(line, "no place to put the promoted chord"))?;
            self.ongoing = Some(key);
            return Ok(());
        }

        let chord = existing_chord(placement, targets.voice, targets.tuplets, targets.tremolo)
            .ok_or_else(|| TranslationError::internal(line, "chord being built has disappeared"))?;
        chord.add_note(note);
        Ok(())
    }
}

fn take_first_note(
    placement: NotePlacement,
    voice: &mut Voice,
    tuplets: &mut TupletStack,
    tremolo: Option<&mut DoubleTremolo>,
) -> Option<Note> {
    match placement {
        NotePlacement::Voice => voice.take_last_note(),
        NotePlacement::Tuplet => tuplets.top_mut()?.take_last_note(),
        NotePlacement::DoubleTremoloFirst => take_tremolo_note(&mut tremolo?.first),
        NotePlacement::DoubleTremoloSecond => match voice.last_element_mut()? {
            MeasureElement::DoubleTremolo(tremolo) => take_tremolo_note(&mut tremolo.second),
            _ => None,
        },
    }
}

fn take_tremolo_note(slot: &mut Option<TremoloElement>) -> Option<Note> {
    match slot.take() {
        Some(TremoloElement::Note(note)) => Some(note),
        other => {
            *slot = other;
            None
        }
    }
}

fn put_chord(
    placement: NotePlacement,
    chord: Chord,
    voice: &mut Voice,
    tuplets: &mut TupletStack,
    tremolo: Option<&mut DoubleTremolo>,
) -> std::result::Result<(), Chord> {
    match placement {
        NotePlacement::Voice => {
            voice.append(MeasureElement::Chord(chord));
            Ok(())
        }
        NotePlacement::Tuplet => match tuplets.top_mut() {
            Some(top) => {
                top.add_chord(chord);
                Ok(())
            }
            None => Err(chord),
        },
        NotePlacement::DoubleTremoloFirst => match tremolo {
            Some(tremolo) => {
                tremolo.first = Some(TremoloElement::Chord(chord));
                Ok(())
            }
            None => Err(chord),
        },
        NotePlacement::DoubleTremoloSecond => match voice.last_element_mut() {
            Some(MeasureElement::DoubleTremolo(tremolo)) => {
                tremolo.second = Some(TremoloElement::Chord(chord));
                Ok(())
            }
            _ => Err(chord),
        },
    }
}

fn existing_chord<'a>(
    placement: NotePlacement,
    voice: &'a mut Voice,
    tuplets: &'a mut TupletStack,
    tremolo: Option<&'a mut DoubleTremolo>,
) -> Option<&'a mut Chord> {
    match placement {
        NotePlacement::Voice => match voice.last_element_mut()? {
            MeasureElement::Chord(chord) => Some(chord),
            _ => None,
        },
        NotePlacement::Tuplet => tuplets.top_mut()?.last_chord_mut(),
        NotePlacement::DoubleTremoloFirst => match tremolo?.first.as_mut()? {
            TremoloElement::Chord(chord) => Some(chord),
            _ => None,
        },
        NotePlacement::DoubleTremoloSecond => match voice.last_element_mut()? {
            MeasureElement::DoubleTremolo(tremolo) => match tremolo.second.as_mut()? {
                TremoloElement::Chord(chord) => Some(chord),
                _ => None,
            },
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msr::note::{NoteForm, NoteId, NoteKind, Tuplet, TupletMember};
    use crate::msr::types::{Alteration, DiatonicStep, Pitch, Rational};

    const KEY: VoiceKey = VoiceKey { part: 0, voice: 1 };

    fn note(id: u32, step: DiatonicStep) -> Note {
        let mut note = Note::new(
            NoteId(id),
            NoteForm::Pitched(Pitch::new(step, Alteration::Natural, 4)),
            id as usize,
        );
        note.sounding_whole_notes = Rational::new(1, 4);
        note.display_whole_notes = Rational::new(1, 4);
        note
    }

    #[test]
    fn test_promotion_in_voice() {
        let mut voice = Voice::new(1, 1);
        voice.create_measure("1", 1);
        let mut tuplets = TupletStack::new();
        let mut builder = ChordBuilder::new();

        let mut first = note(1, DiatonicStep::C);
        first.kind = NoteKind::Standalone;
        voice.append(MeasureElement::Note(first));
        builder.note_placed(KEY, NotePlacement::Voice);

        for (id, step) in [(2, DiatonicStep::E), (3, DiatonicStep::G)] {
            builder
                .add_chord_note(
                    KEY,
                    note(id, step),
                    ChordTargets {
                        voice: &mut voice,
                        tuplets: &mut tuplets,
                        tremolo: None,
                    },
                )
                .expect("chord note");
        }

        let measure = voice.current_measure().expect("measure");
        assert_eq!(measure.elements.len(), 1);
        match &measure.elements[0] {
            MeasureElement::Chord(chord) => {
                let ids: Vec<u32> = chord.notes.iter().map(|n| n.id.0).collect();
                assert_eq!(ids, vec![1, 2, 3]);
                assert!(chord.notes.iter().all(|n| n.kind == NoteKind::ChordMember));
            }
            other => panic!("expected a chord, got {:?}", other),
        }
    }

    #[test]
    fn test_promotion_in_tuplet() {
        let mut voice = Voice::new(1, 1);
        let mut tuplets = TupletStack::new();
        let mut builder = ChordBuilder::new();
        tuplets.push(Tuplet::new(1, 3, 2, Rational::from_integer(0), 1), KEY);
        tuplets.add_note(note(1, DiatonicStep::C)).expect("member");
        tuplets.add_note(note(2, DiatonicStep::D)).expect("member");
        builder.note_placed(KEY, NotePlacement::Tuplet);

        builder
            .add_chord_note(
                KEY,
                note(3, DiatonicStep::F),
                ChordTargets {
                    voice: &mut voice,
                    tuplets: &mut tuplets,
                    tremolo: None,
                },
            )
            .expect("chord note");

        let top = tuplets.top_mut().expect("open tuplet");
        assert_eq!(top.members.len(), 2);
        assert!(matches!(top.members[0], TupletMember::Note(_)));
        assert!(matches!(&top.members[1], TupletMember::Chord(c) if c.notes.len() == 2 && c.notes[0].id == NoteId(2)));
    }

    #[test]
    fn test_chord_without_previous_note_is_fatal() {
        let mut voice = Voice::new(1, 1);
        let mut tuplets = TupletStack::new();
        let mut builder = ChordBuilder::new();
        let result = builder.add_chord_note(
            KEY,
            note(1, DiatonicStep::C),
            ChordTargets {
                voice: &mut voice,
                tuplets: &mut tuplets,
                tremolo: None,
            },
        );
        assert!(result.is_err());
    }
}
