//! `<note>` and everything inside it
//!
//! Children are collected into a `NoteBuild`. At `</note>` the note is
//! timed, decorated and placed: into a chord, a tuplet, a double tremolo or
//! directly into its voice.

use super::arithmetic::{
    display_whole_notes, implied_sounding_whole_notes, nested_tuplet_ratio, parse_alteration, tuplet_factor,
    whole_notes_to_type,
};
use super::chords::{ChordTargets, NotePlacement};
use super::context::{DoubleTremoloMarker, NoteBuild, TupletMarker};
use super::element::{ElementKind as K, XmlElement};
use super::errors::Result;
use super::lyrics::LyricBuild;
use super::registry::{self, VoiceKey};
use super::translator::Translator;
use crate::msr::decorations::{
    Articulation, ArticulationKind, Beam, BeamKind, Dynamics, Ornament, SingleTremolo, Slur, Technical,
};
use crate::msr::lyrics::{ExtendKind, SyllableKind};
use crate::msr::note::{
    Accidental, AccidentalKind, DoubleTremolo, Note, NoteForm, NoteHead, NoteHeadKind, NoteKind, StemDirection, TieKind,
    TremoloElement, Tuplet,
};
use crate::msr::types::{DiatonicStep, NoteType, Pitch, Placement, Rational, StartStop};
use crate::msr::voice::MeasureElement;
use std::mem;

fn yes(element: &XmlElement, name: &str) -> bool {
    element.attribute(name) == Some("yes")
}

fn yes_no(element: &XmlElement, name: &str) -> Option<bool> {
    match element.attribute(name)? {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

impl Translator<'_> {
    pub(super) fn start_note(&mut self, element: &XmlElement) {
        let mut note = NoteBuild::new(element.line);
        note.print_object = element.attribute("print-object") != Some("no");
        self.note = Some(note);
    }

    pub(super) fn note_child(&mut self, element: &XmlElement) {
        let Some(mut note) = self.note.take() else {
            return;
        };
        self.read_note_child(&mut note, element);
        self.note = Some(note);
    }

    fn read_note_child(&mut self, note: &mut NoteBuild, element: &XmlElement) {
        let placement = self.attribute_enum(element, "placement", Placement::from_musicxml);
        match element.kind {
            K::Chord => note.chord = true,
            K::Grace => {
                note.grace = true;
                note.grace_slash = yes(element, "slash");
            }
            K::Cue => note.cue = true,
            K::Rest => {
                note.rest = true;
                note.measure_rest = yes(element, "measure");
            }
            K::Unpitched => note.unpitched = true,
            K::Step => note.step = self.text_enum(element, DiatonicStep::from_musicxml),
            K::Alter => {
                note.alteration = match parse_alteration(element.text()) {
                    Ok(alteration) => alteration,
                    Err(closest) => {
                        self.reporter.report_error(
                            element.line,
                            &format!("<alter> value \"{}\" is out of range, using {:?}", element.text(), closest),
                        );
                        closest
                    }
                }
            }
            K::Octave => note.octave = self.number(element),
            K::DisplayStep => note.display_step = self.text_enum(element, DiatonicStep::from_musicxml),
            K::DisplayOctave => note.display_octave = self.number(element),

            K::Duration => note.duration = self.number(element),
            K::Type if self.parent() == Some(K::Note) => {
                note.note_type = self.text_enum(element, NoteType::from_musicxml)
            }
            K::Dot => note.dots = note.dots.saturating_add(1),
            K::ActualNotes => note.actual_notes = self.number(element),
            K::NormalNotes => note.normal_notes = self.number(element),
            K::Voice => note.voice = self.number(element).unwrap_or(1),
            K::Staff => note.staff = self.number(element).unwrap_or(1),

            K::Tie | K::Tied => {
                let kind = match element.attribute("type") {
                    Some("start") => Some(TieKind::Start),
                    Some("continue") => Some(TieKind::Continue),
                    Some("stop") => Some(TieKind::Stop),
                    _ => None,
                };
                if let Some(kind) = kind {
                    note.add_tie(kind);
                }
            }
            K::Accidental => {
                if let Some(kind) = self.text_enum(element, AccidentalKind::from_musicxml) {
                    note.accidental = Some(Accidental {
                        kind,
                        cautionary: yes(element, "cautionary"),
                        editorial: yes(element, "editorial"),
                    });
                }
            }
            K::Stem => note.stem = self.text_enum(element, StemDirection::from_musicxml),
            K::Notehead => {
                if let Some(kind) = self.text_enum(element, NoteHeadKind::from_musicxml) {
                    note.head = Some(NoteHead {
                        kind,
                        filled: yes_no(element, "filled"),
                        parentheses: yes(element, "parentheses"),
                    });
                }
            }
            K::Beam => {
                if let Some(kind) = self.text_enum(element, BeamKind::from_musicxml) {
                    let number = self.attribute_number(element, "number").unwrap_or(1);
                    note.decorations.beams.push(Beam { number, kind });
                }
            }

            K::Slur => match self.attribute_enum(element, "type", StartStop::from_musicxml) {
                Some(kind) => {
                    let number = self.attribute_number(element, "number").unwrap_or(1);
                    self.pending.push_slur(Slur {
                        number,
                        kind,
                        placement,
                        line_type: element.attribute("line-type").map(str::to_string),
                        input_line: element.line,
                    });
                }
                None => self.reporter.report_warning(element.line, "<slur> without a type, ignored"),
            },
            K::Tuplet => match element.attribute("type") {
                Some("start") | Some("stop") => {
                    let kind = if element.attribute("type") == Some("start") {
                        StartStop::Start
                    } else {
                        StartStop::Stop
                    };
                    note.tuplets.push(TupletMarker {
                        kind,
                        number: self.attribute_number(element, "number").unwrap_or(1),
                        bracket: yes_no(element, "bracket"),
                        show_number: element.attribute("show-number").map(str::to_string),
                        actual: None,
                        normal: None,
                        input_line: element.line,
                    });
                }
                _ => self
                    .reporter
                    .report_warning(element.line, "<tuplet> without start or stop type, ignored"),
            },
            K::TupletNumber => {
                let value = self.number::<u32>(element);
                let Some(marker) = note.tuplets.last_mut() else {
                    return;
                };
                match self.parent() {
                    Some(K::TupletActual) => marker.actual = value,
                    Some(K::TupletNormal) => marker.normal = value,
                    _ => {}
                }
            }
            K::Fermata => note.decorations.articulations.push(Articulation {
                kind: ArticulationKind::Fermata,
                placement: element.attribute("type").map(|t| {
                    if t == "inverted" {
                        Placement::Below
                    } else {
                        Placement::Above
                    }
                }),
                input_line: element.line,
            }),
            K::Articulation(kind) => note.decorations.articulations.push(Articulation {
                kind,
                placement,
                input_line: element.line,
            }),
            K::TechnicalMark(kind) => note.decorations.technicals.push(Technical {
                kind,
                value: Some(element.text().to_string()).filter(|text| !text.is_empty()),
                placement,
                input_line: element.line,
            }),
            K::Ornament(kind) => note.decorations.ornaments.push(Ornament {
                kind,
                placement,
                input_line: element.line,
            }),
            K::Dynamic(kind) => note.decorations.dynamics.push(Dynamics {
                kind,
                placement,
                input_line: element.line,
            }),
            K::Tremolo => self.read_tremolo(note, element, placement),

            K::Lyric => {
                if let Some(number) = element.attribute("number") {
                    self.stanza_number = number.to_string();
                }
                self.lyric = Some(LyricBuild::new(&self.stanza_number, element.line));
            }
            K::Syllabic => {
                let syllabic = self.text_enum(element, SyllableKind::from_syllabic);
                if let Some(lyric) = self.lyric.as_mut() {
                    lyric.syllabic = syllabic;
                }
            }
            K::Text => {
                if let Some(lyric) = self.lyric.as_mut() {
                    lyric.texts.push(element.text().to_string());
                }
            }
            K::Extend => {
                if let Some(lyric) = self.lyric.as_mut() {
                    lyric.extend = ExtendKind::from_musicxml(element.attribute("type"));
                }
            }
            K::Humming | K::Laughing => {
                if let Some(lyric) = self.lyric.as_mut() {
                    lyric.wordless = true;
                }
            }
            _ => {}
        }
    }

    fn read_tremolo(&mut self, note: &mut NoteBuild, element: &XmlElement, placement: Option<Placement>) {
        let marks = if element.text().is_empty() {
            3
        } else {
            self.number::<u8>(element).unwrap_or(3)
        };
        match element.attribute("type") {
            None | Some("single") => note.decorations.single_tremolo = Some(SingleTremolo { marks, placement }),
            Some("unmeasured") => note.decorations.single_tremolo = Some(SingleTremolo { marks: 0, placement }),
            Some("start") | Some("stop") => {
                note.double_tremolo = Some(DoubleTremoloMarker {
                    start: element.attribute("type") == Some("start"),
                    marks,
                    input_line: element.line,
                })
            }
            Some(other) => self.reporter.report_warning(
                element.line,
                &format!("unknown <tremolo type=\"{}\">, ignored", other),
            ),
        }
    }

    pub(super) fn end_lyric(&mut self) {
        if let (Some(lyric), Some(note)) = (self.lyric.take(), self.note.as_mut()) {
            note.lyrics.push(lyric);
        }
    }

    // ------------------------------------------------------------------
    // </note>
    // ------------------------------------------------------------------

    pub(super) fn end_note(&mut self) -> Result<()> {
        let Some(mut build) = self.note.take() else {
            return Ok(());
        };
        let line = build.input_line;
        let Some(part_index) = self.current_part else {
            self.reporter.report_warning(line, "<note> outside of a part, ignored");
            return Ok(());
        };
        let key = VoiceKey {
            part: part_index.0,
            voice: build.voice,
        };

        let form = match build.form() {
            Some(form) => form,
            None => {
                self.reporter.report_error(line, "<note> has no <step>, using C");
                NoteForm::Pitched(Pitch::new(DiatonicStep::C, build.alteration, build.octave.unwrap_or(4)))
            }
        };
        if build.chord && build.rest {
            self.reporter
                .report_error(line, "a rest cannot be a chord member, note dropped");
            return Ok(());
        }
        let time_modification = build.time_modification();

        if !build.chord {
            self.close_before_note(key, &build, time_modification);
        }

        let (sounding, display, note_type, dots) = self.note_durations(&build, part_index.0, time_modification);
        let id = self.next_note_id();

        // the tuplet stack holds one voice at a time
        if !build.chord && !build.grace && (time_modification.is_some() || !build.tuplets.is_empty()) {
            if let Some(owner) = self.tuplets.voice().filter(|owner| *owner != key) {
                self.reporter.report_warning(
                    line,
                    &format!("tuplet in voice {} interrupted by voice {}, closed here", owner.voice, key.voice),
                );
                let done = self.tuplets.finalize_all();
                self.emit_tuplets(owner, done);
            }
        }
        if build.double_tremolo.map_or(false, |marker| marker.start) {
            self.flush_tremolo(line);
        }

        let part = &mut self.score.parts[part_index.0];
        let position = part.position;
        if !build.chord && !build.grace {
            part.position += sounding;
        }

        let mut note = Note::new(id, form, line);
        note.kind = if build.rest {
            NoteKind::Rest
        } else if build.grace {
            NoteKind::Grace
        } else {
            NoteKind::Undetermined
        };
        note.measure_number = part.measure_number.clone();
        note.staff_number = build.staff;
        note.voice_number = build.voice;
        note.sounding_whole_notes = sounding;
        note.display_whole_notes = display;
        note.dots = dots;
        note.graphic_type = note_type;
        note.position_in_measure = position;
        note.tie = build.tie;
        note.grace_slash = build.grace_slash;
        note.cue = build.cue;
        note.print_object = build.print_object;
        note.stem = build.stem;
        note.head = build.head;
        note.accidental = build.accidental;
        note.decorations = mem::take(&mut build.decorations);

        self.pending
            .drain_onto(&mut note.decorations, build.rest, line, &mut *self.reporter);
        if !build.grace {
            note.harmony = self.pending.take_harmony(sounding);
            note.figured_bass = self.pending.take_figured_bass(sounding);
        }

        // tuplets opened by this note
        if !build.chord && !build.grace {
            let combined = (build.actual_notes.unwrap_or(1), build.normal_notes.unwrap_or(1));
            for marker in build.tuplets.iter().filter(|m| m.kind == StartStop::Start) {
                // <time-modification> covers every enclosing tuplet too
                let ratio = match (marker.actual, marker.normal) {
                    (Some(actual), Some(normal)) if actual > 0 && normal > 0 => (actual, normal),
                    _ => nested_tuplet_ratio(combined, self.tuplets.enclosing_ratio()),
                };
                let mut tuplet = Tuplet::new(marker.number, ratio.0, ratio.1, position, marker.input_line);
                tuplet.bracket = marker.bracket;
                tuplet.show_number = marker.show_number.clone();
                self.tuplets.push(tuplet, key);
            }
            if let Some((actual, normal)) = time_modification.filter(|_| self.tuplets.is_empty()) {
                log::debug!("note {} starts an implicit {}:{} tuplet", note, actual, normal);
                self.tuplets
                    .push_implicit(Tuplet::new(1, actual, normal, position, line), display, key);
            }
        }

        let lyrics = mem::take(&mut build.lyrics);
        let part = &mut self.score.parts[part_index.0];
        // a chord member shares its first note's staff slot and never moves the voice
        let voice = if build.chord {
            registry::voice_at(part, build.staff, build.voice, line)
        } else {
            registry::voice_for(part, build.staff, build.voice, line)
        };

        if build.chord {
            if !lyrics.is_empty() {
                self.reporter
                    .report_warning(line, &format!("lyrics on chord member {} are ignored", note));
            }
            let tremolo = match self.tremolo.as_mut() {
                Some((owner, tremolo)) if *owner == key => Some(tremolo),
                _ => None,
            };
            return self.chords.add_chord_note(
                key,
                note,
                ChordTargets {
                    voice,
                    tuplets: &mut self.tuplets,
                    tremolo,
                },
            );
        }

        if !build.grace || !lyrics.is_empty() {
            self.lyrics
                .align(key, voice, &mut note, lyrics, &mut *self.reporter);
        }

        if build.grace {
            voice.append(MeasureElement::Note(note));
            self.chords.note_placed(key, NotePlacement::Voice);
            return Ok(());
        }

        if self.tuplets.voice() == Some(key) {
            voice.advance(position, sounding);
            self.tuplets.add_note(note)?;
            for marker in build.tuplets.iter().filter(|m| m.kind == StartStop::Stop) {
                self.tuplets.stop(marker.input_line)?;
            }
            self.chords.note_placed(key, NotePlacement::Tuplet);
            return Ok(());
        }

        if let Some(marker) = build.double_tremolo {
            if marker.start {
                voice.advance(position, sounding);
                note.kind = NoteKind::DoubleTremoloMember;
                let mut tremolo = DoubleTremolo::new(marker.marks, position, marker.input_line);
                tremolo.first = Some(TremoloElement::Note(note));
                self.tremolo = Some((key, tremolo));
                self.chords.note_placed(key, NotePlacement::DoubleTremoloFirst);
                return Ok(());
            }
            match self.tremolo.take() {
                Some((owner, mut tremolo)) if owner == key => {
                    voice.advance(position, sounding);
                    note.kind = NoteKind::DoubleTremoloMember;
                    tremolo.second = Some(TremoloElement::Note(note));
                    voice.append(MeasureElement::DoubleTremolo(tremolo));
                    self.chords.note_placed(key, NotePlacement::DoubleTremoloSecond);
                    return Ok(());
                }
                other => {
                    self.tremolo = other;
                    self.reporter
                        .report_warning(marker.input_line, "double tremolo stop without a start, ignored");
                }
            }
        }

        if build.tuplets.iter().any(|m| m.kind == StartStop::Stop) {
            self.reporter
                .report_warning(line, "tuplet stop with no tuplet started, ignored");
        }
        if note.kind == NoteKind::Undetermined {
            note.kind = NoteKind::Standalone;
        }
        voice.append_timed(MeasureElement::Note(note), position, sounding);
        self.chords.note_placed(key, NotePlacement::Voice);
        Ok(())
    }

    /// A note that is not a chord member seals pending tuplet stops and ends
    /// the chord in progress. A plain note in the tuplets' voice ends them all.
    fn close_before_note(&mut self, key: VoiceKey, build: &NoteBuild, time_modification: Option<(u32, u32)>) {
        if let Some(owner) = self.tuplets.voice() {
            let mut done = self.tuplets.finalize_pending();
            let plain = !build.grace && time_modification.is_none() && build.tuplets.is_empty();
            if owner == key && plain && !self.tuplets.is_empty() {
                if self.tuplets.has_explicit() {
                    self.reporter.report_warning(
                        build.input_line,
                        "tuplet never stopped, closed before the next plain note",
                    );
                }
                done.extend(self.tuplets.finalize_all());
            }
            self.emit_tuplets(owner, done);
        }
        self.chords.end();
    }

    /// Sounding and display durations, graphic type and dots of a note.
    /// `<duration>` wins over the type when both are present.
    fn note_durations(
        &mut self,
        build: &NoteBuild,
        part: usize,
        time_modification: Option<(u32, u32)>,
    ) -> (Rational, Rational, Option<NoteType>, u8) {
        let zero = Rational::from_integer(0);
        let divisions = self.score.parts[part].divisions;
        let mut note_type = build.note_type;
        let mut dots = build.dots;

        let sounding = match (build.duration, build.note_type) {
            _ if build.grace => zero,
            (Some(duration), Some(declared)) => {
                let sounding = self.whole_notes(duration, divisions, build.input_line);
                let implied = implied_sounding_whole_notes(declared, dots, time_modification);
                if !build.measure_rest && implied != sounding {
                    self.reporter.report_warning(
                        build.input_line,
                        &format!(
                            "<duration> gives {} whole notes but <type> implies {}, using <duration>",
                            sounding, implied
                        ),
                    );
                }
                sounding
            }
            (Some(duration), None) => {
                let sounding = self.whole_notes(duration, divisions, build.input_line);
                if !build.measure_rest {
                    let written = match time_modification {
                        Some((actual, normal)) => sounding / tuplet_factor(actual, normal),
                        None => sounding,
                    };
                    if let Some((derived, derived_dots)) = whole_notes_to_type(written) {
                        note_type = Some(derived);
                        dots = derived_dots;
                    }
                }
                sounding
            }
            (None, Some(declared)) => implied_sounding_whole_notes(declared, dots, time_modification),
            (None, None) => {
                self.reporter
                    .report_error(build.input_line, "<note> has neither <duration> nor <type>");
                zero
            }
        };

        let display = match note_type {
            Some(note_type) => display_whole_notes(note_type, dots),
            None => sounding,
        };
        (sounding, display, note_type, dots)
    }
}
