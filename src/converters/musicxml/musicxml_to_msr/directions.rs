//! `<direction>`, `<harmony>` and `<figured-bass>`
//!
//! These come before the note they belong to. Their contents are handed to
//! the pending queues; only tempos go straight into a voice.

use super::arithmetic::parse_alteration;
use super::context::{empty_tempo, DegreeBuild, DirectionBuild};
use super::element::{ElementKind as K, XmlElement};
use super::registry;
use super::translator::Translator;
use crate::msr::decorations::{Dynamics, Ligature, OtherDynamics, Wedge, WedgeKind, Words};
use crate::msr::harmony::{DegreeType, Figure, HarmonyKind};
use crate::msr::types::{Alteration, DiatonicStep, NoteType, Placement, StartStop};
use crate::msr::voice::MeasureElement;

impl Translator<'_> {
    pub(super) fn start_direction(&mut self, element: &XmlElement) {
        let placement = self.attribute_enum(element, "placement", Placement::from_musicxml);
        self.direction = Some(DirectionBuild::new(placement, element.line));
    }

    pub(super) fn direction_child(&mut self, element: &XmlElement) {
        let Some(mut direction) = self.direction.take() else {
            return;
        };
        self.read_direction_child(&mut direction, element);
        self.direction = Some(direction);
    }

    fn read_direction_child(&mut self, direction: &mut DirectionBuild, element: &XmlElement) {
        let placement = direction.placement;
        let line = element.line;
        match element.kind {
            K::Words => {
                let text = element.text();
                if text.is_empty() {
                    return;
                }
                direction.words.push(Words {
                    text: text.to_string(),
                    placement,
                    font_style: element.attribute("font-style").map(str::to_string),
                    font_size: element.attribute("font-size").map(str::to_string),
                    font_weight: element.attribute("font-weight").map(str::to_string),
                    xml_lang: element.attribute("lang").map(str::to_string),
                    input_line: line,
                });
            }
            K::Dynamic(kind) => direction.dynamics.push(Dynamics {
                kind,
                placement,
                input_line: line,
            }),
            K::OtherDynamics => direction.other_dynamics.push(OtherDynamics {
                text: element.text().to_string(),
                placement,
                input_line: line,
            }),
            K::Wedge => {
                if let Some(kind) = self.attribute_enum(element, "type", WedgeKind::from_musicxml) {
                    direction.wedges.push(Wedge {
                        kind,
                        number: self.attribute_number(element, "number").unwrap_or(1),
                        placement,
                        input_line: line,
                    });
                }
            }
            K::Bracket => {
                if let Some(kind) = self.attribute_enum(element, "type", StartStop::from_musicxml) {
                    direction.ligatures.push(Ligature {
                        number: self.attribute_number(element, "number").unwrap_or(1),
                        kind,
                        line_end: element.attribute("line-end").map(str::to_string),
                        placement,
                        input_line: line,
                    });
                }
            }

            K::Metronome => {
                let parentheses = element.attribute("parentheses") == Some("yes");
                direction.tempo = Some(empty_tempo(parentheses, placement, line));
            }
            K::BeatUnit => {
                let beat_unit = self.text_enum(element, NoteType::from_musicxml);
                if let Some(tempo) = direction.tempo.as_mut() {
                    tempo.beat_unit = beat_unit;
                }
            }
            K::BeatUnitDot => {
                if let Some(tempo) = direction.tempo.as_mut() {
                    tempo.beat_unit_dots = tempo.beat_unit_dots.saturating_add(1);
                }
            }
            K::PerMinute => {
                if let Some(tempo) = direction.tempo.as_mut() {
                    tempo.per_minute = Some(element.text().to_string());
                }
            }
            K::Sound => {
                if let Some(tempo) = element.attribute("tempo") {
                    direction.sound_tempo = Some(tempo.trim().to_string());
                }
            }

            K::Staff => direction.staff = self.number(element).unwrap_or(1),
            K::Voice => direction.voice = self.number(element),
            _ => {}
        }
    }

    pub(super) fn end_direction(&mut self) {
        let Some(mut direction) = self.direction.take() else {
            return;
        };
        let Some(index) = self.current_part else {
            self.reporter
                .report_warning(direction.input_line, "<direction> outside of a part, ignored");
            return;
        };

        if let Some(mut tempo) = direction.take_tempo() {
            if !direction.words.is_empty() {
                let words: Vec<String> = direction.words.drain(..).map(|w| w.text).collect();
                tempo.words = Some(words.join(" "));
            }
            let part = &mut self.score.parts[index.0];
            let voice = match direction.voice {
                Some(number) => registry::voice_for(part, direction.staff, number, direction.input_line),
                None => registry::voice_on_staff(part, direction.staff, direction.input_line),
            };
            voice.append(MeasureElement::Tempo(tempo));
        }

        for words in direction.words {
            self.pending.push_words(words);
        }
        for dynamics in direction.dynamics {
            self.pending.push_dynamics(dynamics);
        }
        for other in direction.other_dynamics {
            self.pending.push_other_dynamics(other);
        }
        for wedge in direction.wedges {
            self.pending.push_wedge(wedge);
        }
        for ligature in direction.ligatures {
            self.pending.push_ligature(ligature);
        }
    }

    // ------------------------------------------------------------------
    // harmony
    // ------------------------------------------------------------------

    fn alteration(&mut self, element: &XmlElement) -> Alteration {
        parse_alteration(element.text()).unwrap_or_else(|closest| {
            self.reporter.report_error(
                element.line,
                &format!("<{}> value \"{}\" is out of range, using {:?}", element.tag, element.text(), closest),
            );
            closest
        })
    }

    pub(super) fn harmony_child(&mut self, element: &XmlElement) {
        let value = match element.kind {
            K::RootAlter | K::BassAlter | K::DegreeAlter => Some(self.alteration(element)),
            _ => None,
        };
        let step = match element.kind {
            K::RootStep | K::BassStep => self.text_enum(element, DiatonicStep::from_musicxml),
            _ => None,
        };
        let number: Option<u32> = match element.kind {
            K::Inversion | K::DegreeValue | K::Staff => self.number(element),
            _ => None,
        };
        let kind = match element.kind {
            K::Kind => self.text_enum(element, HarmonyKind::from_musicxml),
            _ => None,
        };
        let degree_type = match element.kind {
            K::DegreeType => self.text_enum(element, DegreeType::from_musicxml),
            _ => None,
        };

        let Some(harmony) = self.harmony.as_mut() else {
            return;
        };
        match element.kind {
            K::RootStep => harmony.root_step = step,
            K::RootAlter => harmony.root_alteration = value.unwrap_or(Alteration::Natural),
            K::Kind => {
                if let Some(kind) = kind {
                    harmony.kind = kind;
                }
                harmony.kind_text = element.attribute("text").map(str::to_string);
            }
            K::Inversion => harmony.inversion = number.unwrap_or(0),
            K::BassStep => harmony.bass_step = step,
            K::BassAlter => harmony.bass_alteration = value.unwrap_or(Alteration::Natural),
            K::Degree => harmony.degree = Some(DegreeBuild::default()),
            K::DegreeValue => harmony.degree.get_or_insert_with(Default::default).value = number.unwrap_or(0),
            K::DegreeAlter => {
                harmony.degree.get_or_insert_with(Default::default).alteration =
                    value.unwrap_or(Alteration::Natural)
            }
            K::DegreeType => {
                if let Some(degree_type) = degree_type {
                    harmony.degree.get_or_insert_with(Default::default).degree_type = degree_type;
                }
            }
            K::Staff => harmony.staff_number = number.unwrap_or(1),
            _ => {}
        }
    }

    pub(super) fn end_harmony(&mut self, element: &XmlElement) {
        let Some(harmony) = self.harmony.take() else {
            return;
        };
        match harmony.build() {
            Some(harmony) => self.pending.set_harmony(harmony, &mut *self.reporter),
            None => self
                .reporter
                .report_error(element.line, "<harmony> without <root-step>, ignored"),
        }
    }

    // ------------------------------------------------------------------
    // figured bass
    // ------------------------------------------------------------------

    pub(super) fn figured_bass_child(&mut self, element: &XmlElement) {
        let number = match element.kind {
            K::FigureNumber | K::Duration => self.number::<u32>(element),
            _ => None,
        };
        let divisions = self.current_part_mut().map_or(1, |part| part.divisions);
        let whole_notes = match (element.kind, number) {
            (K::Duration, Some(duration)) => Some(self.whole_notes(duration, divisions, element.line)),
            _ => None,
        };

        let Some(figured_bass) = self.figured_bass.as_mut() else {
            return;
        };
        match element.kind {
            K::Figure => figured_bass.figure = Some(Figure::default()),
            K::Prefix => figured_bass.figure.get_or_insert_with(Figure::default).prefix = Some(element.text().to_string()),
            K::FigureNumber => figured_bass.figure.get_or_insert_with(Figure::default).number = number,
            K::Suffix => figured_bass.figure.get_or_insert_with(Figure::default).suffix = Some(element.text().to_string()),
            K::Duration => figured_bass.whole_notes = whole_notes,
            _ => {}
        }
    }
}
