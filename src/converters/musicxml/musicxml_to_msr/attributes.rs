//! `<attributes>`: divisions, staves, keys, times, clefs and transposition

use super::arithmetic::{clamp_octave_change, parse_alteration};
use super::context::{empty_transpose, ClefBuild, KeyBuild, TimeBuild};
use super::element::{ElementKind as K, XmlElement};
use super::registry;
use super::translator::Translator;
use crate::msr::attributes::{ClefSign, KeyMode, TimeSymbol};
use crate::msr::score::{Part, Staff};
use crate::msr::types::DiatonicStep;
use crate::msr::voice::MeasureElement;

/// Run `apply` on one staff, or on every staff of the part when `number` is
/// `None`. Staff 1 always exists afterwards.
fn each_staff(part: &mut Part, number: Option<u32>, mut apply: impl FnMut(&mut Staff)) {
    match number {
        Some(number) => apply(registry::staff_for(part, number)),
        None => {
            registry::staff_for(part, 1);
            for staff in part.staves.values_mut() {
                apply(staff);
            }
        }
    }
}

impl Translator<'_> {
    pub(super) fn start_attribute(&mut self, element: &XmlElement) {
        let staff: Option<u32> = self.attribute_number(element, "number");
        match element.kind {
            K::Key => self.key = Some(KeyBuild::new(staff, element.line)),
            K::Time => {
                let symbol = self
                    .attribute_enum(element, "symbol", TimeSymbol::from_musicxml)
                    .unwrap_or(TimeSymbol::None);
                self.time = Some(TimeBuild::new(symbol, staff, element.line));
            }
            K::Clef => self.clef = Some(ClefBuild::new(staff.unwrap_or(1), element.line)),
            K::Transpose => self.transpose = Some(empty_transpose(element.line)),
            _ => {}
        }
    }

    pub(super) fn attributes_child(&mut self, element: &XmlElement) {
        match element.kind {
            K::Divisions => {
                let Some(divisions) = self.number::<u32>(element) else {
                    return;
                };
                if divisions == 0 {
                    self.reporter
                        .report_error(element.line, "<divisions> must be positive, ignored");
                    return;
                }
                if let Some(part) = self.current_part_mut() {
                    part.divisions = divisions;
                }
            }
            K::Staves => {
                let Some(count) = self.number::<u32>(element) else {
                    return;
                };
                if let Some(part) = self.current_part_mut() {
                    for number in 1..=count {
                        registry::staff_for(part, number);
                    }
                }
            }

            // key
            K::Fifths => {
                let fifths = self.number(element);
                if let (Some(key), Some(fifths)) = (self.key.as_mut(), fifths) {
                    key.fifths = fifths;
                }
            }
            K::Mode => {
                let mode = self.text_enum(element, KeyMode::from_musicxml);
                if let (Some(key), Some(mode)) = (self.key.as_mut(), mode) {
                    key.mode = mode;
                }
            }
            K::Cancel => {
                let cancel = self.number(element);
                if let Some(key) = self.key.as_mut() {
                    key.cancel = cancel;
                }
            }
            K::KeyStep => {
                let step = self.text_enum(element, DiatonicStep::from_musicxml);
                if let (Some(key), Some(step)) = (self.key.as_mut(), step) {
                    key.steps.push(step);
                }
            }
            K::KeyAlter => {
                let alteration = match parse_alteration(element.text()) {
                    Ok(alteration) => alteration,
                    Err(closest) => {
                        self.reporter.report_error(
                            element.line,
                            &format!("<key-alter> value \"{}\" is out of range, using {:?}", element.text(), closest),
                        );
                        closest
                    }
                };
                if let Some(key) = self.key.as_mut() {
                    key.alters.push(alteration);
                }
            }

            // time
            K::Beats => {
                let mut beats = Vec::new();
                for part in element.text().split('+') {
                    match part.trim().parse::<u32>() {
                        Ok(count) => beats.push(count),
                        Err(_) => {
                            self.reporter.report_error(
                                element.line,
                                &format!("<beats> value \"{}\" is not a valid number", element.text()),
                            );
                            return;
                        }
                    }
                }
                if let Some(time) = self.time.as_mut() {
                    time.beats.push(beats);
                }
            }
            K::BeatType => {
                let beat_type = self.number(element);
                if let (Some(time), Some(beat_type)) = (self.time.as_mut(), beat_type) {
                    time.beat_types.push(beat_type);
                }
            }
            K::SenzaMisura => {
                if let Some(time) = self.time.as_mut() {
                    time.symbol = TimeSymbol::SenzaMisura;
                }
            }

            // clef
            K::Sign => {
                let sign = self.text_enum(element, ClefSign::from_musicxml);
                if let Some(clef) = self.clef.as_mut() {
                    clef.sign = sign;
                }
            }
            K::Line => {
                let line = self.number(element);
                if let Some(clef) = self.clef.as_mut() {
                    clef.line = line;
                }
            }
            K::ClefOctaveChange => {
                let Some(value) = self.number::<i32>(element) else {
                    return;
                };
                let octave_change = clamp_octave_change(value).unwrap_or_else(|clamped| {
                    self.reporter.report_error(
                        element.line,
                        &format!("<clef-octave-change> {} is out of range, using {}", value, clamped),
                    );
                    clamped
                });
                if let Some(clef) = self.clef.as_mut() {
                    clef.octave_change = octave_change;
                }
            }

            // transpose
            K::Diatonic | K::Chromatic | K::OctaveChange => {
                let value = self.number::<i32>(element);
                if let (Some(transpose), Some(value)) = (self.transpose.as_mut(), value) {
                    match element.kind {
                        K::Diatonic => transpose.diatonic = value,
                        K::Chromatic => transpose.chromatic = value,
                        _ => transpose.octave_change = value,
                    }
                }
            }
            K::Double => {
                if let Some(transpose) = self.transpose.as_mut() {
                    transpose.double = true;
                }
            }
            _ => {}
        }
    }

    pub(super) fn end_attribute(&mut self, element: &XmlElement) {
        let Some(index) = self.current_part else {
            self.reporter
                .report_warning(element.line, "<attributes> outside of a part, ignored");
            return;
        };
        let part = &mut self.score.parts[index.0];

        match element.kind {
            K::Key => {
                let Some(key) = self.key.take().map(KeyBuild::build) else {
                    return;
                };
                log::debug!("part {}: key {} fifths, {:?}", part.id, key.fifths, key.mode);
                if key.staff_number.is_none() {
                    part.key = Some(key.clone());
                }
                each_staff(part, key.staff_number, |staff| {
                    staff.key = Some(key.clone());
                    for voice in staff.voices.values_mut() {
                        voice.key = Some(key.clone());
                        voice.append(MeasureElement::Key(key.clone()));
                    }
                });
            }
            K::Time => {
                let Some(time) = self.time.take().map(TimeBuild::build) else {
                    return;
                };
                if time.items.is_empty() && time.symbol != TimeSymbol::SenzaMisura {
                    self.reporter.report_warning(time.input_line, "<time> without beats, ignored");
                    return;
                }
                if time.staff_number.is_none() {
                    part.time = Some(time.clone());
                }
                each_staff(part, time.staff_number, |staff| {
                    staff.time = Some(time.clone());
                    for voice in staff.voices.values_mut() {
                        voice.time = Some(time.clone());
                        voice.append(MeasureElement::Time(time.clone()));
                    }
                });
            }
            K::Clef => {
                let Some(clef) = self.clef.take() else {
                    return;
                };
                if clef.sign.is_none() {
                    self.reporter
                        .report_warning(clef.input_line, "<clef> without <sign>, using a G clef");
                }
                let clef = clef.build();
                each_staff(part, Some(clef.staff_number), |staff| {
                    staff.clef = Some(clef.clone());
                    for voice in staff.voices.values_mut() {
                        voice.clef = Some(clef.clone());
                        voice.append(MeasureElement::Clef(clef.clone()));
                    }
                });
            }
            K::Transpose => {
                let Some(transpose) = self.transpose.take() else {
                    return;
                };
                part.transpose = Some(transpose.clone());
                for voice in part.voices_mut() {
                    voice.append(MeasureElement::Transpose(transpose.clone()));
                }
            }
            _ => {}
        }
    }
}
