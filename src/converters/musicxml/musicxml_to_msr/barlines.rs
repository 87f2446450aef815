//! Repeat and ending actions derived from classified barlines

use super::element::{ElementKind as K, XmlElement};
use super::registry;
use super::translator::Translator;
use crate::diagnostics::Reporter;
use crate::msr::barline::{
    Barline, BarlineCategory, BarlineLocation, BarlineSpec, BarlineStyle, EndingType, RepeatDirection,
};
use crate::msr::voice::{MeasureElement, RepeatEndingKind, Voice};

/// What a barline does to the repeat structure of a voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarlineAction {
    BeginRepeat,
    EndRepeat,
    BeginEnding(Vec<u32>),
    EndEnding {
        kind: RepeatEndingKind,
        numbers: Vec<u32>,
        /// Closes the enclosing repeat as well
        last: bool,
    },
}

impl BarlineAction {
    /// Action for a classified barline, if any
    pub fn for_barline(barline: &Barline) -> Option<Self> {
        let numbers = barline.ending_numbers().to_vec();
        match barline.category() {
            BarlineCategory::HookedEndingStart | BarlineCategory::HooklessEndingStart => {
                Some(BarlineAction::BeginEnding(numbers))
            }
            BarlineCategory::RepeatStart => Some(BarlineAction::BeginRepeat),
            BarlineCategory::HookedEndingEnd => Some(BarlineAction::EndEnding {
                kind: RepeatEndingKind::Hooked,
                numbers,
                last: false,
            }),
            BarlineCategory::RepeatEnd => Some(BarlineAction::EndRepeat),
            BarlineCategory::HooklessEndingEnd => Some(BarlineAction::EndEnding {
                kind: RepeatEndingKind::Hookless,
                numbers,
                last: true,
            }),
            // a last ending closed without a backward repeat
            BarlineCategory::Standalone(_)
                if barline.location() == BarlineLocation::Right && barline.ending_type() == EndingType::Stop =>
            {
                Some(BarlineAction::EndEnding {
                    kind: RepeatEndingKind::Hooked,
                    numbers,
                    last: true,
                })
            }
            BarlineCategory::Standalone(_) => None,
        }
    }

    /// Right barline actions wait for the measure to be finalized
    pub fn is_deferred(barline: &Barline) -> bool {
        barline.location() != BarlineLocation::Left
    }

    pub fn apply(&self, voice: &mut Voice, input_line: usize, reporter: &mut dyn Reporter) {
        match self {
            BarlineAction::BeginRepeat => voice.begin_repeat(),
            BarlineAction::EndRepeat => {
                if voice.end_repeat() {
                    log::debug!(
                        "voice {}: backward repeat at line {} closes an implicit repeat",
                        voice.number,
                        input_line
                    );
                }
            }
            BarlineAction::BeginEnding(numbers) => {
                if voice.begin_ending(numbers) {
                    log::debug!(
                        "voice {}: ending {:?} at line {} opens an implicit repeat",
                        voice.number,
                        numbers,
                        input_line
                    );
                }
            }
            BarlineAction::EndEnding { kind, numbers, last } => {
                if !voice.end_ending(*kind, numbers, *last) {
                    reporter.report_warning(
                        input_line,
                        &format!("ending {:?} ends in voice {} but was never started", numbers, voice.number),
                    );
                }
            }
        }
    }
}

impl Translator<'_> {
    pub(super) fn start_barline(&mut self, element: &XmlElement) {
        let mut spec = BarlineSpec::new(element.line);
        if let Some(location) = self.attribute_enum(element, "location", BarlineLocation::from_musicxml) {
            spec.location = location;
        }
        self.barline = Some(spec);
    }

    pub(super) fn barline_child(&mut self, element: &XmlElement) {
        let Some(mut spec) = self.barline.take() else {
            return;
        };
        match element.kind {
            K::BarStyle => {
                if let Some(style) = self.text_enum(element, BarlineStyle::from_musicxml) {
                    spec.style = style;
                }
            }
            K::Repeat => {
                if let Some(direction) = self.attribute_enum(element, "direction", RepeatDirection::from_musicxml) {
                    spec.repeat_direction = direction;
                }
                spec.repeat_times = self.attribute_number(element, "times");
            }
            K::Ending => {
                if let Some(ending) = self.attribute_enum(element, "type", EndingType::from_musicxml) {
                    spec.ending_type = ending;
                }
                spec.ending_numbers = element.attribute("number").unwrap_or("").to_string();
            }
            K::Segno => spec.segno = true,
            K::Coda => spec.coda = true,
            K::Fermata => spec.fermata = true,
            _ => {}
        }
        self.barline = Some(spec);
    }

    pub(super) fn end_barline(&mut self) {
        let Some(spec) = self.barline.take() else {
            return;
        };
        let Some(index) = self.current_part else {
            self.reporter
                .report_warning(spec.input_line, "<barline> outside of a part, ignored");
            return;
        };
        let line = spec.input_line;
        let barline = Barline::new(spec);
        log::debug!("barline at line {} classified as {:?}", line, barline.category());

        let action = BarlineAction::for_barline(&barline);
        let deferred = BarlineAction::is_deferred(&barline);

        let part = &mut self.score.parts[index.0];
        if part.voices().next().is_none() {
            registry::voice_for(part, 1, 1, line);
        }
        for voice in part.voices_mut() {
            voice.append(MeasureElement::Barline(barline.clone()));
        }

        match action {
            Some(action) if deferred => self.deferred_actions.push((action, line)),
            Some(action) => {
                for voice in part.voices_mut() {
                    action.apply(voice, line, &mut *self.reporter);
                }
            }
            None => {}
        }
    }
}
