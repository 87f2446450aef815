//! Score header and part list: identification, page geometry, credits,
//! part groups and score parts

use super::context::{GroupBuild, ScorePartBuild};
use super::element::{ElementKind as K, XmlElement};
use super::errors::Result;
use super::part_groups::GroupStart;
use super::translator::Translator;
use crate::msr::score::{Credit, CreditWords, Part, PartGroupSymbol, PartIndex};
use crate::msr::types::StartStop;

fn text(element: &XmlElement) -> Option<String> {
    Some(element.text().to_string()).filter(|text| !text.is_empty())
}

fn float_attribute(element: &XmlElement, name: &str) -> Option<f32> {
    element.attribute(name)?.trim().parse().ok()
}

impl Translator<'_> {
    /// Leaves of the score header
    pub(super) fn header_child(&mut self, element: &XmlElement) {
        let identification = &mut self.score.identification;
        match element.kind {
            K::WorkNumber => identification.work_number = text(element),
            K::WorkTitle => identification.work_title = text(element),
            K::MovementNumber => identification.movement_number = text(element),
            K::MovementTitle => identification.movement_title = text(element),
            K::Creator => {
                if let Some(name) = text(element) {
                    let kind = element.attribute("type").unwrap_or("creator").to_string();
                    identification.creators.push((kind, name));
                }
            }
            K::Rights => identification.rights.extend(text(element)),
            K::Software => identification.software.extend(text(element)),
            K::EncodingDate => identification.encoding_date = text(element),

            K::Millimeters | K::Tenths | K::PageHeight | K::PageWidth => {
                let Some(value) = self.number::<f32>(element) else {
                    return;
                };
                let geometry = self.score.page_geometry.get_or_insert_with(Default::default);
                match element.kind {
                    K::Millimeters => geometry.millimeters = Some(value),
                    K::Tenths => geometry.tenths = Some(value),
                    K::PageHeight => geometry.page_height = Some(value),
                    _ => geometry.page_width = Some(value),
                }
            }
            // odd and even pages may both give margins, the first ones are kept
            K::LeftMargin | K::RightMargin | K::TopMargin | K::BottomMargin => {
                let Some(value) = self.number::<f32>(element) else {
                    return;
                };
                let geometry = self.score.page_geometry.get_or_insert_with(Default::default);
                let slot = match element.kind {
                    K::LeftMargin => &mut geometry.left_margin,
                    K::RightMargin => &mut geometry.right_margin,
                    K::TopMargin => &mut geometry.top_margin,
                    _ => &mut geometry.bottom_margin,
                };
                slot.get_or_insert(value);
            }

            K::CreditWords => {
                let Some(credit) = self.credit.as_mut() else {
                    return;
                };
                credit.words.push(CreditWords {
                    text: element.text().to_string(),
                    default_x: float_attribute(element, "default-x"),
                    default_y: float_attribute(element, "default-y"),
                    font_size: element.attribute("font-size").map(str::to_string),
                    justify: element.attribute("justify").map(str::to_string),
                });
            }
            _ => {}
        }
    }

    pub(super) fn start_credit(&mut self, element: &XmlElement) {
        self.credit = Some(Credit {
            page: self.attribute_number(element, "page").unwrap_or(1),
            words: Vec::new(),
            input_line: element.line,
        });
    }

    // ------------------------------------------------------------------
    // part groups
    // ------------------------------------------------------------------

    pub(super) fn start_part_group(&mut self, element: &XmlElement) {
        let kind = self.attribute_enum(element, "type", StartStop::from_musicxml);
        self.group = Some(GroupBuild {
            number: self.attribute_number(element, "number").unwrap_or(1),
            kind,
            name: None,
            abbreviation: None,
            symbol: PartGroupSymbol::None,
            display_x: float_attribute(element, "default-x"),
            barline: false,
            input_line: element.line,
        });
    }

    pub(super) fn part_group_child(&mut self, element: &XmlElement) {
        let symbol = match element.kind {
            K::GroupSymbol => self.text_enum(element, PartGroupSymbol::from_musicxml),
            _ => None,
        };
        let Some(group) = self.group.as_mut() else {
            return;
        };
        match element.kind {
            K::GroupName => group.name = text(element),
            K::GroupAbbreviation => group.abbreviation = text(element),
            K::GroupSymbol => {
                if let Some(symbol) = symbol {
                    group.symbol = symbol;
                }
                if let Some(x) = float_attribute(element, "default-x") {
                    group.display_x = Some(x);
                }
            }
            K::GroupBarline => group.barline = element.text() == "yes",
            _ => {}
        }
    }

    pub(super) fn end_part_group(&mut self) -> Result<()> {
        let Some(group) = self.group.take() else {
            return Ok(());
        };
        match group.kind {
            Some(StartStop::Start) => {
                let number = self.groups.resolve_start(
                    GroupStart {
                        number: group.number,
                        name: group.name,
                        abbreviation: group.abbreviation,
                        symbol: group.symbol,
                        display_x: group.display_x,
                        barline: group.barline,
                        input_line: group.input_line,
                    },
                    &mut *self.reporter,
                );
                log::debug!("part-group {} started", number);
            }
            Some(StartStop::Stop) => {
                self.groups
                    .resolve_stop(group.number, group.input_line, &mut self.score)?;
            }
            _ => self.reporter.report_warning(
                group.input_line,
                &format!("<part-group number=\"{}\"> is neither a start nor a stop, ignored", group.number),
            ),
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // score parts
    // ------------------------------------------------------------------

    pub(super) fn start_score_part(&mut self, element: &XmlElement) {
        self.score_part = Some(ScorePartBuild {
            id: element.attribute("id").unwrap_or("").to_string(),
            name: None,
            abbreviation: None,
            input_line: element.line,
        });
    }

    pub(super) fn score_part_child(&mut self, element: &XmlElement) {
        let Some(score_part) = self.score_part.as_mut() else {
            return;
        };
        match element.kind {
            K::PartName => score_part.name = text(element),
            K::PartAbbreviation => score_part.abbreviation = text(element),
            _ => {}
        }
    }

    pub(super) fn end_score_part(&mut self) {
        let Some(score_part) = self.score_part.take() else {
            return;
        };
        if self.part_ids.contains_key(&score_part.id) {
            self.reporter.report_error(
                score_part.input_line,
                &format!("part \"{}\" is declared twice, the second one is ignored", score_part.id),
            );
            return;
        }

        let index = PartIndex(self.score.parts.len());
        let mut part = Part::new(&score_part.id, score_part.input_line);
        part.name = score_part.name;
        part.abbreviation = score_part.abbreviation;
        log::debug!("score-part {} ({:?})", part.id, part.name);

        self.score.parts.push(part);
        self.part_ids.insert(score_part.id, index);
        self.groups.add_part(index, score_part.input_line);
    }
}
