//! Part-group resolution
//!
//! Open groups are kept in a list ordered by their on-page x position, the
//! leftmost first. That head group is the parent of any group started after
//! it and receives the parts and the groups stopped while it is open.

use super::errors::{Result, TranslationError};
use crate::diagnostics::Reporter;
use crate::msr::score::{PartGroup, PartGroupMember, PartGroupSymbol, PartIndex, Score};
use std::collections::HashMap;

/// Attributes of a `part-group type="start"`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStart {
    pub number: u32,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub symbol: PartGroupSymbol,
    pub display_x: Option<f32>,
    pub barline: bool,
    pub input_line: usize,
}

#[derive(Debug, Default)]
pub struct PartGroupResolver {
    /// Open group numbers, head first
    open: Vec<u32>,
    groups: HashMap<u32, PartGroup>,
}

impl PartGroupResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_numbers(&self) -> &[u32] {
        &self.open
    }

    pub fn is_open(&self, number: u32) -> bool {
        self.groups.contains_key(&number)
    }

    pub fn head(&self) -> Option<u32> {
        self.open.first().copied()
    }

    pub fn resolve_start(&mut self, start: GroupStart, reporter: &mut dyn Reporter) -> u32 {
        if self.groups.contains_key(&start.number) {
            reporter.report_warning(
                start.input_line,
                &format!("part-group {} is already started", start.number),
            );
            return start.number;
        }

        let group = PartGroup {
            number: start.number,
            name: start.name,
            abbreviation: start.abbreviation,
            symbol: start.symbol,
            barline: start.barline,
            display_x: start.display_x,
            parent: self.head(),
            implicit: false,
            members: Vec::new(),
            input_line: start.input_line,
        };
        log::debug!(
            "part-group {} started, parent {:?}, x {:?}",
            group.number,
            group.parent,
            group.display_x
        );
        self.insert_open(group);
        start.number
    }

    fn insert_open(&mut self, group: PartGroup) {
        let number = group.number;
        let position = match group.display_x {
            // groups without a position sort after every positioned one
            None => self.open.len(),
            Some(x) => self
                .open
                .iter()
                .position(|n| {
                    self.groups
                        .get(n)
                        .and_then(|g| g.display_x)
                        .map_or(true, |other| x < other)
                })
                .unwrap_or(self.open.len()),
        };
        self.open.insert(position, number);
        self.groups.insert(number, group);
    }

    pub fn resolve_stop(&mut self, number: u32, input_line: usize, score: &mut Score) -> Result<()> {
        let Some(group) = self.groups.remove(&number) else {
            return Err(TranslationError::internal(
                input_line,
                format!("part-group {} stopped but never started", number),
            ));
        };
        self.open.retain(|n| *n != number);

        match self.head().and_then(|head| self.groups.get_mut(&head)) {
            Some(head) => {
                log::debug!("part-group {} stopped into group {}", number, head.number);
                head.members.insert(0, PartGroupMember::Group(group));
            }
            None => {
                log::debug!("part-group {} stopped into the score", number);
                score.part_groups.push(group);
            }
        }
        Ok(())
    }

    /// Append a part to the head group, opening the implicit group if needed
    pub fn add_part(&mut self, part: PartIndex, input_line: usize) {
        if self.open.is_empty() {
            self.insert_open(PartGroup::implicit(input_line));
        }
        if let Some(head) = self.head().and_then(|head| self.groups.get_mut(&head)) {
            head.members.push(PartGroupMember::Part(part));
        }
    }

    /// Stop everything still open at the end of the part list
    pub fn close_all(&mut self, input_line: usize, score: &mut Score, reporter: &mut dyn Reporter) -> Result<()> {
        while let Some(number) = self.open.last().copied() {
            if number != PartGroup::IMPLICIT_NUMBER {
                reporter.report_warning(
                    input_line,
                    &format!("part-group {} is not stopped at the end of the part list", number),
                );
            }
            self.resolve_stop(number, input_line, score)?;
        }
        Ok(())
    }
}
