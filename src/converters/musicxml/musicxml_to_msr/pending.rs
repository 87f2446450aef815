//! Decorations waiting for the note they belong to
//!
//! Directions and notations arrive before their note is complete. They are
//! queued in encounter order and drained onto the next note built. Whether
//! a rest takes them or lets them through to the following note is a
//! per-kind policy read from the options when the queues are created.

use super::settings::{DecorationKind, OptionsQuery};
use crate::diagnostics::Reporter;
use crate::msr::decorations::{Decorations, Dynamics, Ligature, OtherDynamics, Slur, Wedge, Words};
use crate::msr::harmony::{FiguredBass, Harmony};
use crate::msr::types::Rational;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
pub struct PendingQueues {
    dynamics: VecDeque<Dynamics>,
    other_dynamics: VecDeque<OtherDynamics>,
    words: VecDeque<Words>,
    slurs: VecDeque<Slur>,
    ligatures: VecDeque<Ligature>,
    wedges: VecDeque<Wedge>,
    harmony: Option<Harmony>,
    figured_bass: Option<FiguredBass>,
    delay_past_rests: HashMap<DecorationKind, bool>,
}

impl PendingQueues {
    pub fn new(options: &dyn OptionsQuery) -> Self {
        let delay_past_rests = DecorationKind::ALL
            .iter()
            .map(|kind| (*kind, options.delay_rest_attachment(*kind)))
            .collect();
        Self {
            delay_past_rests,
            ..Default::default()
        }
    }

    pub fn push_dynamics(&mut self, dynamics: Dynamics) {
        self.dynamics.push_back(dynamics);
    }

    pub fn push_other_dynamics(&mut self, other: OtherDynamics) {
        self.other_dynamics.push_back(other);
    }

    pub fn push_words(&mut self, words: Words) {
        self.words.push_back(words);
    }

    pub fn push_slur(&mut self, slur: Slur) {
        self.slurs.push_back(slur);
    }

    pub fn push_ligature(&mut self, ligature: Ligature) {
        self.ligatures.push_back(ligature);
    }

    pub fn push_wedge(&mut self, wedge: Wedge) {
        self.wedges.push_back(wedge);
    }

    fn len_of(&self, kind: DecorationKind) -> usize {
        match kind {
            DecorationKind::Dynamics => self.dynamics.len(),
            DecorationKind::OtherDynamics => self.other_dynamics.len(),
            DecorationKind::Words => self.words.len(),
            DecorationKind::Slurs => self.slurs.len(),
            DecorationKind::Ligatures => self.ligatures.len(),
            DecorationKind::Wedges => self.wedges.len(),
        }
    }

    /// Move every queued decoration the policy allows onto `target`
    pub fn drain_onto(&mut self, target: &mut Decorations, is_rest: bool, input_line: usize, reporter: &mut dyn Reporter) {
        for kind in DecorationKind::ALL {
            let count = self.len_of(kind);
            if count == 0 {
                continue;
            }
            if is_rest {
                if self.delay_past_rests.get(&kind).copied().unwrap_or(false) {
                    log::debug!("delaying {} {} past rest at line {}", count, kind.name(), input_line);
                    continue;
                }
                reporter.report_warning(input_line, &format!("{} attached to a rest", kind.name()));
            }
            match kind {
                DecorationKind::Dynamics => target.dynamics.extend(self.dynamics.drain(..)),
                DecorationKind::OtherDynamics => target.other_dynamics.extend(self.other_dynamics.drain(..)),
                DecorationKind::Words => target.words.extend(self.words.drain(..)),
                DecorationKind::Slurs => target.slurs.extend(self.slurs.drain(..)),
                DecorationKind::Ligatures => target.ligatures.extend(self.ligatures.drain(..)),
                DecorationKind::Wedges => target.wedges.extend(self.wedges.drain(..)),
            }
        }
    }

    /// Kinds still waiting, with their counts
    pub fn leftovers(&self) -> Vec<(DecorationKind, usize)> {
        DecorationKind::ALL
            .iter()
            .map(|kind| (*kind, self.len_of(*kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn clear(&mut self) {
        self.dynamics.clear();
        self.other_dynamics.clear();
        self.words.clear();
        self.slurs.clear();
        self.ligatures.clear();
        self.wedges.clear();
        self.harmony = None;
        self.figured_bass = None;
    }

    // ------------------------------------------------------------------
    // single-slot cells
    // ------------------------------------------------------------------

    pub fn set_harmony(&mut self, harmony: Harmony, reporter: &mut dyn Reporter) {
        if self.harmony.is_some() {
            reporter.report_warning(
                harmony.input_line,
                "a second harmony before the next note replaces the first",
            );
        }
        self.harmony = Some(harmony);
    }

    pub fn set_figured_bass(&mut self, figured_bass: FiguredBass, reporter: &mut dyn Reporter) {
        if self.figured_bass.is_some() {
            reporter.report_warning(
                figured_bass.input_line,
                "a second figured bass before the next note replaces the first",
            );
        }
        self.figured_bass = Some(figured_bass);
    }

    /// The pending harmony, its duration defaulting to the note's
    pub fn take_harmony(&mut self, note_whole_notes: Rational) -> Option<Harmony> {
        self.harmony.take().map(|mut harmony| {
            harmony.whole_notes.get_or_insert(note_whole_notes);
            harmony
        })
    }

    pub fn take_figured_bass(&mut self, note_whole_notes: Rational) -> Option<FiguredBass> {
        self.figured_bass.take().map(|mut figured_bass| {
            figured_bass.whole_notes.get_or_insert(note_whole_notes);
            figured_bass
        })
    }
}
