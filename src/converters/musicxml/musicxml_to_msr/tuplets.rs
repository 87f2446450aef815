//! Stack of tuplets under construction
//!
//! A stop marker does not seal the tuplet at once: the stop-marked note may
//! still become the first note of a chord, which replaces it inside the
//! tuplet. Stops are counted and applied at the next non-chord note, at the
//! end of the measure or at a backup.

use super::errors::{Result, TranslationError};
use super::registry::VoiceKey;
use crate::msr::note::{Note, Tuplet};
use crate::msr::types::Rational;

#[derive(Debug)]
struct OpenTuplet {
    tuplet: Tuplet,
    /// Written length after which an implicit tuplet is complete
    implicit_target: Option<Rational>,
}

#[derive(Debug, Default)]
pub struct TupletStack {
    open: Vec<OpenTuplet>,
    pending_stops: usize,
    voice: Option<VoiceKey>,
}

impl TupletStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn pending_stops(&self) -> usize {
        self.pending_stops
    }

    /// Voice the tuplets on the stack belong to
    pub fn voice(&self) -> Option<VoiceKey> {
        self.voice
    }

    pub fn has_explicit(&self) -> bool {
        self.open.iter().any(|t| !t.tuplet.implicit)
    }

    /// Product of the ratios of all open tuplets, (1, 1) when none is open
    pub fn enclosing_ratio(&self) -> (u32, u32) {
        self.open.iter().fold((1, 1), |(actual, normal), open| {
            (
                actual.saturating_mul(open.tuplet.actual_notes.max(1)),
                normal.saturating_mul(open.tuplet.normal_notes.max(1)),
            )
        })
    }

    pub fn top_mut(&mut self) -> Option<&mut Tuplet> {
        self.open.last_mut().map(|t| &mut t.tuplet)
    }

    pub fn push(&mut self, tuplet: Tuplet, voice: VoiceKey) {
        log::debug!(
            "tuplet {} ({}:{}) started, depth {}",
            tuplet.number,
            tuplet.actual_notes,
            tuplet.normal_notes,
            self.open.len() + 1
        );
        if self.open.is_empty() {
            self.voice = Some(voice);
        }
        self.open.push(OpenTuplet {
            tuplet,
            implicit_target: None,
        });
    }

    /// Start a tuplet inferred from a time modification alone
    pub fn push_implicit(&mut self, mut tuplet: Tuplet, first_display: Rational, voice: VoiceKey) {
        tuplet.implicit = true;
        let target = first_display * Rational::from_integer(tuplet.actual_notes.max(1) as i32);
        self.push(tuplet, voice);
        if let Some(top) = self.open.last_mut() {
            top.implicit_target = Some(target);
        }
    }

    /// Add a member note to the innermost tuplet
    pub fn add_note(&mut self, note: Note) -> Result<()> {
        let line = note.input_line;
        let Some(top) = self.open.last_mut() else {
            return Err(TranslationError::internal(
                line,
                "tuplet member with no tuplet started",
            ));
        };
        top.tuplet.add_note(note);

        // an implicit tuplet is complete once its written length is reached
        if let Some(target) = top.implicit_target {
            let written = top
                .tuplet
                .members
                .iter()
                .fold(Rational::from_integer(0), |acc, m| acc + m.display_whole_notes());
            if written >= target {
                top.implicit_target = None;
                self.pending_stops += 1;
            }
        }
        Ok(())
    }

    /// Record a stop marker; the tuplet is sealed later
    pub fn stop(&mut self, input_line: usize) -> Result<()> {
        if self.pending_stops >= self.open.len() {
            return Err(TranslationError::internal(
                input_line,
                "tuplet stop with no tuplet started",
            ));
        }
        self.pending_stops += 1;
        Ok(())
    }

    /// Seal one tuplet. A nested one goes into its parent; an outermost one
    /// is returned for the voice.
    fn finalize_one(&mut self) -> Option<Tuplet> {
        let finished = self.open.pop()?.tuplet;
        log::debug!(
            "tuplet {} finalized with {} members",
            finished.number,
            finished.members.len()
        );
        match self.open.last_mut() {
            Some(parent) => {
                parent.tuplet.add_tuplet(finished);
                None
            }
            None => Some(finished),
        }
    }

    /// Apply the pending stops. Returns outermost tuplets for the voice.
    pub fn finalize_pending(&mut self) -> Vec<Tuplet> {
        let mut done = Vec::new();
        while self.pending_stops > 0 {
            self.pending_stops -= 1;
            if let Some(tuplet) = self.finalize_one() {
                done.push(tuplet);
            }
        }
        self.forget_voice_if_empty();
        done
    }

    /// Seal everything still open
    pub fn finalize_all(&mut self) -> Vec<Tuplet> {
        let mut done = Vec::new();
        while !self.open.is_empty() {
            if let Some(tuplet) = self.finalize_one() {
                done.push(tuplet);
            }
        }
        self.pending_stops = 0;
        self.forget_voice_if_empty();
        done
    }

    /// Seal implicit tuplets on top of the stack
    pub fn finalize_implicit(&mut self) -> Vec<Tuplet> {
        let mut done = Vec::new();
        while self.open.last().map_or(false, |t| t.tuplet.implicit) {
            self.pending_stops = self.pending_stops.saturating_sub(1);
            if let Some(tuplet) = self.finalize_one() {
                done.push(tuplet);
            }
        }
        self.forget_voice_if_empty();
        done
    }

    fn forget_voice_if_empty(&mut self) {
        if self.open.is_empty() {
            self.voice = None;
            self.pending_stops = 0;
        }
    }
}
