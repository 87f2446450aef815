//! The translator: receives element events and builds the MSR score
//!
//! All state of one translation lives here. Elements are dispatched on their
//! `ElementKind`; leaves are routed to the construct that owns them (note,
//! attributes, barline, direction, ...) by looking at the open elements.

use super::arithmetic::divisions_to_whole_notes;
use super::barlines::BarlineAction;
use super::chords::ChordBuilder;
use super::context::{
    ClefBuild, DirectionBuild, FiguredBassBuild, GroupBuild, HarmonyBuild, KeyBuild, MotionBuild, NoteBuild,
    ScorePartBuild, TimeBuild,
};
use super::element::{ElementKind, XmlElement};
use super::errors::Result;
use super::lyrics::{LyricBuild, LyricsAligner};
use super::part_groups::PartGroupResolver;
use super::pending::PendingQueues;
use super::registry::{self, VoiceKey};
use super::settings::OptionsQuery;
use super::tuplets::TupletStack;
use super::walker::ElementVisitor;
use crate::diagnostics::Reporter;
use crate::msr::attributes::Transpose;
use crate::msr::barline::BarlineSpec;
use crate::msr::note::{DoubleTremolo, NoteId, Tuplet};
use crate::msr::score::{Credit, Part, PartGroup, PartGroupMember, PartIndex, Score};
use crate::msr::types::{PitchNaming, Rational};
use crate::msr::voice::MeasureElement;
use std::collections::HashMap;
use std::mem;
use std::str::FromStr;

use ElementKind as K;

pub struct Translator<'r> {
    pub(super) reporter: &'r mut dyn Reporter,
    pub(super) naming: PitchNaming,
    pub(super) score: Score,

    /// Kinds of the currently open elements, outermost first
    open: Vec<ElementKind>,

    pub(super) groups: PartGroupResolver,
    pub(super) part_ids: HashMap<String, PartIndex>,
    pub(super) current_part: Option<PartIndex>,
    last_note_id: u32,

    pub(super) pending: PendingQueues,
    pub(super) tuplets: TupletStack,
    pub(super) chords: ChordBuilder,
    pub(super) lyrics: LyricsAligner,
    pub(super) stanza_number: String,
    /// Double tremolo whose second element has not been seen yet
    pub(super) tremolo: Option<(VoiceKey, DoubleTremolo)>,
    /// Right barline actions, run once the measure is finalized
    pub(super) deferred_actions: Vec<(BarlineAction, usize)>,

    // constructs being read
    pub(super) note: Option<NoteBuild>,
    pub(super) lyric: Option<LyricBuild>,
    pub(super) key: Option<KeyBuild>,
    pub(super) time: Option<TimeBuild>,
    pub(super) clef: Option<ClefBuild>,
    pub(super) transpose: Option<Transpose>,
    pub(super) barline: Option<BarlineSpec>,
    pub(super) direction: Option<DirectionBuild>,
    pub(super) harmony: Option<HarmonyBuild>,
    pub(super) figured_bass: Option<FiguredBassBuild>,
    pub(super) group: Option<GroupBuild>,
    pub(super) score_part: Option<ScorePartBuild>,
    pub(super) credit: Option<Credit>,
    pub(super) motion: Option<MotionBuild>,
}

impl<'r> Translator<'r> {
    pub fn new(options: &dyn OptionsQuery, reporter: &'r mut dyn Reporter) -> Self {
        let naming = options.pitch_naming();
        Self {
            reporter,
            naming,
            score: Score::new(naming),
            open: Vec::new(),
            groups: PartGroupResolver::new(),
            part_ids: HashMap::new(),
            current_part: None,
            last_note_id: 0,
            pending: PendingQueues::new(options),
            tuplets: TupletStack::new(),
            chords: ChordBuilder::new(),
            lyrics: LyricsAligner::new(),
            stanza_number: "1".to_string(),
            tremolo: None,
            deferred_actions: Vec::new(),
            note: None,
            lyric: None,
            key: None,
            time: None,
            clef: None,
            transpose: None,
            barline: None,
            direction: None,
            harmony: None,
            figured_bass: None,
            group: None,
            score_part: None,
            credit: None,
            motion: None,
        }
    }

    /// Hand the finished score over
    pub fn finish(self) -> Score {
        self.score
    }

    pub(super) fn next_note_id(&mut self) -> NoteId {
        self.last_note_id += 1;
        NoteId(self.last_note_id)
    }

    /// Kind of the element enclosing the current one
    pub(super) fn parent(&self) -> Option<ElementKind> {
        self.open.last().copied()
    }

    pub(super) fn inside(&self, kind: ElementKind) -> bool {
        self.open.contains(&kind)
    }

    /// Innermost open construct that reads its own leaves
    fn owner(&self) -> Option<ElementKind> {
        self.open.iter().rev().copied().find(|kind| {
            matches!(
                kind,
                K::Note
                    | K::Attributes
                    | K::Barline
                    | K::Direction
                    | K::Harmony
                    | K::FiguredBass
                    | K::Backup
                    | K::Forward
                    | K::PartGroup
                    | K::ScorePart
                    | K::Print
            )
        })
    }

    pub(super) fn current_part_mut(&mut self) -> Option<&mut Part> {
        let index = self.current_part?;
        self.score.parts.get_mut(index.0)
    }

    // ------------------------------------------------------------------
    // value parsing
    // ------------------------------------------------------------------

    /// Leaf text as a number; a bad value is an error and yields `None`
    pub(super) fn number<T: FromStr>(&mut self, element: &XmlElement) -> Option<T> {
        match element.text().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.reporter.report_error(
                    element.line,
                    &format!("<{}> value \"{}\" is not a valid number", element.tag, element.text()),
                );
                None
            }
        }
    }

    /// `duration` divisions as whole notes; out of range is an error and yields zero
    pub(super) fn whole_notes(&mut self, duration: u32, divisions: u32, input_line: usize) -> Rational {
        match divisions_to_whole_notes(duration, divisions) {
            Some(whole_notes) => whole_notes,
            None => {
                self.reporter.report_error(
                    input_line,
                    &format!("duration {} at {} divisions per quarter is out of range, using 0", duration, divisions),
                );
                Rational::from_integer(0)
            }
        }
    }

    /// Optional numeric attribute; a bad value is a warning
    pub(super) fn attribute_number<T: FromStr>(&mut self, element: &XmlElement, name: &str) -> Option<T> {
        let raw = element.attribute(name)?;
        match raw.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.reporter.report_warning(
                    element.line,
                    &format!("<{} {}=\"{}\"> is not a valid number, ignored", element.tag, name, raw),
                );
                None
            }
        }
    }

    /// Optional enumerated attribute; an unknown value is a warning
    pub(super) fn attribute_enum<T>(
        &mut self,
        element: &XmlElement,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = element.attribute(name)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.reporter.report_warning(
                element.line,
                &format!("unknown <{} {}=\"{}\">, ignored", element.tag, name, raw),
            );
        }
        parsed
    }

    /// Enumerated leaf text; an unknown value is a warning
    pub(super) fn text_enum<T>(&mut self, element: &XmlElement, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let parsed = parse(element.text());
        if parsed.is_none() {
            self.reporter.report_warning(
                element.line,
                &format!("unknown <{}> value \"{}\", ignored", element.tag, element.text()),
            );
        }
        parsed
    }

    // ------------------------------------------------------------------
    // dispatch
    // ------------------------------------------------------------------

    fn handle_start(&mut self, element: &XmlElement) -> Result<()> {
        match element.kind {
            K::ScorePartwise | K::PartList => {}
            K::Part => self.start_part(element),
            K::Measure => self.start_measure(element),
            K::Backup | K::Forward => {
                self.motion = Some(MotionBuild {
                    duration: 0,
                    voice: 1,
                    staff: 1,
                    input_line: element.line,
                });
            }
            K::Note => self.start_note(element),
            K::Key | K::Time | K::Clef | K::Transpose if self.inside(K::Attributes) => self.start_attribute(element),
            K::Barline => self.start_barline(element),
            K::Direction => self.start_direction(element),
            K::Harmony => self.harmony = Some(HarmonyBuild::new(element.line)),
            K::FiguredBass => {
                let parentheses = element.attribute("parentheses") == Some("yes");
                self.figured_bass = Some(FiguredBassBuild::new(parentheses, element.line));
            }
            K::PartGroup => self.start_part_group(element),
            K::ScorePart => self.start_score_part(element),
            K::Credit => self.start_credit(element),
            _ => self.handle_leaf(element),
        }
        Ok(())
    }

    fn handle_leaf(&mut self, element: &XmlElement) {
        match self.owner() {
            Some(K::Note) => self.note_child(element),
            Some(K::Attributes) => self.attributes_child(element),
            Some(K::Barline) => self.barline_child(element),
            Some(K::Direction) => self.direction_child(element),
            Some(K::Harmony) => self.harmony_child(element),
            Some(K::FiguredBass) => self.figured_bass_child(element),
            Some(K::Backup) | Some(K::Forward) => self.motion_child(element),
            Some(K::PartGroup) => self.part_group_child(element),
            Some(K::ScorePart) => self.score_part_child(element),
            Some(K::Print) => {}
            _ => self.header_child(element),
        }
    }

    fn handle_end(&mut self, element: &XmlElement) -> Result<()> {
        match element.kind {
            K::Part => self.end_part(element),
            K::Measure => self.end_measure(element),
            K::Backup => self.end_backup(),
            K::Forward => self.end_forward(),
            K::Note => return self.end_note(),
            K::Lyric => self.end_lyric(),
            K::Key | K::Time | K::Clef | K::Transpose if self.inside(K::Attributes) => self.end_attribute(element),
            K::Barline => self.end_barline(),
            K::Direction => self.end_direction(),
            K::Degree => {
                if let Some(harmony) = self.harmony.as_mut() {
                    harmony.finish_degree();
                }
            }
            K::Harmony => self.end_harmony(element),
            K::Figure => {
                if let Some(figured_bass) = self.figured_bass.as_mut() {
                    if let Some(figure) = figured_bass.figure.take() {
                        figured_bass.figures.push(figure);
                    }
                }
            }
            K::FiguredBass => {
                if let Some(figured_bass) = self.figured_bass.take() {
                    self.pending.set_figured_bass(figured_bass.build(), &mut *self.reporter);
                }
            }
            K::PartGroup => return self.end_part_group(),
            K::ScorePart => self.end_score_part(),
            K::PartList => return self.groups.close_all(element.line, &mut self.score, &mut *self.reporter),
            K::Credit => {
                if let Some(credit) = self.credit.take() {
                    self.score.credits.push(credit);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // parts
    // ------------------------------------------------------------------

    fn start_part(&mut self, element: &XmlElement) {
        let id = element.attribute("id").unwrap_or("").to_string();
        let index = match self.part_ids.get(&id).copied() {
            Some(index) => index,
            None => {
                self.reporter.report_error(
                    element.line,
                    &format!("part \"{}\" is not declared in the part list", id),
                );
                let index = PartIndex(self.score.parts.len());
                self.score.parts.push(Part::new(&id, element.line));
                self.part_ids.insert(id.clone(), index);
                let mut group = PartGroup::implicit(element.line);
                group.members.push(PartGroupMember::Part(index));
                self.score.part_groups.push(group);
                index
            }
        };
        log::debug!("translating part {} (line {})", id, element.line);

        self.current_part = Some(index);
        self.tuplets = TupletStack::new();
        self.chords.reset();
        self.lyrics.reset();
        self.stanza_number = "1".to_string();
        self.tremolo = None;
        self.deferred_actions.clear();
    }

    fn end_part(&mut self, element: &XmlElement) {
        let Some(index) = self.current_part else {
            return;
        };
        let line = element.line;

        if let Some(owner) = self.tuplets.voice() {
            if self.tuplets.has_explicit() {
                self.reporter
                    .report_warning(line, "tuplet still open at the end of the part, closed here");
            }
            let done = self.tuplets.finalize_all();
            self.emit_tuplets(owner, done);
        }
        self.flush_tremolo(line);

        let part = &mut self.score.parts[index.0];
        let id = part.id.clone();
        for voice in part.voices_mut() {
            if voice.finish() {
                self.reporter.report_warning(
                    line,
                    &format!("repeat in voice {} of part {} is never terminated", voice.number, id),
                );
            }
        }

        for (kind, count) in self.pending.leftovers() {
            self.reporter.report_warning(
                line,
                &format!("{} pending {} left without a note at the end of part {}", count, kind.name(), id),
            );
        }
        self.pending.clear();
        self.current_part = None;
    }

    // ------------------------------------------------------------------
    // measures
    // ------------------------------------------------------------------

    fn start_measure(&mut self, element: &XmlElement) {
        let Some(part) = self.current_part_mut() else {
            return;
        };
        let number = element.attribute("number").unwrap_or("").to_string();
        log::debug!("part {}: measure {}", part.id, number);

        part.measure_number = number.clone();
        part.position = Rational::from_integer(0);
        part.measures_started += 1;
        if part.voices().next().is_none() {
            registry::voice_for(part, 1, 1, element.line);
        }
        for voice in part.voices_mut() {
            voice.create_measure(&number, element.line);
        }
        self.deferred_actions.clear();
    }

    fn end_measure(&mut self, element: &XmlElement) {
        let Some(index) = self.current_part else {
            return;
        };

        if let Some(owner) = self.tuplets.voice() {
            let mut done = self.tuplets.finalize_pending();
            done.extend(self.tuplets.finalize_implicit());
            self.emit_tuplets(owner, done);
        }
        self.chords.end();
        self.flush_tremolo(element.line);

        let actions = mem::take(&mut self.deferred_actions);
        let part = &mut self.score.parts[index.0];
        let first_in_part = part.measures_started == 1;
        for voice in part.voices_mut() {
            voice.finalize_measure(first_in_part);
            for (action, line) in &actions {
                action.apply(voice, *line, &mut *self.reporter);
            }
        }
    }

    // ------------------------------------------------------------------
    // backup and forward
    // ------------------------------------------------------------------

    fn motion_child(&mut self, element: &XmlElement) {
        let value = match element.kind {
            K::Duration | K::Voice | K::Staff => self.number::<u32>(element),
            _ => return,
        };
        let (Some(motion), Some(value)) = (self.motion.as_mut(), value) else {
            return;
        };
        match element.kind {
            K::Duration => motion.duration = value,
            K::Voice => motion.voice = value,
            _ => motion.staff = value,
        }
    }

    /// Close what a change of position ends: pending tuplet stops and chords
    fn close_before_motion(&mut self) {
        if let Some(owner) = self.tuplets.voice() {
            let done = self.tuplets.finalize_pending();
            self.emit_tuplets(owner, done);
        }
        self.chords.end();
    }

    fn end_backup(&mut self) {
        let Some(motion) = self.motion.take() else {
            return;
        };
        self.close_before_motion();
        let Some(divisions) = self.current_part_mut().map(|part| part.divisions) else {
            return;
        };
        let amount = self.whole_notes(motion.duration, divisions, motion.input_line);
        let Some(part) = self.current_part_mut() else {
            return;
        };
        let zero = Rational::from_integer(0);
        if amount > part.position {
            self.reporter.report_warning(
                motion.input_line,
                "<backup> goes past the start of the measure, stopped there",
            );
        }
        if let Some(part) = self.current_part_mut() {
            part.position = (part.position - amount).max(zero);
        }
    }

    fn end_forward(&mut self) {
        let Some(motion) = self.motion.take() else {
            return;
        };
        self.close_before_motion();
        let Some(divisions) = self.current_part_mut().map(|part| part.divisions) else {
            return;
        };
        let amount = self.whole_notes(motion.duration, divisions, motion.input_line);
        let Some(part) = self.current_part_mut() else {
            return;
        };
        let position = part.position;
        let voice = registry::voice_for(part, motion.staff, motion.voice, motion.input_line);
        voice.append_timed(
            MeasureElement::Skip {
                whole_notes: amount,
                position_in_measure: position,
            },
            position,
            amount,
        );
        part.position += amount;
    }

    // ------------------------------------------------------------------
    // containers finished out of line
    // ------------------------------------------------------------------

    /// Append finished outermost tuplets to the voice that owns them
    pub(super) fn emit_tuplets(&mut self, owner: VoiceKey, done: Vec<Tuplet>) {
        if done.is_empty() {
            return;
        }
        let Some(voice) = self
            .score
            .parts
            .get_mut(owner.part)
            .and_then(|part| part.voice_mut(owner.voice))
        else {
            return;
        };
        for tuplet in done {
            voice.append(MeasureElement::Tuplet(tuplet));
        }
    }

    /// Append a double tremolo that never saw its second element
    pub(super) fn flush_tremolo(&mut self, input_line: usize) {
        let Some((owner, tremolo)) = self.tremolo.take() else {
            return;
        };
        self.reporter.report_warning(
            input_line,
            &format!("double tremolo started at line {} is never stopped", tremolo.input_line),
        );
        if let Some(voice) = self
            .score
            .parts
            .get_mut(owner.part)
            .and_then(|part| part.voice_mut(owner.voice))
        {
            voice.append(MeasureElement::DoubleTremolo(tremolo));
        }
    }
}

impl ElementVisitor for Translator<'_> {
    fn visit_start(&mut self, element: &XmlElement) -> Result<()> {
        let result = self.handle_start(element);
        self.open.push(element.kind);
        result
    }

    fn visit_end(&mut self, element: &XmlElement) -> Result<()> {
        self.open.pop();
        self.handle_end(element)
    }
}
