//! Voices, their segments and repeats, and the measures inside them
//!
//! A voice's content is a sequence of items: plain segments of measures and
//! repeats. Measures are always appended to the current segment; repeat and
//! ending boundaries move finished segments into the repeat being built.

use super::attributes::{Clef, Key, Tempo, Time, Transpose};
use super::barline::Barline;
use super::lyrics::Stanza;
use super::note::{Chord, DoubleTremolo, Note, Tuplet};
use super::types::Rational;
use serde::Serialize;
use std::collections::BTreeMap;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeasureKind {
    /// Not finalized yet
    Unknown,
    Full,
    Incomplete,
    /// Incomplete first measure of a voice (anacrusis)
    Upbeat,
    Overflowing,
    /// No time elapsed in this voice
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MeasureElement {
    Note(Note),
    Chord(Chord),
    Tuplet(Tuplet),
    DoubleTremolo(DoubleTremolo),
    Barline(Barline),
    Clef(Clef),
    Key(Key),
    Time(Time),
    Transpose(Transpose),
    Tempo(Tempo),
    /// Invisible filler, from `<forward>`
    Skip {
        whole_notes: Rational,
        position_in_measure: Rational,
    },
    /// The voice moves to another staff from here on
    VoiceStaffChange {
        from_staff: u32,
        to_staff: u32,
        input_line: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub number: String,
    pub kind: MeasureKind,
    /// Whole notes elapsed in this voice so far
    pub length: Rational,
    pub full_length: Option<Rational>,
    pub elements: Vec<MeasureElement>,
    pub input_line: usize,
}

impl Measure {
    pub fn new(number: &str, input_line: usize) -> Self {
        Self {
            number: number.to_string(),
            kind: MeasureKind::Unknown,
            length: Rational::from_integer(0),
            full_length: None,
            elements: Vec::new(),
            input_line,
        }
    }

    /// Record that something sounds from `position` for `duration`
    pub fn extend_length(&mut self, position: Rational, duration: Rational) {
        let end = position + duration;
        if end > self.length {
            self.length = end;
        }
    }

    /// Compute the measure kind against the expected full length
    pub fn finalize(&mut self, full_length: Option<Rational>, first_in_part: bool) {
        self.full_length = full_length;
        let zero = Rational::from_integer(0);
        self.kind = if self.length == zero {
            MeasureKind::Empty
        } else {
            match full_length {
                None => MeasureKind::Full,
                Some(full) if self.length == full => MeasureKind::Full,
                Some(full) if self.length > full => MeasureKind::Overflowing,
                Some(_) if first_in_part => MeasureKind::Upbeat,
                Some(_) => MeasureKind::Incomplete,
            }
        };
    }

    pub fn is_finalized(&self) -> bool {
        self.kind != MeasureKind::Unknown
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Note(note) => Some(note),
            _ => None,
        })
    }

    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Chord(chord) => Some(chord),
            _ => None,
        })
    }

    pub fn tuplets(&self) -> impl Iterator<Item = &Tuplet> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Tuplet(tuplet) => Some(tuplet),
            _ => None,
        })
    }

    pub fn barlines(&self) -> impl Iterator<Item = &Barline> {
        self.elements.iter().filter_map(|e| match e {
            MeasureElement::Barline(barline) => Some(barline),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segment {
    pub measures: Vec<Measure>,
}

impl Segment {
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn measure_numbers(&self) -> Vec<&str> {
        self.measures.iter().map(|m| m.number.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepeatEndingKind {
    Hooked,
    Hookless,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatEnding {
    pub numbers: Vec<u32>,
    pub kind: RepeatEndingKind,
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repeat {
    /// No forward repeat was seen; the repeat starts where the music does
    pub implicit: bool,
    pub common_part: Vec<Segment>,
    pub endings: Vec<RepeatEnding>,
}

impl Repeat {
    fn new(implicit: bool) -> Self {
        Self {
            implicit,
            common_part: Vec::new(),
            endings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VoiceItem {
    Segment(Segment),
    Repeat(Repeat),
}

/// An ending whose start barline has been seen, but not its end
#[derive(Debug, Clone, PartialEq, Serialize)]
struct OpenEnding {
    numbers: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voice {
    pub number: u32,
    /// Staff the voice was created in
    pub home_staff: u32,
    /// Staff currently displaying the voice
    pub displaying_staff: u32,
    pub items: Vec<VoiceItem>,
    pub current_segment: Segment,
    open_repeat: Option<Repeat>,
    open_ending: Option<OpenEnding>,
    pub stanzas: BTreeMap<String, Stanza>,
    pub clef: Option<Clef>,
    pub key: Option<Key>,
    pub time: Option<Time>,
}

impl Voice {
    pub fn new(number: u32, staff: u32) -> Self {
        Self {
            number,
            home_staff: staff,
            displaying_staff: staff,
            items: Vec::new(),
            current_segment: Segment::default(),
            open_repeat: None,
            open_ending: None,
            stanzas: BTreeMap::new(),
            clef: None,
            key: None,
            time: None,
        }
    }

    // ------------------------------------------------------------------
    // measures
    // ------------------------------------------------------------------

    /// Open measure `number`, unless it is already the open measure
    pub fn create_measure(&mut self, number: &str, input_line: usize) {
        if let Some(measure) = self.current_segment.measures.last() {
            if measure.number == number && !measure.is_finalized() {
                return;
            }
        }
        self.current_segment.measures.push(Measure::new(number, input_line));
    }

    pub fn current_measure(&self) -> Option<&Measure> {
        self.current_segment.measures.last()
    }

    pub fn current_measure_mut(&mut self) -> Option<&mut Measure> {
        self.current_segment.measures.last_mut()
    }

    fn open_measure_mut(&mut self) -> &mut Measure {
        if self.current_segment.measures.is_empty() {
            self.current_segment.measures.push(Measure::new("", 0));
        }
        let last = self.current_segment.measures.len() - 1;
        &mut self.current_segment.measures[last]
    }

    /// Append an element that takes no time
    pub fn append(&mut self, element: MeasureElement) {
        self.open_measure_mut().elements.push(element);
    }

    /// Append an element sounding from `position` for `duration`
    pub fn append_timed(&mut self, element: MeasureElement, position: Rational, duration: Rational) {
        let measure = self.open_measure_mut();
        measure.extend_length(position, duration);
        measure.elements.push(element);
    }

    /// Account for time spent without a visible element
    pub fn advance(&mut self, position: Rational, duration: Rational) {
        self.open_measure_mut().extend_length(position, duration);
    }

    pub fn last_element_mut(&mut self) -> Option<&mut MeasureElement> {
        self.current_measure_mut().and_then(|m| m.elements.last_mut())
    }

    /// Remove the last element of the open measure if it is a note
    pub fn take_last_note(&mut self) -> Option<Note> {
        let measure = self.current_measure_mut()?;
        match measure.elements.last() {
            Some(MeasureElement::Note(_)) => match measure.elements.pop() {
                Some(MeasureElement::Note(note)) => Some(note),
                _ => None,
            },
            _ => None,
        }
    }

    /// Only the part's first measure can be an upbeat, whichever measure
    /// the voice starts in
    pub fn finalize_measure(&mut self, first_in_part: bool) {
        let full_length = self.time.as_ref().and_then(|t| t.measure_whole_notes());
        if let Some(measure) = self.current_measure_mut() {
            if !measure.is_finalized() {
                measure.finalize(full_length, first_in_part);
            }
        }
    }

    // ------------------------------------------------------------------
    // repeats and endings
    // ------------------------------------------------------------------

    pub fn has_open_repeat(&self) -> bool {
        self.open_repeat.is_some()
    }

    pub fn in_ending(&self) -> bool {
        self.open_ending.is_some()
    }

    /// Forward repeat at the start of the open measure
    pub fn begin_repeat(&mut self) {
        let current = self.current_segment.measures.pop();
        self.close_open_repeat();
        self.flush_current_segment();
        self.open_repeat = Some(Repeat::new(false));
        self.current_segment.measures.extend(current);
    }

    /// Backward repeat at the end of the open measure, which is finalized.
    /// Returns true when the repeat had to be made implicit.
    pub fn end_repeat(&mut self) -> bool {
        let mut implicit = false;
        match self.open_repeat.as_ref() {
            None => {
                self.start_implicit_repeat();
                implicit = true;
            }
            Some(_) if self.open_ending.is_some() => {
                self.end_ending(RepeatEndingKind::Hooked, &[], false);
                return false;
            }
            Some(repeat) if !repeat.endings.is_empty() => {
                self.close_open_repeat();
                self.start_implicit_repeat();
                implicit = true;
            }
            Some(_) => {
                let segment = mem::take(&mut self.current_segment);
                if let Some(repeat) = self.open_repeat.as_mut() {
                    if !segment.is_empty() {
                        repeat.common_part.push(segment);
                    }
                }
            }
        }
        self.close_open_repeat();
        implicit
    }

    /// Ending start at the open measure. Returns true when the enclosing
    /// repeat had to be made implicit.
    pub fn begin_ending(&mut self, numbers: &[u32]) -> bool {
        let current = self.current_segment.measures.pop();
        let mut implicit = false;

        match self.open_repeat.as_ref() {
            None => {
                self.start_implicit_repeat();
                implicit = true;
            }
            Some(_) if self.open_ending.is_some() => {
                // previous ending never ended: it keeps what it has
                self.end_ending(RepeatEndingKind::Hookless, &[], false);
            }
            Some(repeat) if repeat.endings.is_empty() => {
                let segment = mem::take(&mut self.current_segment);
                if let Some(repeat) = self.open_repeat.as_mut() {
                    if !segment.is_empty() {
                        repeat.common_part.push(segment);
                    }
                }
            }
            Some(_) => {
                if !self.current_segment.is_empty() {
                    self.close_open_repeat();
                    self.start_implicit_repeat();
                    implicit = true;
                }
            }
        }

        self.open_ending = Some(OpenEnding {
            numbers: numbers.to_vec(),
        });
        self.current_segment.measures.extend(current);
        implicit
    }

    /// Ending end at the open measure, which is finalized. `last` closes the
    /// repeat as well. Returns false when no ending or repeat was open.
    pub fn end_ending(&mut self, kind: RepeatEndingKind, numbers: &[u32], last: bool) -> bool {
        let mut matched = true;
        if self.open_repeat.is_none() {
            // take the ending's measures out before gathering the common part
            let ending = mem::take(&mut self.current_segment);
            self.start_implicit_repeat();
            self.current_segment = ending;
            matched = false;
        }
        let numbers = match self.open_ending.take() {
            Some(open) if !open.numbers.is_empty() => open.numbers,
            Some(_) => numbers.to_vec(),
            None => {
                matched = false;
                numbers.to_vec()
            }
        };
        let segment = mem::take(&mut self.current_segment);
        if let Some(repeat) = self.open_repeat.as_mut() {
            repeat.endings.push(RepeatEnding {
                numbers,
                kind,
                segment,
            });
        }
        if last {
            self.close_open_repeat();
        }
        matched
    }

    /// Gather the segments since the last repeat into a new implicit repeat
    fn start_implicit_repeat(&mut self) {
        let split = self
            .items
            .iter()
            .rposition(|item| matches!(item, VoiceItem::Repeat(_)))
            .map_or(0, |index| index + 1);
        let mut repeat = Repeat::new(true);
        for item in self.items.drain(split..) {
            if let VoiceItem::Segment(segment) = item {
                repeat.common_part.push(segment);
            }
        }
        let segment = mem::take(&mut self.current_segment);
        if !segment.is_empty() {
            repeat.common_part.push(segment);
        }
        self.open_repeat = Some(repeat);
    }

    /// Move the open repeat into the items. Returns true if it was left
    /// unterminated.
    fn close_open_repeat(&mut self) -> bool {
        let Some(mut repeat) = self.open_repeat.take() else {
            return false;
        };
        let mut unterminated = false;
        if let Some(open) = self.open_ending.take() {
            repeat.endings.push(RepeatEnding {
                numbers: open.numbers,
                kind: RepeatEndingKind::Hookless,
                segment: mem::take(&mut self.current_segment),
            });
            unterminated = true;
        } else if repeat.endings.is_empty() && !self.current_segment.is_empty() {
            repeat.common_part.push(mem::take(&mut self.current_segment));
            unterminated = true;
        }
        self.items.push(VoiceItem::Repeat(repeat));
        unterminated
    }

    fn flush_current_segment(&mut self) {
        if !self.current_segment.is_empty() {
            let segment = mem::take(&mut self.current_segment);
            self.items.push(VoiceItem::Segment(segment));
        }
    }

    /// Close whatever is still open. Returns true if a repeat was left
    /// unterminated.
    pub fn finish(&mut self) -> bool {
        let unterminated = self.close_open_repeat();
        self.flush_current_segment();
        unterminated
    }

    // ------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------

    pub fn stanza_mut(&mut self, number: &str) -> &mut Stanza {
        self.stanzas
            .entry(number.to_string())
            .or_insert_with(|| Stanza::new(number))
    }

    /// Every measure in document order, through segments and repeats
    pub fn all_measures(&self) -> Vec<&Measure> {
        fn push_repeat<'a>(repeat: &'a Repeat, out: &mut Vec<&'a Measure>) {
            for segment in &repeat.common_part {
                out.extend(segment.measures.iter());
            }
            for ending in &repeat.endings {
                out.extend(ending.segment.measures.iter());
            }
        }

        let mut out = Vec::new();
        for item in &self.items {
            match item {
                VoiceItem::Segment(segment) => out.extend(segment.measures.iter()),
                VoiceItem::Repeat(repeat) => push_repeat(repeat, &mut out),
            }
        }
        if let Some(repeat) = &self.open_repeat {
            push_repeat(repeat, &mut out);
        }
        out.extend(self.current_segment.measures.iter());
        out
    }

    pub fn repeats(&self) -> impl Iterator<Item = &Repeat> {
        self.items.iter().filter_map(|item| match item {
            VoiceItem::Repeat(repeat) => Some(repeat),
            _ => None,
        })
    }
}
