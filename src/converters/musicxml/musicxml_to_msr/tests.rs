//! Unit tests for MusicXML → MSR translation

use super::*;
use crate::msr::lyrics::SyllableKind;
use crate::msr::note::{NoteKind, TremoloElement, TupletMember};
use crate::msr::types::{DiatonicStep, Rational};
use crate::msr::voice::{MeasureElement, MeasureKind, RepeatEndingKind, Voice, VoiceItem};

const FOUR_FOUR: &str = "<time><beats>4</beats><beat-type>4</beat-type></time>";

fn single_part(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Music</part-name></score-part>
  </part-list>
  <part id="P1">
{}
  </part>
</score-partwise>"#,
        body
    )
}

fn note(step: &str, duration: u32, note_type: &str) -> String {
    format!(
        "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>{}</duration><type>{}</type></note>",
        step, duration, note_type
    )
}

fn translate(xml: &str) -> Translation {
    translate_musicxml(xml, &TranslationSettings::default()).expect("translation succeeds")
}

fn voice(translation: &Translation, number: u32) -> &Voice {
    translation.score.parts[0].voice(number).expect("voice exists")
}

#[test]
fn test_simple_measure_is_full() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}{}{}
    </measure>"#,
        FOUR_FOUR,
        note("C", 4, "quarter"),
        note("D", 4, "quarter"),
        note("E", 8, "half"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    assert_eq!(measures.len(), 1);
    assert_eq!(measures[0].kind, MeasureKind::Full);

    let notes: Vec<_> = measures[0].notes().collect();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[1].position_in_measure, Rational::new(1, 4));
    assert_eq!(notes[2].sounding_whole_notes, Rational::new(1, 2));
    assert!(notes.iter().all(|n| n.kind == NoteKind::Standalone));
}

#[test]
fn test_triplet_is_built_and_closed_by_the_next_note() {
    let triplet_note = |step: &str, marker: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>5</octave></pitch><duration>4</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations>{}</notations></note>"#,
            step, marker
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>12</divisions>{}</attributes>
      {}{}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        triplet_note("C", r#"<tuplet type="start" bracket="yes"/>"#),
        triplet_note("D", ""),
        triplet_note("E", r#"<tuplet type="stop"/>"#),
        note("F", 12, "quarter"),
        note("G", 24, "half"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    let measure = measures[0];
    assert_eq!(measure.kind, MeasureKind::Full);

    let tuplets: Vec<_> = measure.tuplets().collect();
    assert_eq!(tuplets.len(), 1);
    let tuplet = tuplets[0];
    assert_eq!((tuplet.actual_notes, tuplet.normal_notes), (3, 2));
    assert_eq!(tuplet.bracket, Some(true));
    assert!(!tuplet.implicit);
    assert_eq!(tuplet.members.len(), 3);
    assert_eq!(tuplet.sounding_whole_notes(), Rational::new(1, 4));
    assert!(tuplet
        .notes()
        .iter()
        .all(|n| n.kind == NoteKind::TupletMember && n.sounding_whole_notes == Rational::new(1, 12)));

    // the quarter follows the tuplet, not inside it
    let notes: Vec<_> = measure.notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].position_in_measure, Rational::new(1, 4));
}

#[test]
fn test_implicit_tuplet_from_time_modification() {
    let eighth = |step: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>4</octave></pitch><duration>4</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification></note>"#,
            step
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>12</divisions>{}</attributes>
      {}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        eighth("A"),
        eighth("B"),
        eighth("C"),
        note("D", 36, "half"),
    ));
    let translation = translate(&xml);

    let measures = voice(&translation, 1).all_measures();
    let tuplets: Vec<_> = measures[0].tuplets().collect();
    assert_eq!(tuplets.len(), 1);
    assert!(tuplets[0].implicit);
    assert_eq!(tuplets[0].members.len(), 3);
    assert_eq!(measures[0].notes().count(), 1);
}

#[test]
fn test_chord_promotion() {
    let chord_note = |step: &str| {
        format!(
            "<note><chord/><pitch><step>{}</step><octave>4</octave></pitch><duration>4</duration><type>quarter</type></note>",
            step
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}{}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        note("C", 4, "quarter"),
        chord_note("E"),
        chord_note("G"),
        note("D", 8, "half"),
        note("B", 4, "quarter"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    let measure = measures[0];
    assert_eq!(measure.kind, MeasureKind::Full);

    let chords: Vec<_> = measure.chords().collect();
    assert_eq!(chords.len(), 1);
    let steps: Vec<_> = chords[0].pitches().iter().map(|p| p.step).collect();
    assert_eq!(steps, vec![DiatonicStep::C, DiatonicStep::E, DiatonicStep::G]);
    assert!(chords[0].notes.iter().all(|n| n.kind == NoteKind::ChordMember));
    assert!(chords[0]
        .notes
        .iter()
        .all(|n| n.position_in_measure == Rational::from_integer(0)));

    let notes: Vec<_> = measure.notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].position_in_measure, Rational::new(1, 4));
}

#[test]
fn test_chord_inside_tuplet() {
    let triplet_note = |step: &str, chord: bool, marker: &str| {
        format!(
            r#"<note>{}<pitch><step>{}</step><octave>4</octave></pitch><duration>4</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations>{}</notations></note>"#,
            if chord { "<chord/>" } else { "" },
            step,
            marker
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>12</divisions>{}</attributes>
      {}{}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        triplet_note("C", false, r#"<tuplet type="start"/>"#),
        triplet_note("D", false, ""),
        triplet_note("F", true, ""),
        triplet_note("E", false, r#"<tuplet type="stop"/>"#),
        note("G", 36, "half"),
    ));
    let translation = translate(&xml);
    assert!(!translation.diagnostics.has_errors());

    let measures = voice(&translation, 1).all_measures();
    let tuplets: Vec<_> = measures[0].tuplets().collect();
    assert_eq!(tuplets.len(), 1);
    let members = &tuplets[0].members;
    assert_eq!(members.len(), 3);
    assert!(matches!(members[0], TupletMember::Note(_)));
    assert!(matches!(&members[1], TupletMember::Chord(chord) if chord.notes.len() == 2));
    assert!(matches!(members[2], TupletMember::Note(_)));
}

#[test]
fn test_rest_marked_as_chord_is_dropped() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}
      <note><chord/><rest/><duration>4</duration><type>quarter</type></note>
    </measure>"#,
        FOUR_FOUR,
        note("C", 16, "whole"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.has_errors());
    assert!(translation.diagnostics.mentions("chord member"));

    let measures = voice(&translation, 1).all_measures();
    assert_eq!(measures[0].notes().count(), 1);
    assert_eq!(measures[0].chords().count(), 0);
}

#[test]
fn test_grace_note_takes_no_time() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      <note><grace slash="yes"/><pitch><step>D</step><octave>5</octave></pitch><type>eighth</type></note>
      {}
    </measure>"#,
        FOUR_FOUR,
        note("C", 16, "whole"),
    ));
    let translation = translate(&xml);

    let measures = voice(&translation, 1).all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].kind, NoteKind::Grace);
    assert!(notes[0].grace_slash);
    assert_eq!(notes[0].sounding_whole_notes, Rational::from_integer(0));
    assert_eq!(notes[1].position_in_measure, Rational::from_integer(0));
    assert_eq!(measures[0].kind, MeasureKind::Full);
}

#[test]
fn test_double_tremolo() {
    let tremolo_note = |step: &str, kind: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>4</octave></pitch><duration>8</duration><type>half</type>
        <notations><ornaments><tremolo type="{}">2</tremolo></ornaments></notations></note>"#,
            step, kind
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}{}
    </measure>"#,
        FOUR_FOUR,
        tremolo_note("C", "start"),
        tremolo_note("E", "stop"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    let tremolo = measures[0]
        .elements
        .iter()
        .find_map(|e| match e {
            MeasureElement::DoubleTremolo(t) => Some(t),
            _ => None,
        })
        .expect("double tremolo");
    assert_eq!(tremolo.marks, 2);
    assert!(matches!(tremolo.first, Some(TremoloElement::Note(_))));
    assert!(matches!(tremolo.second, Some(TremoloElement::Note(_))));
    assert_eq!(measures[0].kind, MeasureKind::Full);
}

#[test]
fn test_repeat_with_two_endings() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{four}</attributes>
      <barline location="left"><bar-style>heavy-light</bar-style><repeat direction="forward"/></barline>
      {n}
    </measure>
    <measure number="2">
      <barline location="left"><ending number="1" type="start"/></barline>
      {n}
      <barline location="right"><bar-style>light-heavy</bar-style><ending number="1" type="stop"/><repeat direction="backward"/></barline>
    </measure>
    <measure number="3">
      <barline location="left"><ending number="2" type="start"/></barline>
      {n}
      <barline location="right"><ending number="2" type="discontinue"/></barline>
    </measure>
    <measure number="4">
      {n}
    </measure>"#,
        four = FOUR_FOUR,
        n = note("C", 16, "whole"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let voice = voice(&translation, 1);
    assert_eq!(voice.items.len(), 2);
    let VoiceItem::Repeat(repeat) = &voice.items[0] else {
        panic!("expected a repeat, got {:?}", voice.items[0]);
    };
    assert!(!repeat.implicit);
    assert_eq!(repeat.common_part.len(), 1);
    assert_eq!(repeat.common_part[0].measure_numbers(), vec!["1"]);
    assert_eq!(repeat.endings.len(), 2);
    assert_eq!(repeat.endings[0].numbers, vec![1]);
    assert_eq!(repeat.endings[0].kind, RepeatEndingKind::Hooked);
    assert_eq!(repeat.endings[0].segment.measure_numbers(), vec!["2"]);
    assert_eq!(repeat.endings[1].numbers, vec![2]);
    assert_eq!(repeat.endings[1].kind, RepeatEndingKind::Hookless);
    assert!(matches!(&voice.items[1], VoiceItem::Segment(s) if s.measure_numbers() == vec!["4"]));
}

#[test]
fn test_backward_repeat_without_forward_is_implicit() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{four}</attributes>
      {n}
    </measure>
    <measure number="2">
      {n}
      <barline location="right"><bar-style>light-heavy</bar-style><repeat direction="backward"/></barline>
    </measure>"#,
        four = FOUR_FOUR,
        n = note("C", 16, "whole"),
    ));
    let translation = translate(&xml);

    let repeats: Vec<_> = voice(&translation, 1).repeats().collect();
    assert_eq!(repeats.len(), 1);
    assert!(repeats[0].implicit);
    let numbers: Vec<_> = repeats[0]
        .common_part
        .iter()
        .flat_map(|segment| segment.measure_numbers())
        .collect();
    assert_eq!(numbers, vec!["1", "2"]);
}

#[test]
fn test_lyrics_melisma() {
    let sung = |step: &str, text: &str, extend: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>4</octave></pitch><duration>4</duration><type>quarter</type>
        <lyric number="1"><syllabic>single</syllabic><text>{}</text>{}</lyric></note>"#,
            step, text, extend
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        sung("C", "la", r#"<extend type="start"/>"#),
        note("D", 4, "quarter"),
        note("E", 4, "quarter"),
        sung("F", "lo", ""),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let voice = voice(&translation, 1);
    assert_eq!(
        voice.stanzas["1"].kinds(),
        vec![
            SyllableKind::Single,
            SyllableKind::MelismaFirst,
            SyllableKind::MelismaOther,
            SyllableKind::Single
        ]
    );
    let measures = voice.all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    assert_eq!(notes[0].syllables[0].texts, vec!["la".to_string()]);
    assert!(notes[1].syllables.is_empty(), "melisma syllables stay in the stanza");
}

#[test]
fn test_part_group_ordering_by_default_x() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <part-group number="1" type="start" default-x="-10"><group-symbol>bracket</group-symbol></part-group>
    <part-group number="2" type="start" default-x="-5"><group-symbol>brace</group-symbol></part-group>
    <part-group number="3" type="start" default-x="-20"><group-name>Strings</group-name></part-group>
    <score-part id="P1"><part-name>Violin</part-name></score-part>
    <part-group number="2" type="stop"/>
    <part-group number="1" type="stop"/>
    <part-group number="3" type="stop"/>
  </part-list>
  <part id="P1">
    <measure number="1"><note><rest measure="yes"/><duration>4</duration></note></measure>
  </part>
</score-partwise>"#;
    let translation = translate(xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let groups = &translation.score.part_groups;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].number, 3);
    assert_eq!(groups[0].name.as_deref(), Some("Strings"));
    let nested: Vec<u32> = groups[0].sub_groups().map(|g| g.number).collect();
    assert_eq!(nested, vec![1, 2]);
    assert_eq!(translation.score.part_order(), vec![crate::msr::score::PartIndex(0)]);
}

#[test]
fn test_parts_without_groups_get_the_implicit_group() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name></score-part>
    <score-part id="P2"><part-name>Oboe</part-name></score-part>
  </part-list>
  <part id="P1"><measure number="1"/></part>
  <part id="P2"><measure number="1"/></part>
</score-partwise>"#;
    let translation = translate(xml);

    let groups = &translation.score.part_groups;
    assert_eq!(groups.len(), 1);
    assert!(groups[0].implicit);
    assert_eq!(groups[0].name.as_deref(), Some("Implicit"));
    assert_eq!(groups[0].part_indices().count(), 2);

    let measures = translation.score.parts[1].voice(1).expect("voice 1").all_measures();
    assert_eq!(measures[0].kind, MeasureKind::Empty);
}

#[test]
fn test_undeclared_part_is_an_error() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name></score-part>
  </part-list>
  <part id="P1"><measure number="1"/></part>
  <part id="P9"><measure number="1"/></part>
</score-partwise>"#;
    let translation = translate(xml);
    assert!(translation.diagnostics.has_errors());
    assert!(translation.diagnostics.mentions("P9"));
    assert_eq!(translation.score.parts.len(), 2);
    assert_eq!(translation.score.part_groups.len(), 2);
}

#[test]
fn test_unknown_part_group_stop_is_fatal() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Flute</part-name></score-part>
    <part-group number="4" type="stop"/>
  </part-list>
  <part id="P1"><measure number="1"/></part>
</score-partwise>"#;
    let result = translate_musicxml(xml, &TranslationSettings::default());
    assert!(matches!(result, Err(TranslationError::Internal { .. })));
}

#[test]
fn test_timewise_is_rejected() {
    let xml = r#"<?xml version="1.0"?>
<score-timewise version="3.1"><part-list/></score-timewise>"#;
    let result = translate_musicxml(xml, &TranslationSettings::default());
    assert!(matches!(
        result,
        Err(TranslationError::Parse(ParseError::UnsupportedFormat(_)))
    ));
}

#[test]
fn test_voice_staff_change() {
    let on_staff = |step: &str, staff: u32| {
        format!(
            "<note><pitch><step>{}</step><octave>3</octave></pitch><duration>8</duration><type>half</type><voice>1</voice><staff>{}</staff></note>",
            step, staff
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}<staves>2</staves></attributes>
      {}{}
    </measure>"#,
        FOUR_FOUR,
        on_staff("C", 1),
        on_staff("G", 2),
    ));
    let translation = translate(&xml);

    let voice = voice(&translation, 1);
    assert_eq!(voice.home_staff, 1);
    assert_eq!(voice.displaying_staff, 2);
    let measures = voice.all_measures();
    assert!(measures[0].elements.iter().any(|e| matches!(
        e,
        MeasureElement::VoiceStaffChange {
            from_staff: 1,
            to_staff: 2,
            ..
        }
    )));
    assert_eq!(measures[0].kind, MeasureKind::Full);
}

#[test]
fn test_backup_starts_a_second_voice() {
    let in_voice = |step: &str, duration: u32, note_type: &str, voice: u32| {
        format!(
            "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>{}</duration><type>{}</type><voice>{}</voice></note>",
            step, duration, note_type, voice
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}
      <backup><duration>16</duration></backup>
      {}{}
    </measure>"#,
        FOUR_FOUR,
        in_voice("E", 16, "whole", 1),
        in_voice("C", 8, "half", 2),
        in_voice("D", 8, "half", 2),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let second = voice(&translation, 2).all_measures();
    let notes: Vec<_> = second[0].notes().collect();
    assert_eq!(notes[0].position_in_measure, Rational::from_integer(0));
    assert_eq!(notes[1].position_in_measure, Rational::new(1, 2));
    assert_eq!(second[0].kind, MeasureKind::Full);
}

#[test]
fn test_measure_kinds() {
    let xml = single_part(&format!(
        r#"<measure number="0">
      <attributes><divisions>4</divisions>{four}</attributes>
      {q}
    </measure>
    <measure number="1">{q}{q}{q}{q}</measure>
    <measure number="2">{q}{q}</measure>
    <measure number="3">{q}{q}{q}{q}{q}</measure>
    <measure number="4"/>"#,
        four = FOUR_FOUR,
        q = note("C", 4, "quarter"),
    ));
    let translation = translate(&xml);

    let kinds: Vec<_> = voice(&translation, 1).all_measures().iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MeasureKind::Upbeat,
            MeasureKind::Full,
            MeasureKind::Incomplete,
            MeasureKind::Overflowing,
            MeasureKind::Empty
        ]
    );
}

#[test]
fn test_dynamics_attach_to_rest_unless_delayed() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      <direction placement="below"><direction-type><dynamics><p/></dynamics></direction-type></direction>
      <note><rest/><duration>4</duration><type>quarter</type></note>
      {}
      <note><rest/><duration>8</duration><type>half</type></note>
    </measure>"#,
        FOUR_FOUR,
        note("C", 4, "quarter"),
    ));

    let translation = translate(&xml);
    assert!(translation.diagnostics.mentions("attached to a rest"));
    let measures = voice(&translation, 1).all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    assert_eq!(notes[0].decorations.dynamics.len(), 1);
    assert!(notes[1].decorations.dynamics.is_empty());

    let delayed = TranslationSettings::default().with_rest_delay(DecorationKind::Dynamics, true);
    let translation = translate_musicxml(&xml, &delayed).expect("translation succeeds");
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);
    let measures = voice(&translation, 1).all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    assert!(notes[0].decorations.dynamics.is_empty());
    assert_eq!(notes[1].decorations.dynamics.len(), 1);
}

#[test]
fn test_harmony_takes_the_note_duration() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      <harmony><root><root-step>D</root-step></root><kind>minor</kind></harmony>
      {}{}
    </measure>"#,
        FOUR_FOUR,
        note("D", 8, "half"),
        note("F", 8, "half"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    let harmony = notes[0].harmony.as_ref().expect("harmony on the first note");
    assert_eq!(harmony.root_step, DiatonicStep::D);
    assert_eq!(harmony.whole_notes, Some(Rational::new(1, 2)));
    assert!(notes[1].harmony.is_none());
}

#[test]
fn test_duration_type_mismatch_prefers_duration() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}
    </measure>"#,
        FOUR_FOUR,
        note("C", 16, "half"),
    ));
    let translation = translate(&xml);
    assert_eq!(translation.diagnostics.warnings().count(), 1);
    assert!(!translation.diagnostics.has_errors());

    let measures = voice(&translation, 1).all_measures();
    let notes: Vec<_> = measures[0].notes().collect();
    assert_eq!(notes[0].sounding_whole_notes, Rational::from_integer(1));
    assert_eq!(notes[0].display_whole_notes, Rational::new(1, 2));
}

#[test]
fn test_out_of_range_alter_uses_closest() {
    let xml = single_part(
        r#"<measure number="1">
      <attributes><divisions>1</divisions></attributes>
      <note><pitch><step>C</step><alter>3</alter><octave>4</octave></pitch><duration>4</duration><type>whole</type></note>
    </measure>"#,
    );
    let translation = translate(&xml);
    assert!(translation.diagnostics.has_errors());

    let measures = voice(&translation, 1).all_measures();
    let pitch = measures[0].notes().next().and_then(|n| n.pitch()).expect("pitched note");
    assert_eq!(pitch.alteration, crate::msr::types::Alteration::DoubleSharp);
}

#[test]
fn test_header_and_credits() {
    let xml = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <work><work-title>Suite</work-title></work>
  <movement-title>Prelude</movement-title>
  <identification>
    <creator type="composer">J. S. Bach</creator>
    <encoding><software>Finale</software><encoding-date>2020-01-01</encoding-date></encoding>
  </identification>
  <defaults>
    <scaling><millimeters>7</millimeters><tenths>40</tenths></scaling>
    <page-layout>
      <page-height>1683</page-height><page-width>1190</page-width>
      <page-margins type="odd"><left-margin>70</left-margin><right-margin>70</right-margin></page-margins>
      <page-margins type="even"><left-margin>80</left-margin><right-margin>80</right-margin></page-margins>
    </page-layout>
  </defaults>
  <credit page="1"><credit-words default-x="595" justify="center" font-size="24">Suite</credit-words></credit>
  <part-list>
    <score-part id="P1"><part-name>Cello</part-name></score-part>
  </part-list>
  <part id="P1"><measure number="1"/></part>
</score-partwise>"#;
    let translation = translate(xml);

    let identification = &translation.score.identification;
    assert_eq!(identification.work_title.as_deref(), Some("Suite"));
    assert_eq!(identification.movement_title.as_deref(), Some("Prelude"));
    assert_eq!(
        identification.creators,
        vec![("composer".to_string(), "J. S. Bach".to_string())]
    );
    assert_eq!(identification.software, vec!["Finale".to_string()]);

    let geometry = translation.score.page_geometry.as_ref().expect("page geometry");
    assert_eq!(geometry.page_height, Some(1683.0));
    assert_eq!(geometry.left_margin, Some(70.0));

    assert_eq!(translation.score.credits.len(), 1);
    assert_eq!(translation.score.credits[0].words[0].justify.as_deref(), Some("center"));
    assert_eq!(translation.score.parts[0].name.as_deref(), Some("Cello"));
}

#[test]
fn test_cross_staff_chord_stays_in_its_voice() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}<staves>2</staves></attributes>
      <note><pitch><step>C</step><octave>4</octave></pitch><duration>16</duration><voice>1</voice><type>whole</type><staff>1</staff></note>
      <note><chord/><pitch><step>C</step><octave>3</octave></pitch><duration>16</duration><voice>1</voice><type>whole</type><staff>2</staff></note>
    </measure>"#,
        FOUR_FOUR,
    ));
    let translation = translate(&xml);
    assert!(!translation.diagnostics.has_errors(), "{:?}", translation.diagnostics);

    let voice = voice(&translation, 1);
    assert_eq!(voice.displaying_staff, 1);
    let measure = voice.all_measures()[0];
    let chords: Vec<_> = measure.chords().collect();
    assert_eq!(chords.len(), 1);
    assert_eq!(chords[0].notes.len(), 2);
    assert!(!measure
        .elements
        .iter()
        .any(|e| matches!(e, MeasureElement::VoiceStaffChange { .. })));
    assert_eq!(measure.kind, MeasureKind::Full);
}

#[test]
fn test_direction_without_voice_moves_nothing() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}<staves>2</staves></attributes>
      <direction placement="below">
        <direction-type><metronome><beat-unit>quarter</beat-unit><per-minute>60</per-minute></metronome></direction-type>
        <staff>2</staff>
      </direction>
      <note><pitch><step>E</step><octave>4</octave></pitch><duration>16</duration><voice>1</voice><type>whole</type><staff>1</staff></note>
    </measure>"#,
        FOUR_FOUR,
    ));
    let translation = translate(&xml);
    assert!(!translation.diagnostics.has_errors(), "{:?}", translation.diagnostics);

    let voice = voice(&translation, 1);
    assert_eq!(voice.displaying_staff, 1);
    let measure = voice.all_measures()[0];
    let staff_changes = measure
        .elements
        .iter()
        .filter(|e| matches!(e, MeasureElement::VoiceStaffChange { .. }))
        .count();
    assert_eq!(staff_changes, 0);
    assert!(measure
        .elements
        .iter()
        .any(|e| matches!(e, MeasureElement::Tempo(tempo) if tempo.per_minute.as_deref() == Some("60"))));
    assert_eq!(measure.notes().count(), 1);
}

fn nested_tuplet_measure(inner_start: &str) -> String {
    let outer = |step: &str, marker: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>5</octave></pitch><duration>6</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations>{}</notations></note>"#,
            step, marker
        )
    };
    let inner = |step: &str, marker: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>5</octave></pitch><duration>2</duration><type>16th</type>
        <time-modification><actual-notes>9</actual-notes><normal-notes>4</normal-notes></time-modification>
        <notations>{}</notations></note>"#,
            step, marker
        )
    };
    single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>18</divisions>{}</attributes>
      {}{}{}{}{}{}
    </measure>"#,
        FOUR_FOUR,
        outer("C", r#"<tuplet type="start" number="1"/>"#),
        inner("D", inner_start),
        inner("E", ""),
        inner("F", r#"<tuplet type="stop" number="2"/>"#),
        outer("G", r#"<tuplet type="stop" number="1"/>"#),
        note("A", 54, "half").replace("</type>", "</type><dot/>"),
    ))
}

#[test]
fn test_nested_tuplet_ratio_from_time_modification() {
    let translation = translate(&nested_tuplet_measure(r#"<tuplet type="start" number="2"/>"#));
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    assert_eq!(measures[0].kind, MeasureKind::Full);
    let tuplets: Vec<_> = measures[0].tuplets().collect();
    assert_eq!(tuplets.len(), 1);
    let outer = tuplets[0];
    assert_eq!((outer.actual_notes, outer.normal_notes), (3, 2));
    assert_eq!(outer.members.len(), 3);
    assert!(matches!(outer.members[0], TupletMember::Note(_)));
    assert!(matches!(outer.members[2], TupletMember::Note(_)));
    match &outer.members[1] {
        TupletMember::Tuplet(inner) => {
            assert_eq!((inner.actual_notes, inner.normal_notes), (3, 2));
            assert_eq!(inner.members.len(), 3);
        }
        other => panic!("expected a nested tuplet, got {:?}", other),
    }
    assert_eq!(outer.sounding_whole_notes(), Rational::new(1, 4));
}

#[test]
fn test_nested_tuplet_ratio_from_tuplet_numbers() {
    let start = r#"<tuplet type="start" number="2">
          <tuplet-actual><tuplet-number>3</tuplet-number></tuplet-actual>
          <tuplet-normal><tuplet-number>2</tuplet-number></tuplet-normal>
        </tuplet>"#;
    let translation = translate(&nested_tuplet_measure(start));
    assert!(!translation.diagnostics.has_errors(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    let outer = measures[0].tuplets().next().expect("outer tuplet");
    match &outer.members[1] {
        TupletMember::Tuplet(inner) => assert_eq!((inner.actual_notes, inner.normal_notes), (3, 2)),
        other => panic!("expected a nested tuplet, got {:?}", other),
    }
}

#[test]
fn test_triplet_ending_the_measure_is_sealed() {
    let triplet_note = |step: &str, marker: &str| {
        format!(
            r#"<note><pitch><step>{}</step><octave>4</octave></pitch><duration>4</duration><type>eighth</type>
        <time-modification><actual-notes>3</actual-notes><normal-notes>2</normal-notes></time-modification>
        <notations>{}</notations></note>"#,
            step, marker
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>12</divisions><time><beats>1</beats><beat-type>4</beat-type></time></attributes>
      {}{}{}
    </measure>
    <measure number="2">{}</measure>"#,
        triplet_note("C", r#"<tuplet type="start"/>"#),
        triplet_note("D", ""),
        triplet_note("E", r#"<tuplet type="stop"/>"#),
        note("F", 12, "quarter"),
    ));
    let translation = translate(&xml);
    assert!(translation.diagnostics.is_empty(), "{:?}", translation.diagnostics);

    let measures = voice(&translation, 1).all_measures();
    assert_eq!(measures.len(), 2);
    let tuplets: Vec<_> = measures[0].tuplets().collect();
    assert_eq!(tuplets.len(), 1);
    assert_eq!(tuplets[0].members.len(), 3);
    assert_eq!(measures[0].notes().count(), 0);
    assert_eq!(measures[0].kind, MeasureKind::Full);

    // nothing of the triplet leaks into the next measure
    assert_eq!(measures[1].tuplets().count(), 0);
    let notes: Vec<_> = measures[1].notes().collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NoteKind::Standalone);
    assert_eq!(measures[1].kind, MeasureKind::Full);
}

#[test]
fn test_voice_starting_late_is_not_an_upbeat() {
    let in_voice = |step: &str, duration: u32, note_type: &str, voice: u32| {
        format!(
            "<note><pitch><step>{}</step><octave>4</octave></pitch><duration>{}</duration><type>{}</type><voice>{}</voice></note>",
            step, duration, note_type, voice
        )
    };
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>4</divisions>{}</attributes>
      {}
    </measure>
    <measure number="2">
      {}
      <backup><duration>16</duration></backup>
      {}
    </measure>"#,
        FOUR_FOUR,
        in_voice("C", 16, "whole", 1),
        in_voice("D", 16, "whole", 1),
        in_voice("E", 8, "half", 2),
    ));
    let translation = translate(&xml);

    let second = voice(&translation, 2).all_measures();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].kind, MeasureKind::Incomplete);
}

#[test]
fn test_duration_out_of_range_is_an_error() {
    let xml = single_part(&format!(
        r#"<measure number="1">
      <attributes><divisions>1073741824</divisions>{}</attributes>
      {}
    </measure>"#,
        FOUR_FOUR,
        note("C", 1, "quarter"),
    ));
    let translation = translate(&xml);

    assert!(translation.diagnostics.has_errors());
    assert!(
        translation.diagnostics.mentions("out of range"),
        "{:?}",
        translation.diagnostics
    );
}
