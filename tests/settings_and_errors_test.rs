//! Translation settings, JSON output and fatal errors through the public API

use musicxml_msr::converters::musicxml::musicxml_to_msr::{translate_with_reporter, ParseError};
use musicxml_msr::diagnostics::{DiagnosticSeverity, Diagnostics};
use musicxml_msr::msr::types::{PitchLanguage, StartStop};
use musicxml_msr::{translate_musicxml, TranslationError, TranslationSettings};

const MELODY: &str = r#"<?xml version="1.0"?>
<score-partwise version="3.1">
  <part-list>
    <score-part id="P1"><part-name>Voice</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes><divisions>1</divisions><time><beats>2</beats><beat-type>4</beat-type></time></attributes>
      <note><rest/><duration>1</duration><type>quarter</type><notations><slur type="start"/></notations></note>
      <note><pitch><step>B</step><alter>-1</alter><octave>4</octave></pitch><duration>1</duration><type>quarter</type>
        <notations><slur type="stop"/></notations></note>
    </measure>
  </part>
</score-partwise>"#;

#[test]
fn test_settings_from_json_reach_the_score() {
    let settings = TranslationSettings::from_json(r#"{ "language": "english" }"#).expect("valid settings JSON");
    let translation = translate_musicxml(MELODY, &settings).expect("Translation should succeed");

    assert_eq!(translation.score.pitch_naming.language, PitchLanguage::English);
}

#[test]
fn test_slurs_delayed_past_rest() {
    let default = translate_musicxml(MELODY, &TranslationSettings::default()).expect("Translation should succeed");
    assert!(
        default.diagnostics.mentions("slur attached to a rest"),
        "Rest should take the pending slur: {:?}",
        default.diagnostics
    );

    let settings = TranslationSettings::from_json(r#"{ "delay_rests_slurs": true }"#).expect("valid settings JSON");
    let delayed = translate_musicxml(MELODY, &settings).expect("Translation should succeed");
    let voice = delayed.score.parts[0].voice(1).expect("voice 1");
    let notes: Vec<_> = voice.all_measures()[0].notes().cloned().collect();

    assert!(notes[0].decorations.slurs.is_empty());
    let kinds: Vec<_> = notes[1].decorations.slurs.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StartStop::Start, StartStop::Stop]);
}

#[test]
fn test_translation_serializes_to_json() {
    let translation = translate_musicxml(MELODY, &TranslationSettings::default()).expect("Translation should succeed");
    let json = serde_json::to_value(&translation).expect("Translation should serialize");

    assert_eq!(json["score"]["parts"][0]["id"], "P1");
    assert!(json["diagnostics"]["records"].is_array());
}

#[test]
fn test_custom_reporter_receives_diagnostics() {
    let xml = MELODY.replace("<alter>-1</alter>", "<alter>5</alter>");
    let mut diagnostics = Diagnostics::new();
    let score = translate_with_reporter(&xml, &TranslationSettings::default(), &mut diagnostics)
        .expect("Translation should succeed");

    assert_eq!(score.parts.len(), 1);
    let errors: Vec<_> = diagnostics.errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", diagnostics);
    assert_eq!(errors[0].severity, DiagnosticSeverity::Error);
}

#[test]
fn test_malformed_xml_is_fatal() {
    let result = translate_musicxml("<score-partwise><part-list>", &TranslationSettings::default());
    match result {
        Err(TranslationError::Parse(ParseError::InvalidXml(message))) => println!("XML error: {}", message),
        other => panic!("Expected an XML error, got {:?}", other.map(|t| t.score.parts.len())),
    }
}

#[test]
fn test_unknown_root_is_fatal() {
    let result = translate_musicxml("<opus/>", &TranslationSettings::default());
    assert!(matches!(
        result,
        Err(TranslationError::Parse(ParseError::UnsupportedFormat(_)))
    ));
}
