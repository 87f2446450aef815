//! Drives an `ElementVisitor` over a MusicXML document
//!
//! Depth-first, document order, one start and one end event per element.
//! Leaf text is delivered with the start event.

use super::element::XmlElement;
use super::errors::{ParseError, Result};
use roxmltree::{Document, Node};
use std::borrow::Cow;

/// Receiver of element events
pub trait ElementVisitor {
    fn visit_start(&mut self, element: &XmlElement) -> Result<()>;
    fn visit_end(&mut self, element: &XmlElement) -> Result<()>;
}

/// Parse `xml` and walk its `score-partwise` root
pub fn walk_musicxml(xml: &str, visitor: &mut dyn ElementVisitor) -> Result<()> {
    let source = neutralize_doctype(xml);
    let doc = Document::parse(&source)
        .map_err(|e| ParseError::InvalidXml(format!("XML parse error: {}", e)))?;

    let root = doc.root_element();
    match root.tag_name().name() {
        "score-partwise" => {}
        "score-timewise" => {
            return Err(ParseError::UnsupportedFormat(
                "score-timewise documents must be converted to score-partwise first".to_string(),
            )
            .into())
        }
        other => {
            return Err(ParseError::UnsupportedFormat(format!(
                "Expected score-partwise, found {}",
                other
            ))
            .into())
        }
    }

    if !root.children().any(|n| n.has_tag_name("part-list")) {
        return Err(ParseError::MissingRequiredElement("part-list".to_string()).into());
    }

    walk_node(&doc, root, visitor)
}

fn walk_node(doc: &Document, node: Node, visitor: &mut dyn ElementVisitor) -> Result<()> {
    let element = to_element(doc, node);
    visitor.visit_start(&element)?;
    for child in node.children().filter(|n| n.is_element()) {
        walk_node(doc, child, visitor)?;
    }
    visitor.visit_end(&element)
}

fn to_element(doc: &Document, node: Node) -> XmlElement {
    let line = doc.text_pos_at(node.range().start).row as usize;
    let mut element = XmlElement::new(node.tag_name().name(), line);
    for attribute in node.attributes() {
        element
            .attributes
            .insert(attribute.name().to_string(), attribute.value().to_string());
    }
    if !node.children().any(|n| n.is_element()) {
        element.text = node.text().map(str::to_string);
    }
    element
}

/// Blank out the DOCTYPE declaration, which roxmltree rejects, keeping
/// newlines so reported line numbers still match the input
pub fn neutralize_doctype(xml: &str) -> Cow<'_, str> {
    let Some(start) = xml.find("<!DOCTYPE") else {
        return Cow::Borrowed(xml);
    };

    let mut depth = 0usize;
    let mut end = None;
    for (offset, c) in xml[start..].char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => {
                end = Some(start + offset + 1);
                break;
            }
            _ => {}
        }
    }
    let Some(end) = end else {
        return Cow::Borrowed(xml);
    };

    let blanked: String = xml[start..end]
        .chars()
        .map(|c| if c == '\n' || c == '\r' { c } else { ' ' })
        .collect();
    Cow::Owned(format!("{}{}{}", &xml[..start], blanked, &xml[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::musicxml::musicxml_to_msr::element::ElementKind;
    use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(bool, ElementKind, usize, Option<String>)>,
    }

    impl ElementVisitor for Recorder {
        fn visit_start(&mut self, element: &XmlElement) -> Result<()> {
            self.events
                .push((true, element.kind, element.line, element.text.clone()));
            Ok(())
        }

        fn visit_end(&mut self, element: &XmlElement) -> Result<()> {
            self.events.push((false, element.kind, element.line, None));
            Ok(())
        }
    }

    #[test]
    fn test_doctype_keeps_line_numbers() {
        let xml = "<?xml version=\"1.0\"?>\n<!DOCTYPE score-partwise PUBLIC\n  \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\"\n  \"http://www.musicxml.org/dtds/partwise.dtd\">\n<score-partwise>\n<part-list/>\n</score-partwise>";
        let mut recorder = Recorder::default();
        walk_musicxml(xml, &mut recorder).expect("walk should succeed");

        assert_eq!(recorder.events[0].1, ElementKind::ScorePartwise);
        assert_eq!(recorder.events[0].2, 5, "root element is on line 5");
        assert_eq!(recorder.events[1].1, ElementKind::PartList);
        assert_eq!(recorder.events[1].2, 6);
    }

    #[test]
    fn test_start_end_order_and_leaf_text() {
        let xml = "<score-partwise><part-list/><part id=\"P1\"><measure number=\"1\"><attributes><divisions>4</divisions></attributes></measure></part></score-partwise>";
        let mut recorder = Recorder::default();
        walk_musicxml(xml, &mut recorder).expect("walk should succeed");

        let kinds: Vec<(bool, ElementKind)> = recorder.events.iter().map(|e| (e.0, e.1)).collect();
        assert_eq!(
            kinds,
            vec![
                (true, ElementKind::ScorePartwise),
                (true, ElementKind::PartList),
                (false, ElementKind::PartList),
                (true, ElementKind::Part),
                (true, ElementKind::Measure),
                (true, ElementKind::Attributes),
                (true, ElementKind::Divisions),
                (false, ElementKind::Divisions),
                (false, ElementKind::Attributes),
                (false, ElementKind::Measure),
                (false, ElementKind::Part),
                (false, ElementKind::ScorePartwise),
            ]
        );
        assert_eq!(recorder.events[6].3.as_deref(), Some("4"));
    }

    #[test]
    fn test_timewise_is_rejected() {
        let mut recorder = Recorder::default();
        let err = walk_musicxml("<score-timewise/>", &mut recorder).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Parse(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let mut recorder = Recorder::default();
        let err = walk_musicxml("<score-partwise>", &mut recorder).unwrap_err();
        assert!(matches!(err, TranslationError::Parse(ParseError::InvalidXml(_))));
    }
}
