//! Zero-Copy Slice Parser
//!
//! Parses XML from a byte slice with zero-copy semantics.
//! Input references are maintained directly in the output; only text
//! containing entity references is copied.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text;
use crate::core::scanner::{is_whitespace, Scanner};
use crate::dom::XmlError;

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
    failed: bool,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            scanner: Scanner::new(input),
            failed: false,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next XML event, `Ok(None)` at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, XmlError> {
        if self.failed || self.scanner.is_eof() {
            return Ok(None);
        }
        let result = self.read_event();
        if result.is_err() {
            self.failed = true;
        }
        result.map(Some)
    }

    fn read_event(&mut self) -> Result<XmlEvent<'a>, XmlError> {
        let start = self.scanner.position();

        if self.scanner.peek_at(0) != Some(b'<') {
            let end = self.scanner.find_tag_start().unwrap_or(self.scanner.input_len());
            self.scanner.set_position(end);
            return Ok(XmlEvent::Text(decode_text(self.scanner.slice(start, end))));
        }

        if self.scanner.starts_with(b"<!--") {
            self.scanner.advance(4);
            let end = self
                .scanner
                .find_sequence(b"-->")
                .ok_or_else(|| XmlError::syntax(start, "unterminated comment"))?;
            let content = self.scanner.slice(start + 4, end);
            self.scanner.set_position(end + 3);
            return Ok(XmlEvent::Comment(content));
        }

        if self.scanner.starts_with(b"<![CDATA[") {
            self.scanner.advance(9);
            let end = self
                .scanner
                .find_sequence(b"]]>")
                .ok_or_else(|| XmlError::syntax(start, "unterminated CDATA section"))?;
            let content = self.scanner.slice(start + 9, end);
            self.scanner.set_position(end + 3);
            return Ok(XmlEvent::CData(content));
        }

        if self.scanner.starts_with(b"<!DOCTYPE") {
            return self.read_doctype(start);
        }

        if self.scanner.starts_with(b"<?") {
            return self.read_processing_instruction(start);
        }

        if self.scanner.starts_with(b"</") {
            self.scanner.advance(2);
            let name = self
                .scanner
                .read_name()
                .ok_or_else(|| XmlError::syntax(start, "invalid end tag name"))?;
            let end = self
                .scanner
                .find_tag_end_quoted()
                .ok_or_else(|| XmlError::syntax(start, "unterminated end tag"))?;
            let trailing = self.scanner.slice(self.scanner.position(), end);
            if !trailing.iter().all(|&b| is_whitespace(b)) {
                return Err(XmlError::syntax(self.scanner.position(), "unexpected content in end tag"));
            }
            self.scanner.set_position(end + 1);
            return Ok(XmlEvent::EndElement(EndElement { name, position: start }));
        }

        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| XmlError::syntax(start, "invalid element name"))?;
        let attr_start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| XmlError::syntax(start, "unterminated start tag"))?;
        let is_empty = end > attr_start && self.scanner.slice(end - 1, end) == b"/";
        let attr_end = if is_empty { end - 1 } else { end };
        let attr_content = self.scanner.slice(attr_start, attr_end);
        if let Some(&first) = attr_content.first() {
            if !is_whitespace(first) {
                return Err(XmlError::syntax(attr_start, "invalid character in element name"));
            }
        }
        let attributes = parse_attributes(attr_content)
            .map_err(|(offset, message)| XmlError::syntax(attr_start + offset, message))?;
        self.scanner.set_position(end + 1);

        let elem = StartElement { name, attributes, position: start };
        if is_empty {
            Ok(XmlEvent::EmptyElement(elem))
        } else {
            Ok(XmlEvent::StartElement(elem))
        }
    }

    fn read_processing_instruction(&mut self, start: usize) -> Result<XmlEvent<'a>, XmlError> {
        self.scanner.advance(2);
        let target = self
            .scanner
            .read_name()
            .ok_or_else(|| XmlError::syntax(start, "invalid processing instruction target"))?;
        let end = self
            .scanner
            .find_sequence(b"?>")
            .ok_or_else(|| XmlError::syntax(start, "unterminated processing instruction"))?;
        let body_start = self.scanner.position();
        let body = self.scanner.slice(body_start, end);
        self.scanner.set_position(end + 2);

        if target == b"xml" {
            let attrs = parse_attributes(body)
                .map_err(|(offset, message)| XmlError::syntax(body_start + offset, message))?;
            let version = attrs
                .iter()
                .find(|a| a.name == b"version")
                .map(|a| a.value.clone())
                .unwrap_or(std::borrow::Cow::Borrowed(b"1.0" as &[u8]));
            let encoding = attrs
                .iter()
                .find(|a| a.name == b"encoding")
                .map(|a| a.value.clone());
            return Ok(XmlEvent::XmlDeclaration { version, encoding });
        }

        let trimmed = trim_start(body);
        Ok(XmlEvent::ProcessingInstruction {
            target,
            data: (!trimmed.is_empty()).then_some(trimmed),
        })
    }

    /// DOCTYPE may carry an internal subset in brackets containing '>'
    fn read_doctype(&mut self, start: usize) -> Result<XmlEvent<'a>, XmlError> {
        self.scanner.advance(9);
        let mut depth = 0usize;
        let mut offset = 0usize;
        loop {
            match self.scanner.peek_at(offset) {
                None => return Err(XmlError::syntax(start, "unterminated DOCTYPE")),
                Some(b'[') => depth += 1,
                Some(b']') => depth = depth.saturating_sub(1),
                Some(b'>') if depth == 0 => break,
                Some(_) => {}
            }
            offset += 1;
        }
        let content_start = self.scanner.position();
        let content = self.scanner.slice(content_start, content_start + offset);
        self.scanner.advance(offset + 1);
        Ok(XmlEvent::DocType(trim_start(content)))
    }
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|&&b| is_whitespace(b)).count();
    &bytes[skip..]
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<XmlEvent<'a>, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &[u8]) -> Vec<XmlEvent<'_>> {
        SliceReader::new(input).collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_simple_element() {
        let events = events(b"<root>hello</root>");
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], XmlEvent::StartElement(e) if e.name == b"root"));
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], XmlEvent::EndElement(e) if e.name == b"root"));
    }

    #[test]
    fn test_empty_element() {
        let events = events(b"<br/>");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], XmlEvent::EmptyElement(e) if e.name == b"br"));
    }

    #[test]
    fn test_attributes() {
        let events = events(b"<Page language=\"en\" kind='x'/>");
        if let XmlEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.attributes.len(), 2);
            assert_eq!(e.attributes[0].name, b"language");
            assert_eq!(e.attributes[0].value.as_ref(), b"en");
            assert_eq!(e.attributes[1].name, b"kind");
            assert_eq!(e.attributes[1].value.as_ref(), b"x");
        } else {
            panic!("Expected EmptyElement");
        }
    }

    #[test]
    fn test_cdata() {
        let events = events(b"<Name><![CDATA[a < b]]></Name>");
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[1], XmlEvent::CData(c) if *c == b"a < b"));
    }

    #[test]
    fn test_declaration_and_doctype() {
        let events = events(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE a [<!ENTITY x \"y\">]><a/>");
        assert!(matches!(&events[0], XmlEvent::XmlDeclaration { encoding: Some(e), .. } if e.as_ref() == b"UTF-8"));
        assert!(matches!(&events[1], XmlEvent::DocType(_)));
        assert!(matches!(&events[2], XmlEvent::EmptyElement(e) if e.name == b"a"));
    }

    #[test]
    fn test_comment_and_pi() {
        let events = events(b"<a><!-- note --><?render fast?></a>");
        assert!(matches!(&events[1], XmlEvent::Comment(c) if *c == b" note "));
        assert!(matches!(&events[2], XmlEvent::ProcessingInstruction { target, data: Some(d) } if *target == b"render" && *d == b"fast"));
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let result: Result<Vec<_>, _> = SliceReader::new(b"<a><!-- open").collect();
        assert!(matches!(result, Err(XmlError::Syntax { position: 3, .. })));
    }

    #[test]
    fn test_unterminated_tag_is_error() {
        let result: Result<Vec<_>, _> = SliceReader::new(b"<a attr=\"x\"").collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_stops_after_error() {
        let mut reader = SliceReader::new(b"<1bad/><ok/>");
        assert!(reader.next_event().is_err());
        assert!(matches!(reader.next_event(), Ok(None)));
    }
}
