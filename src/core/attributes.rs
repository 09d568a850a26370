//! XML Attribute Parsing
//!
//! Parses XML attributes from tag content.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a [u8],
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Returns the offset of the first offending byte when the content is malformed.
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute<'_>>, (usize, &'static str)> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            return Ok(attrs);
        }

        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err((pos, "attribute name must start with letter, underscore, or colon"));
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if input.get(pos) != Some(&b'=') {
            return Err((pos, "attribute value required"));
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err((pos, "attribute value must be quoted")),
        };
        pos += 1;
        let value_start = pos;
        let Some(len) = memchr::memchr(quote, &input[value_start..]) else {
            return Err((value_start, "attribute value has mismatched quotes"));
        };
        pos = value_start + len;
        attrs.push(Attribute {
            name,
            value: decode_text(&input[value_start..pos]),
        });
        pos += 1;
    }
}
