// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text sanitization for XML output.
//!
//! All functions here strip characters that XML 1.0 forbids before doing anything else, so
//! arbitrary test output can be embedded in a report without producing a malformed document.

use std::borrow::Cow;

static CDATA_START: &str = "<![CDATA[";
static CDATA_END: &str = "]]>";

/// Returns true if `c` matches the XML 1.0 `Char` production.
///
/// Rust strings cannot contain surrogates, so only control characters and the two
/// noncharacters at the top of the BMP need to be excluded.
pub fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Removes every character that is not allowed in an XML 1.0 document.
///
/// Characters outside the Basic Multilingual Plane (such as emoji) are kept. Returns the input
/// unchanged (borrowed) if there is nothing to strip.
pub fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_valid_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_valid_xml_char(c)).collect())
    }
}

/// Strips invalid characters and escapes `&`, `<`, `>` and `"` for use inside a double-quoted
/// attribute value.
///
/// Tabs, newlines and carriage returns are written as character references, since parsers
/// normalize literal whitespace in attribute values to spaces.
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    escape_with(text, |c| matches!(c, '&' | '<' | '>' | '"' | '\t' | '\n' | '\r'))
}

/// Strips invalid characters and escapes `&`, `<` and `>` for use as element text.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, |c| matches!(c, '&' | '<' | '>'))
}

/// Strips invalid characters and wraps the text in a CDATA section.
///
/// A literal `]]>` in the input would end the section early, so it is split across two
/// adjacent sections.
pub fn wrap_cdata(text: &str) -> String {
    let mut wrapped = String::with_capacity(text.len() + CDATA_START.len() + CDATA_END.len());
    for section in cdata_sections(text) {
        wrapped.push_str(CDATA_START);
        wrapped.push_str(&section);
        wrapped.push_str(CDATA_END);
    }
    wrapped
}

/// Strips invalid characters and splits the text into the bodies of consecutive CDATA sections.
///
/// Every `]]>` is split between `]]` and `>`, so no section body contains the terminator. There
/// is always at least one section.
pub fn cdata_sections(text: &str) -> Vec<String> {
    let text = strip_invalid_xml_chars(text);
    let mut sections = vec![];
    let mut rest: &str = &text;
    while let Some(pos) = rest.find(CDATA_END) {
        let (section, tail) = rest.split_at(pos + 2);
        sections.push(section.to_owned());
        rest = tail;
    }
    sections.push(rest.to_owned());
    sections
}

/// Formats the marker line for a file attached to captured output.
pub fn attachment_marker(path: &str) -> String {
    format!("[[ATTACHMENT|{path}]]")
}

fn escape_with(text: &str, needs_escape: impl Fn(char) -> bool) -> Cow<'_, str> {
    let stripped = strip_invalid_xml_chars(text);
    if !stripped.chars().any(&needs_escape) {
        return stripped;
    }

    let mut escaped = String::with_capacity(stripped.len() + 16);
    for c in stripped.chars() {
        match c {
            '&' if needs_escape(c) => escaped.push_str("&amp;"),
            '<' if needs_escape(c) => escaped.push_str("&lt;"),
            '>' if needs_escape(c) => escaped.push_str("&gt;"),
            '"' if needs_escape(c) => escaped.push_str("&quot;"),
            '\t' if needs_escape(c) => escaped.push_str("&#x9;"),
            '\n' if needs_escape(c) => escaped.push_str("&#xA;"),
            '\r' if needs_escape(c) => escaped.push_str("&#xD;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
