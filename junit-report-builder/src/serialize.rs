// Copyright (c) The diem-devtools Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize an [`Element`] tree.

use crate::{
    element::{AttributeValue, Element, Node},
    errors::SerializeError,
    sanitize::{cdata_sections, escape_attribute, escape_text},
};
use quick_xml::{
    events::{
        attributes::Attribute, BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event,
    },
    name::QName,
    Writer,
};
use std::{borrow::Cow, io};

static INDENT: &str = "  ";

/// Writes the XML declaration followed by `root`, indenting nested elements by two spaces.
///
/// No newline is written after the root element.
pub(crate) fn serialize_document(
    root: &Element,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new(writer);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_element(root, 0, &mut writer)?;
    writer.write_event(Event::Eof)?;

    Ok(())
}

fn serialize_element(
    element: &Element,
    depth: usize,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    write_indent(depth, writer)?;

    let mut tag = BytesStart::new(element.name());
    for (name, value) in element.attributes() {
        let value = match value {
            AttributeValue::Text(text) => escape_attribute(text),
            AttributeValue::Numeric(number) => Cow::Borrowed(number.as_str()),
        };
        // Already escaped: push the raw bytes so quick-xml doesn't escape them again.
        tag.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Borrowed(value.as_bytes()),
        });
    }

    match element.children() {
        [] => writer.write_event(Event::Empty(tag)),
        [child] if child.is_text() => {
            writer.write_event(Event::Start(tag))?;
            serialize_text(child, writer)?;
            serialize_end_tag(element.name(), writer)
        }
        children => {
            writer.write_event(Event::Start(tag))?;
            for child in children {
                match child {
                    Node::Element(child) => serialize_element(child, depth + 1, writer)?,
                    Node::CData(_) | Node::Text(_) => {
                        write_indent(depth + 1, writer)?;
                        serialize_text(child, writer)?;
                    }
                }
            }
            write_indent(depth, writer)?;
            serialize_end_tag(element.name(), writer)
        }
    }
}

fn serialize_text(node: &Node, writer: &mut Writer<impl io::Write>) -> quick_xml::Result<()> {
    match node {
        Node::CData(text) => {
            for section in cdata_sections(text) {
                writer.write_event(Event::CData(BytesCData::new(section)))?;
            }
            Ok(())
        }
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
        }
        Node::Element(_) => Ok(()),
    }
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

fn write_indent(depth: usize, writer: &mut Writer<impl io::Write>) -> quick_xml::Result<()> {
    let indent = format!("\n{}", INDENT.repeat(depth));
    writer.write_event(Event::Text(BytesText::from_escaped(indent)))
}
