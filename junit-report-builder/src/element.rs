// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An owned XML element tree.
//!
//! Report nodes build themselves into this tree, which is then handed to the serializer. Keeping
//! the tree separate from the writer lets each node be tested by inspecting the elements it
//! produced.

use indexmap::IndexMap;
use std::fmt;

/// A named XML element with ordered attributes and children.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    name: &'static str,
    attributes: IndexMap<&'static str, AttributeValue>,
    children: Vec<Node>,
}

/// A child of an [`Element`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// A nested element.
    Element(Element),

    /// Text written as a CDATA section.
    CData(String),

    /// Text written as escaped character data.
    Text(String),
}

impl Node {
    /// Returns true if this node is character data rather than an element.
    pub fn is_text(&self) -> bool {
        matches!(self, Node::CData(_) | Node::Text(_))
    }
}

/// The value of an attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    /// Arbitrary text. Sanitized and escaped on output.
    Text(String),

    /// A formatted number, which never needs escaping.
    Numeric(String),
}

impl AttributeValue {
    /// Returns the unescaped value.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeValue::Text(value) | AttributeValue::Numeric(value) => value,
        }
    }
}

impl Element {
    /// Creates a new element with no attributes or children.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            children: vec![],
        }
    }

    /// Appends a fully built child element.
    ///
    /// Children are assembled bottom-up: build the child, then append it to its parent.
    pub fn append(&mut self, child: Element) -> &mut Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Sets a text attribute.
    ///
    /// Setting an attribute that already exists replaces its value but keeps its position.
    pub fn attribute(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.attributes
            .insert(name, AttributeValue::Text(value.into()));
        self
    }

    /// Sets a numeric attribute.
    pub fn numeric_attribute(&mut self, name: &'static str, value: impl fmt::Display) -> &mut Self {
        self.attributes
            .insert(name, AttributeValue::Numeric(value.to_string()));
        self
    }

    /// Appends a CDATA child.
    pub fn cdata(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::CData(text.into()));
        self
    }

    /// Appends a text child.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Returns the element name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the value of an attribute, if set.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(AttributeValue::as_str)
    }

    /// Iterates over attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &AttributeValue)> + '_ {
        self.attributes.iter().map(|(name, value)| (*name, value))
    }

    /// Returns all children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::CData(_) | Node::Text(_) => None,
        })
    }

    /// Returns the first child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_first_insertion_position() {
        let mut element = Element::new("testcase");
        element
            .attribute("name", "first")
            .numeric_attribute("time", 1.5)
            .attribute("name", "second");

        let attributes: Vec<_> = element
            .attributes()
            .map(|(name, value)| (name, value.as_str()))
            .collect();
        assert_eq!(attributes, vec![("name", "second"), ("time", "1.5")]);
    }

    #[test]
    fn append_keeps_child_order() {
        let mut suite = Element::new("testsuite");
        suite.attribute("name", "suite");

        let mut root = Element::new("testsuites");
        root.append(suite)
            .cdata("body")
            .append(Element::new("testcase"));

        assert_eq!(root.children().len(), 3);
        let names: Vec<_> = root.child_elements().map(Element::name).collect();
        assert_eq!(names, vec!["testsuite", "testcase"]);
        assert_eq!(
            root.find("testsuite").and_then(|e| e.get_attribute("name")),
            Some("suite")
        );
        assert!(root.children()[1].is_text());
    }
}
