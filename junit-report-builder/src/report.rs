// Copyright (c) The diem-devtools Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    element::Element,
    errors::{SerializeError, WriteError},
    serialize::serialize_document,
    test_case::TestCase,
    test_suite::TestSuite,
};
use camino::Utf8Path;
use std::{fmt, fs, io, sync::Arc};

static TESTSUITES_TAG: &str = "testsuites";

/// Creates the nodes of a report.
///
/// [`Builder`] and [`TestSuite`] create every node through a factory, so tests and callers can
/// substitute node creation, for example to pre-populate attributes on every testcase.
pub trait NodeFactory: fmt::Debug + Send + Sync {
    /// Creates a new testsuite. `factory` is the factory the testsuite should use for its own
    /// testcases.
    fn new_test_suite(&self, factory: Arc<dyn NodeFactory>) -> TestSuite;

    /// Creates a new testcase.
    fn new_test_case(&self) -> TestCase;
}

/// The [`NodeFactory`] used unless another one is provided: creates empty nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNodeFactory;

impl NodeFactory for DefaultNodeFactory {
    fn new_test_suite(&self, factory: Arc<dyn NodeFactory>) -> TestSuite {
        TestSuite::with_factory(factory)
    }

    fn new_test_case(&self) -> TestCase {
        TestCase::new()
    }
}

/// A top-level entry in a [`Report`], borrowed from it.
#[derive(Clone, Copy, Debug)]
pub enum ReportEntry<'a> {
    /// A testsuite.
    TestSuite(&'a TestSuite),

    /// A testcase that does not belong to any testsuite.
    TestCase(&'a TestCase),
}

impl ReportEntry<'_> {
    fn build(self, parent: &mut Element) {
        match self {
            ReportEntry::TestSuite(test_suite) => test_suite.build(parent),
            ReportEntry::TestCase(test_case) => test_case.build(parent),
        }
    }
}

/// Where an entry is stored, recorded in creation order.
#[derive(Clone, Copy, Debug)]
enum EntryIndex {
    TestSuite(usize),
    TestCase(usize),
}

/// The root element of a JUnit report.
///
/// Holds testsuites and bare testcases in the order they were added. The root `testsuites`
/// element has no attributes of its own.
#[derive(Clone, Debug, Default)]
pub struct Report {
    test_suites: Vec<TestSuite>,
    test_cases: Vec<TestCase>,
    order: Vec<EntryIndex>,
}

impl Report {
    /// Creates a new, empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a testsuite and returns it.
    pub fn add_test_suite(&mut self, test_suite: TestSuite) -> &mut TestSuite {
        let index = self.test_suites.len();
        self.order.push(EntryIndex::TestSuite(index));
        self.test_suites.push(test_suite);
        &mut self.test_suites[index]
    }

    /// Adds a testcase outside of any testsuite and returns it.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut TestCase {
        let index = self.test_cases.len();
        self.order.push(EntryIndex::TestCase(index));
        self.test_cases.push(test_case);
        &mut self.test_cases[index]
    }

    /// Iterates over the entries in the order they were added.
    pub fn entries(&self) -> impl Iterator<Item = ReportEntry<'_>> + '_ {
        self.order.iter().filter_map(|index| match *index {
            EntryIndex::TestSuite(index) => self.test_suites.get(index).map(ReportEntry::TestSuite),
            EntryIndex::TestCase(index) => self.test_cases.get(index).map(ReportEntry::TestCase),
        })
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing has been added to this report.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Builds the element tree for this report.
    pub fn build_element(&self) -> Element {
        let mut root = Element::new(TESTSUITES_TAG);
        for entry in self.entries() {
            entry.build(&mut root);
        }
        root
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_document(&self.build_element(), writer)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Builds a JUnit report incrementally.
///
/// Testsuites and testcases are created through the builder and configured through the
/// returned references, in any order. [`build`](Self::build) can be called any number of times.
///
/// # Examples
///
/// ```
/// let mut builder = junit_report_builder::new_builder();
/// builder.test_case().class_name("root.test.Class1");
/// let suite = builder.test_suite().name("first.Suite");
/// suite.test_case().name("Second test");
///
/// let xml = builder.build().unwrap();
/// assert!(xml.contains(r#"<testsuite name="first.Suite" tests="1""#));
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    report: Report,
    factory: Arc<dyn NodeFactory>,
}

impl Builder {
    /// Creates a new builder with an empty report.
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultNodeFactory))
    }

    /// Creates a new builder with an empty report, creating nodes through `factory`.
    pub fn with_factory(factory: Arc<dyn NodeFactory>) -> Self {
        Self {
            report: Report::new(),
            factory,
        }
    }

    /// Creates a new, independent builder that shares this builder's node factory.
    pub fn new_builder(&self) -> Self {
        Self::with_factory(Arc::clone(&self.factory))
    }

    /// Creates a new testsuite at the end of the report and returns it.
    pub fn test_suite(&mut self) -> &mut TestSuite {
        let test_suite = self.factory.new_test_suite(Arc::clone(&self.factory));
        tracing::trace!(index = self.report.len(), "created testsuite");
        self.report.add_test_suite(test_suite)
    }

    /// Creates a new testcase at the end of the report, outside of any testsuite, and returns it.
    pub fn test_case(&mut self) -> &mut TestCase {
        let test_case = self.factory.new_test_case();
        tracing::trace!(index = self.report.len(), "created top-level testcase");
        self.report.add_test_case(test_case)
    }

    /// Returns the report being built.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Returns mutable access to the report being built.
    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    /// Serializes the report to a string.
    pub fn build(&self) -> Result<String, SerializeError> {
        tracing::debug!(entries = self.report.len(), "building JUnit report");
        self.report.to_string()
    }

    /// Serializes the report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        self.report.serialize(writer)
    }

    /// Serializes the report and writes it to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Utf8Path>) -> Result<&Self, WriteError> {
        let path = path.as_ref();
        let xml = self.build()?;

        if let Some(dir) = path.parent()
            && !dir.as_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|error| WriteError::CreateDir {
                dir: dir.to_owned(),
                error,
            })?;
        }

        tracing::debug!(%path, bytes = xml.len(), "writing JUnit report");
        fs::write(path, xml).map_err(|error| WriteError::Write {
            file: path.to_owned(),
            error,
        })?;

        Ok(self)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
