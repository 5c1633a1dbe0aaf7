// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    element::Element,
    report::{DefaultNodeFactory, NodeFactory},
    test_case::TestCase,
};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::{fmt, sync::Arc, time::SystemTime};

static TESTSUITE_TAG: &str = "testsuite";
static PROPERTIES_TAG: &str = "properties";
static PROPERTY_TAG: &str = "property";

/// Format used for date/time timestamps: local wall-clock fields, seconds precision, no offset.
static TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Represents a single testsuite.
///
/// A `TestSuite` groups together several [`TestCase`] instances. The `tests`, `failures`,
/// `errors` and `skipped` counts are always derived from the testcases when the suite is built.
#[derive(Clone)]
pub struct TestSuite {
    name: Option<String>,
    time: Option<f64>,
    timestamp: Option<Timestamp>,
    properties: Vec<Property>,
    test_cases: Vec<TestCase>,
    factory: Arc<dyn NodeFactory>,
}

impl TestSuite {
    /// Creates a new, empty testsuite that creates testcases with [`DefaultNodeFactory`].
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultNodeFactory))
    }

    /// Creates a new, empty testsuite that creates its testcases through `factory`.
    pub fn with_factory(factory: Arc<dyn NodeFactory>) -> Self {
        Self {
            name: None,
            time: None,
            timestamp: None,
            properties: vec![],
            test_cases: vec![],
            factory,
        }
    }

    /// Sets the name of the testsuite.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the time taken by the testsuite, in seconds.
    pub fn time(&mut self, seconds: f64) -> &mut Self {
        self.time = Some(seconds);
        self
    }

    /// Sets the start timestamp for the testsuite.
    ///
    /// Strings are written verbatim; date/time values are formatted as `YYYY-MM-DDTHH:mm:ss`.
    pub fn timestamp(&mut self, timestamp: impl Into<Timestamp>) -> &mut Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Adds a property to this testsuite. Duplicate names are allowed.
    pub fn property(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Creates a new testcase in this testsuite and returns it for configuration.
    pub fn test_case(&mut self) -> &mut TestCase {
        let test_case = self.factory.new_test_case();
        tracing::trace!(index = self.test_cases.len(), "created testcase in testsuite");
        self.add_test_case(test_case)
    }

    /// Adds an already configured testcase to this testsuite and returns it.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut TestCase {
        let index = self.test_cases.len();
        self.test_cases.push(test_case);
        &mut self.test_cases[index]
    }

    /// Returns the testcases in insertion order.
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Returns mutable access to the testcases in insertion order.
    pub fn test_cases_mut(&mut self) -> &mut [TestCase] {
        &mut self.test_cases
    }

    /// Returns the properties in insertion order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The total number of tests in this testsuite.
    pub fn tests(&self) -> usize {
        self.test_cases.len()
    }

    /// The total number of tests in this testsuite that failed.
    ///
    /// A "failure" is usually some sort of *expected* issue in a test.
    pub fn failures(&self) -> usize {
        self.test_cases.iter().map(TestCase::failure_count).sum()
    }

    /// The total number of tests in this testsuite that errored.
    ///
    /// An "error" is usually some sort of *unexpected* issue in a test.
    pub fn errors(&self) -> usize {
        self.test_cases.iter().map(TestCase::error_count).sum()
    }

    /// The total number of tests in this testsuite that were skipped.
    pub fn skipped(&self) -> usize {
        self.test_cases.iter().map(TestCase::skipped_count).sum()
    }

    /// Appends a `testsuite` element describing this testsuite and its testcases to `parent`.
    pub fn build(&self, parent: &mut Element) {
        let mut testsuite = Element::new(TESTSUITE_TAG);
        if let Some(name) = &self.name {
            testsuite.attribute("name", name.as_str());
        }
        if let Some(time) = self.time {
            testsuite.numeric_attribute("time", time);
        }
        if let Some(timestamp) = &self.timestamp {
            testsuite.attribute("timestamp", timestamp.to_string());
        }
        testsuite
            .numeric_attribute("tests", self.tests())
            .numeric_attribute("failures", self.failures())
            .numeric_attribute("errors", self.errors())
            .numeric_attribute("skipped", self.skipped());

        if !self.properties.is_empty() {
            let mut properties = Element::new(PROPERTIES_TAG);
            for property in &self.properties {
                let mut element = Element::new(PROPERTY_TAG);
                element
                    .attribute("name", property.name.as_str())
                    .attribute("value", property.value.as_str());
                properties.append(element);
            }
            testsuite.append(properties);
        }

        for test_case in &self.test_cases {
            test_case.build(&mut testsuite);
        }
        parent.append(testsuite);
    }
}

impl Default for TestSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("time", &self.time)
            .field("timestamp", &self.timestamp)
            .field("properties", &self.properties)
            .field("test_cases", &self.test_cases)
            .finish_non_exhaustive()
    }
}

/// Custom properties set during test execution, e.g. environment variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    /// The name of the property.
    pub name: String,

    /// The value of the property.
    pub value: String,
}

impl Property {
    /// Creates a new `Property` instance.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T> From<(T, T)> for Property
where
    T: Into<String>,
{
    fn from((k, v): (T, T)) -> Self {
        Property::new(k, v)
    }
}

/// The start time of a testsuite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Timestamp {
    /// A pre-formatted timestamp, written verbatim.
    Formatted(String),

    /// A wall-clock date and time, written as `YYYY-MM-DDTHH:mm:ss`.
    DateTime(NaiveDateTime),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Formatted(timestamp) => f.write_str(timestamp),
            Timestamp::DateTime(date_time) => {
                write!(f, "{}", date_time.format(TIMESTAMP_FORMAT))
            }
        }
    }
}

impl From<&str> for Timestamp {
    fn from(timestamp: &str) -> Self {
        Timestamp::Formatted(timestamp.to_owned())
    }
}

impl From<String> for Timestamp {
    fn from(timestamp: String) -> Self {
        Timestamp::Formatted(timestamp)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(date_time: NaiveDateTime) -> Self {
        Timestamp::DateTime(date_time)
    }
}

/// Uses the wall-clock fields in the date/time's own time zone; the offset is dropped.
impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(date_time: DateTime<Tz>) -> Self {
        Timestamp::DateTime(date_time.naive_local())
    }
}

/// Converted to the local time zone.
impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        DateTime::<Local>::from(time).into()
    }
}
