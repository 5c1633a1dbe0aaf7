// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{element::Element, sanitize::attachment_marker};

static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";
static ERROR_TAG: &str = "error";
static SKIPPED_TAG: &str = "skipped";
static SYSTEM_OUT_TAG: &str = "system-out";
static SYSTEM_ERR_TAG: &str = "system-err";

/// Represents a single testcase.
///
/// Created through [`TestSuite::test_case`](crate::TestSuite::test_case) or
/// [`Builder::test_case`](crate::Builder::test_case), then configured with the fluent setters
/// below. Every setter may be called any number of times; the last call wins unless documented
/// otherwise.
#[derive(Clone, Debug, Default)]
pub struct TestCase {
    name: Option<String>,
    class_name: Option<String>,
    time: Option<f64>,
    file: Option<String>,
    status: TestCaseStatus,
    stacktrace: Option<String>,
    system_out: CapturedOutput,
    system_err: CapturedOutput,
}

impl TestCase {
    /// Creates a new testcase with no attributes and no outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the testcase.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the class name of the testcase, written as the `className` attribute.
    ///
    /// Typically, this represents the fully qualified path to the test. In other words,
    /// `className` + `name` together should uniquely identify and locate a test.
    pub fn class_name(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the time taken by the testcase, in seconds.
    pub fn time(&mut self, seconds: f64) -> &mut Self {
        self.time = Some(seconds);
        self
    }

    /// Sets the file the testcase is defined in.
    pub fn file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = Some(file.into());
        self
    }

    /// Marks the testcase as failed, replacing any earlier outcome.
    ///
    /// `content` is written as the CDATA body of the `failure` element.
    pub fn failure(
        &mut self,
        message: Option<&str>,
        ty: Option<&str>,
        content: Option<&str>,
    ) -> &mut Self {
        self.status = TestCaseStatus::non_success(NonSuccessKind::Failure, message, ty, content);
        self
    }

    /// Marks the testcase as errored, replacing any earlier outcome.
    ///
    /// `content` is written as the CDATA body of the `error` element.
    pub fn error(
        &mut self,
        message: Option<&str>,
        ty: Option<&str>,
        content: Option<&str>,
    ) -> &mut Self {
        self.status = TestCaseStatus::non_success(NonSuccessKind::Error, message, ty, content);
        self
    }

    /// Marks the testcase as skipped, replacing any earlier outcome.
    pub fn skipped(&mut self) -> &mut Self {
        self.status = TestCaseStatus::Skipped;
        self
    }

    /// Sets the stack trace.
    ///
    /// The stack trace is only written if the testcase has a failure or error outcome, in which
    /// case it follows the outcome's content inside the same element. It does not set an
    /// outcome by itself.
    pub fn stacktrace(&mut self, stacktrace: impl Into<String>) -> &mut Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    /// Sets standard output. Attachments added earlier are kept.
    pub fn standard_output(&mut self, output: impl Into<String>) -> &mut Self {
        self.system_out.text = Some(output.into());
        self
    }

    /// Sets standard output from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn standard_output_lossy(&mut self, output: impl AsRef<[u8]>) -> &mut Self {
        self.standard_output(String::from_utf8_lossy(output.as_ref()))
    }

    /// Sets standard error. Attachments added earlier are kept.
    pub fn standard_error(&mut self, output: impl Into<String>) -> &mut Self {
        self.system_err.text = Some(output.into());
        self
    }

    /// Sets standard error from a `Vec<u8>`.
    ///
    /// The output is converted to a string, lossily.
    pub fn standard_error_lossy(&mut self, output: impl AsRef<[u8]>) -> &mut Self {
        self.standard_error(String::from_utf8_lossy(output.as_ref()))
    }

    /// Attaches a file to standard output. Attachments accumulate.
    pub fn output_attachment(&mut self, path: impl Into<String>) -> &mut Self {
        self.system_out.attachments.push(path.into());
        self
    }

    /// Attaches a file to standard error. Attachments accumulate.
    pub fn error_attachment(&mut self, path: impl Into<String>) -> &mut Self {
        self.system_err.attachments.push(path.into());
        self
    }

    /// Returns the current outcome.
    pub fn status(&self) -> &TestCaseStatus {
        &self.status
    }

    /// Returns 1 if this testcase failed, otherwise 0.
    pub fn failure_count(&self) -> usize {
        self.status.non_success_kind_count(NonSuccessKind::Failure)
    }

    /// Returns 1 if this testcase errored, otherwise 0.
    pub fn error_count(&self) -> usize {
        self.status.non_success_kind_count(NonSuccessKind::Error)
    }

    /// Returns 1 if this testcase was skipped, otherwise 0.
    pub fn skipped_count(&self) -> usize {
        usize::from(matches!(self.status, TestCaseStatus::Skipped))
    }

    /// Appends a `testcase` element describing this testcase to `parent`.
    pub fn build(&self, parent: &mut Element) {
        // Use the destructuring syntax to ensure that all fields are handled.
        let TestCase {
            name,
            class_name,
            time,
            file,
            status,
            stacktrace,
            system_out,
            system_err,
        } = self;

        let mut testcase = Element::new(TESTCASE_TAG);
        if let Some(name) = name {
            testcase.attribute("name", name.as_str());
        }
        if let Some(class_name) = class_name {
            testcase.attribute("className", class_name.as_str());
        }
        if let Some(time) = time {
            testcase.numeric_attribute("time", time);
        }
        if let Some(file) = file {
            testcase.attribute("file", file.as_str());
        }

        match status {
            TestCaseStatus::Success => {}
            TestCaseStatus::NonSuccess {
                kind,
                message,
                ty,
                content,
            } => {
                let mut status_element = Element::new(kind.tag_name());
                if let Some(message) = message {
                    status_element.attribute("message", message.as_str());
                }
                if let Some(ty) = ty {
                    status_element.attribute("type", ty.as_str());
                }
                for body in [content, stacktrace].into_iter().flatten() {
                    if !body.is_empty() {
                        status_element.cdata(body.as_str());
                    }
                }
                testcase.append(status_element);
            }
            TestCaseStatus::Skipped => {
                testcase.append(Element::new(SKIPPED_TAG));
            }
        }

        system_out.build(SYSTEM_OUT_TAG, &mut testcase);
        system_err.build(SYSTEM_ERR_TAG, &mut testcase);
        parent.append(testcase);
    }
}

/// Represents the outcome of a testcase.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TestCaseStatus {
    /// No outcome was recorded. JUnit consumers treat this as a pass.
    #[default]
    Success,

    /// This testcase did not pass.
    NonSuccess {
        /// Whether this testcase failed in an expected way (failure) or an unexpected way (error).
        kind: NonSuccessKind,

        /// The failure message.
        message: Option<String>,

        /// The "type" of failure that occurred.
        ty: Option<String>,

        /// The body of the failure, written as CDATA.
        content: Option<String>,
    },

    /// This testcase was not run.
    Skipped,
}

impl TestCaseStatus {
    fn non_success(
        kind: NonSuccessKind,
        message: Option<&str>,
        ty: Option<&str>,
        content: Option<&str>,
    ) -> Self {
        TestCaseStatus::NonSuccess {
            kind,
            message: message.map(str::to_owned),
            ty: ty.map(str::to_owned),
            content: content.map(str::to_owned),
        }
    }

    fn non_success_kind_count(&self, expected: NonSuccessKind) -> usize {
        match self {
            TestCaseStatus::NonSuccess { kind, .. } => usize::from(*kind == expected),
            TestCaseStatus::Success | TestCaseStatus::Skipped => 0,
        }
    }
}

/// The kind of outcome a testcase that did not pass reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NonSuccessKind {
    /// This is an expected failure. Serialized as `failure`.
    Failure,

    /// This is an unexpected error. Serialized as `error`.
    Error,
}

impl NonSuccessKind {
    fn tag_name(self) -> &'static str {
        match self {
            NonSuccessKind::Failure => FAILURE_TAG,
            NonSuccessKind::Error => ERROR_TAG,
        }
    }
}

/// Text written to standard output or standard error, plus any attached files.
#[derive(Clone, Debug, Default)]
struct CapturedOutput {
    text: Option<String>,
    attachments: Vec<String>,
}

impl CapturedOutput {
    fn build(&self, tag_name: &'static str, parent: &mut Element) {
        let text = self.text.as_deref().filter(|text| !text.is_empty());
        if text.is_none() && self.attachments.is_empty() {
            return;
        }

        let mut element = Element::new(tag_name);
        if let Some(text) = text {
            element.cdata(text);
        }
        for path in &self.attachments {
            element.text(attachment_marker(path));
        }
        parent.append(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Node;

    fn build(testcase: &TestCase) -> Element {
        let mut parent = Element::new("testsuite");
        testcase.build(&mut parent);
        parent
            .find(TESTCASE_TAG)
            .cloned()
            .expect("testcase element was created")
    }

    #[test]
    fn empty_testcase_has_no_attributes_or_children() {
        let element = build(&TestCase::new());
        assert_eq!(element.attributes().count(), 0);
        assert!(element.children().is_empty());
    }

    #[test]
    fn attributes_in_fixed_order() {
        let mut testcase = TestCase::new();
        testcase
            .file("./path-to/the-test-file.coffee")
            .time(2.5)
            .class_name("suite1.test.Class2")
            .name("Third test");

        let element = build(&testcase);
        let attributes: Vec<_> = element
            .attributes()
            .map(|(name, value)| (name, value.as_str().to_owned()))
            .collect();
        assert_eq!(
            attributes,
            vec![
                ("name", "Third test".to_owned()),
                ("className", "suite1.test.Class2".to_owned()),
                ("time", "2.5".to_owned()),
                ("file", "./path-to/the-test-file.coffee".to_owned()),
            ]
        );
    }

    #[test]
    fn last_setter_call_wins() {
        let mut testcase = TestCase::new();
        testcase.name("first").name("second");
        assert_eq!(build(&testcase).get_attribute("name"), Some("second"));
    }

    #[test]
    fn failure_with_message_type_and_content() {
        let mut testcase = TestCase::new();
        testcase.failure(Some("it failed"), Some("the type"), Some("the content"));

        let element = build(&testcase);
        let failure = element.find(FAILURE_TAG).expect("failure element");
        assert_eq!(failure.get_attribute("message"), Some("it failed"));
        assert_eq!(failure.get_attribute("type"), Some("the type"));
        assert_eq!(failure.children(), &[Node::CData("the content".to_owned())]);
        assert_eq!(testcase.failure_count(), 1);
        assert_eq!(testcase.error_count(), 0);
        assert_eq!(testcase.skipped_count(), 0);
    }

    #[test]
    fn later_outcome_replaces_earlier() {
        let mut testcase = TestCase::new();
        testcase
            .failure(Some("failed"), Some("assertion"), None)
            .error(Some("errored"), None, None);

        let element = build(&testcase);
        assert!(element.find(FAILURE_TAG).is_none());
        let error = element.find(ERROR_TAG).expect("error element");
        assert_eq!(error.get_attribute("message"), Some("errored"));
        assert_eq!(error.get_attribute("type"), None);
        assert_eq!((testcase.failure_count(), testcase.error_count()), (0, 1));

        testcase.skipped();
        let element = build(&testcase);
        assert_eq!(element.children().len(), 1);
        assert!(element.find(SKIPPED_TAG).is_some());
        assert_eq!(
            (
                testcase.failure_count(),
                testcase.error_count(),
                testcase.skipped_count()
            ),
            (0, 0, 1)
        );
    }

    #[test]
    fn stacktrace_follows_content() {
        let mut testcase = TestCase::new();
        testcase
            .stacktrace("at foo.rs:1")
            .error(None, None, Some("content"));

        let error = build(&testcase).find(ERROR_TAG).cloned().expect("error element");
        assert_eq!(
            error.children(),
            &[
                Node::CData("content".to_owned()),
                Node::CData("at foo.rs:1".to_owned()),
            ]
        );
    }

    #[test]
    fn stacktrace_without_outcome_is_not_written() {
        let mut testcase = TestCase::new();
        testcase.stacktrace("Stacktrace");

        assert!(build(&testcase).children().is_empty());
        assert_eq!(testcase.failure_count(), 0);
        assert_eq!(testcase.status(), &TestCaseStatus::Success);

        testcase.skipped();
        let element = build(&testcase);
        assert!(element.find(SKIPPED_TAG).expect("skipped").children().is_empty());
    }

    #[test]
    fn output_elements_follow_outcome() {
        let mut testcase = TestCase::new();
        testcase
            .standard_error("stderr")
            .standard_output("stdout")
            .failure(None, None, None);

        let names: Vec<_> = build(&testcase).child_elements().map(Element::name).collect();
        assert_eq!(names, vec![FAILURE_TAG, SYSTEM_OUT_TAG, SYSTEM_ERR_TAG]);
    }

    #[test]
    fn standard_output_replaces_text_and_keeps_attachments() {
        let mut testcase = TestCase::new();
        testcase
            .output_attachment("first.png")
            .standard_output("one")
            .standard_output("two")
            .output_attachment("second.png");

        let element = build(&testcase);
        let system_out = element.find(SYSTEM_OUT_TAG).expect("system-out");
        assert_eq!(
            system_out.children(),
            &[
                Node::CData("two".to_owned()),
                Node::Text("[[ATTACHMENT|first.png]]".to_owned()),
                Node::Text("[[ATTACHMENT|second.png]]".to_owned()),
            ]
        );
    }

    #[test]
    fn error_attachment_without_text_creates_system_err() {
        let mut testcase = TestCase::new();
        testcase.error_attachment("absolute/path/to/attachment");

        let element = build(&testcase);
        let system_err = element.find(SYSTEM_ERR_TAG).expect("system-err");
        assert_eq!(
            system_err.children(),
            &[Node::Text(
                "[[ATTACHMENT|absolute/path/to/attachment]]".to_owned()
            )]
        );
        assert!(element.find(SYSTEM_OUT_TAG).is_none());
    }

    #[test]
    fn empty_output_is_omitted() {
        let mut testcase = TestCase::new();
        testcase.standard_output("").standard_error("");
        assert!(build(&testcase).children().is_empty());
    }

    #[test]
    fn lossy_output() {
        let mut testcase = TestCase::new();
        testcase.standard_error_lossy(b"bad \xff byte");

        let element = build(&testcase);
        assert_eq!(
            element.find(SYSTEM_ERR_TAG).expect("system-err").children(),
            &[Node::CData("bad \u{FFFD} byte".to_owned())]
        );
    }
}
