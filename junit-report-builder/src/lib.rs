// Copyright (c) The diem-devtools Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build JUnit XML reports incrementally.
//!
//! Obtain a [`Builder`] with [`new_builder`], create testsuites and testcases through it, and
//! configure them with fluent setters in any order. [`Builder::build`] produces the XML document
//! and [`Builder::write_to`] writes it to a file.
//!
//! ```
//! let mut builder = junit_report_builder::new_builder();
//! builder
//!     .test_suite()
//!     .name("second.Suite")
//!     .test_case()
//!     .failure(Some("Failure message"), None, None);
//!
//! assert_eq!(
//!     builder.build().unwrap(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
//!      <testsuites>\n  \
//!        <testsuite name=\"second.Suite\" tests=\"1\" failures=\"1\" errors=\"0\" skipped=\"0\">\n    \
//!          <testcase>\n      \
//!            <failure message=\"Failure message\"/>\n    \
//!          </testcase>\n  \
//!        </testsuite>\n\
//!      </testsuites>",
//! );
//! ```

mod element;
mod errors;
mod report;
pub mod sanitize;
mod serialize;
mod test_case;
mod test_suite;

pub use element::{AttributeValue, Element, Node};
pub use errors::*;
pub use report::*;
pub use test_case::*;
pub use test_suite::*;

/// Creates a new, independent [`Builder`] with an empty report.
pub fn new_builder() -> Builder {
    Builder::new()
}
