// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// An error that occurs while serializing a report.
///
/// Returned by [`Builder::build`](crate::Builder::build) and
/// [`Builder::serialize`](crate::Builder::serialize).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// The XML writer failed.
    #[error("error serializing JUnit report")]
    Xml(#[from] quick_xml::Error),

    /// The serialized report was not valid UTF-8.
    #[error("serialized JUnit report is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// An error that occurs while writing a report to disk.
///
/// Returned by [`Builder::write_to`](crate::Builder::write_to).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteError {
    /// The report could not be serialized.
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// A parent directory of the output path could not be created.
    #[error("error creating directory {dir}")]
    CreateDir {
        /// The directory being created.
        dir: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The report file could not be written.
    #[error("error writing JUnit report to {file}")]
    Write {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },
}

impl WriteError {
    /// Returns the underlying IO error, if this error came from the file system.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            WriteError::Serialize(_) => None,
            WriteError::CreateDir { error, .. } | WriteError::Write { error, .. } => Some(error),
        }
    }
}
