//! Error types for the pipeline.
//!
//! Two families live here:
//!
//! - [`MalformedRecord`] -- a single line could not be parsed by the active
//!   mapper. It never aborts a run: the driver skips the line, counts it and
//!   logs it at `debug`.
//! - [`PipelineError`] -- everything that aborts a run. A run that fails with
//!   one of these commits no output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fatal pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Why a mapper rejected a line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecord {
    /// Tab-delimited record with too few fields.
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    /// A field that must be numeric did not parse.
    #[error("field {field} is not a number: {text:?}")]
    NotANumber { field: &'static str, text: String },

    /// Fixed-width record shorter than the columns it must contain.
    #[error("line is {len} bytes, need at least {needed}")]
    LineTooShort { needed: usize, len: usize },

    /// A fixed-width column contained something other than ASCII text.
    #[error("column {column} is not ASCII")]
    NotAscii { column: &'static str },
}

/// Fatal pipeline failures.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or invalid configuration, detected before any processing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An input could not be opened or read.
    #[error("input unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output destination could not be opened, written or committed.
    #[error("output unavailable: {path}: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A reducer or combiner received values it cannot aggregate.
    #[error("{stage} failed for key {key}: {reason}")]
    Reduce {
        stage: &'static str,
        key: String,
        reason: String,
    },

    /// Any other failure raised by a helper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error was raised before the pipeline touched any data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
