//! # Error Types
//!
//! Every fallible operation in the library returns [`DraftError`]. Errors are
//! terminal for the request that raised them: nothing retries and nothing is
//! partially recovered. An empty range selection is a valid result and never
//! shows up here.

use chrono::NaiveDateTime;
use std::io;
use thiserror::Error;

/// Errors that can occur while loading a forecast or querying it.
#[derive(Error, Debug)]
pub enum DraftError {
    /// A data row could not be read (bad datetime, non-numeric value,
    /// wrong number of fields or invalid text encoding)
    #[error("format error on line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// The forecast has no data rows, or an empty series was queried for bounds
    #[error("forecast contains no samples")]
    EmptyInput,

    /// No sample carries exactly this timestamp
    #[error("no sample at {0}")]
    NotFound(NaiveDateTime),

    /// Range start lies after range end
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Forecast file could not be read
    #[error("forecast IO: {0}")]
    Io(#[from] io::Error),
}

impl DraftError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        DraftError::Format {
            line,
            reason: reason.into(),
        }
    }
}
