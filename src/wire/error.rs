// Sun Jan 18 2026 - Alex

use crate::seismic::SeismicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Record truncated while reading {field}: need {needed} byte(s), {remaining} left")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    #[error("Unterminated string field {0}")]
    UnterminatedString(&'static str),
    #[error("String field {0} is not valid UTF-8")]
    InvalidString(&'static str),
    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: i64 },
    #[error("Unexpected job tag {found:?}, expected {expected:?}")]
    TagMismatch { expected: String, found: String },
    #[error("{0} trailing byte(s) after record")]
    TrailingBytes(usize),
    #[error("Invalid gather in record: {0}")]
    Gather(#[from] SeismicError),
}
