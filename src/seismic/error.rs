// Wed Jan 14 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeismicError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Truncated trace {index} at byte {offset}")]
    Truncated { index: usize, offset: usize },
    #[error("Trace {0} declares zero samples")]
    EmptyTrace(usize),
    #[error("Sample count mismatch: header declares {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("Gather for cdp {cdp} is inconsistent: {reason}")]
    InconsistentGather { cdp: i32, reason: String },
    #[error("Empty gather for cdp {0}")]
    EmptyGather(i32),
    #[error("Duplicate gather for cdp {0}")]
    DuplicateCdp(i32),
    #[error("No gathers found in input")]
    NoGathers,
    #[error("Target cdp {0} not present in input")]
    TargetNotFound(i32),
    #[error("Output cube shape mismatch: {0}")]
    ShapeMismatch(String),
}
