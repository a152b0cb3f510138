// Sat Jan 17 2026 - Alex

use crate::engine::task::UnitKey;
use crate::seismic::SeismicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Output incomplete: {missing} cell(s) never written, first at cdp {cdp} sample {sample}")]
    Incomplete { missing: usize, cdp: i32, sample: usize },
    #[error("Cell cdp {cdp} sample {sample} already written (while merging {key})")]
    DuplicateCell { key: UnitKey, cdp: i32, sample: usize },
    #[error("No gather for {key}")]
    UnknownGather { key: UnitKey },
    #[error("Result for {key} does not fit the output: {reason}")]
    ShapeMismatch { key: UnitKey, reason: String },
    #[error("Output write failed: {0}")]
    Output(#[from] SeismicError),
}
