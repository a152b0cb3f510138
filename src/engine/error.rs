// Fri Jan 16 2026 - Alex

use crate::config::ConfigError;
use crate::engine::task::UnitKey;
use crate::orchestration::AggregationError;
use crate::semblance::SemblanceError;
use thiserror::Error;

/// Failure of a single work unit. Carries the unit key so the orchestrator
/// can report it, retry it, or abort the job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Computation invariant violated for {key}: {source}")]
    Invariant {
        key: UnitKey,
        #[source]
        source: SemblanceError,
    },
    #[error("Sample range of {key} does not fit a gather of {ns} samples")]
    RangeOutOfBounds { key: UnitKey, ns: usize },
    #[error("Scan of {key} panicked: {message}")]
    Panicked { key: UnitKey, message: String },
}

impl ScanError {
    pub fn key(&self) -> UnitKey {
        match self {
            ScanError::Invariant { key, .. } => *key,
            ScanError::RangeOutOfBounds { key, .. } => *key,
            ScanError::Panicked { key, .. } => *key,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Work unit failed after {attempts} attempt(s): {source}")]
    UnitFailed {
        attempts: u32,
        #[source]
        source: ScanError,
    },
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
