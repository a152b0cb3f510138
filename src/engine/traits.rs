// Fri Jan 16 2026 - Alex

use crate::engine::error::ScanError;
use crate::engine::result::PartialResult;
use crate::engine::scanner::VelocityScanner;
use crate::engine::task::WorkUnit;
use crate::orchestration::{AggregationError, MergeOutcome};

/// Source of work units, in unit-identity order.
pub trait Partitioner {
    fn next_unit(&mut self) -> Option<WorkUnit>;
}

/// Pure computation of one work unit. Implementations must return the same
/// result for the same unit no matter how often or where they run.
pub trait Scanner: Send + Sync {
    fn process(&self, unit: &WorkUnit) -> Result<PartialResult, ScanError>;
}

/// Single-writer sink for partial results.
pub trait Aggregator {
    fn merge(&mut self, partial: PartialResult) -> Result<MergeOutcome, AggregationError>;
}

impl Scanner for VelocityScanner {
    fn process(&self, unit: &WorkUnit) -> Result<PartialResult, ScanError> {
        VelocityScanner::process(self, unit)
    }
}
