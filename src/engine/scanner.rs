// Fri Jan 16 2026 - Alex

use crate::config::{ConfigError, ScanConfig};
use crate::engine::error::ScanError;
use crate::engine::result::{PartialResult, SampleResult};
use crate::engine::task::WorkUnit;
use crate::moveout::{MoveoutTerms, VelocityTable};
use crate::seismic::{Gather, NeighborGather};
use crate::semblance::{Semblance, SemblanceEngine, SemblanceError, SemblanceWindow};
use rayon::prelude::*;
use std::sync::Arc;

/// Runs the velocity search for every sample of a work unit.
///
/// Holds only read-only state, so one scanner can serve any number of
/// threads at once.
#[derive(Debug, Clone)]
pub struct VelocityScanner {
    config: Arc<ScanConfig>,
    table: Arc<VelocityTable>,
    engine: SemblanceEngine,
}

impl VelocityScanner {
    pub fn new(config: Arc<ScanConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = Arc::new(VelocityTable::from_config(&config)?);
        let engine = SemblanceEngine::from_config(&config);

        Ok(Self { config, table, engine })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn velocity_table(&self) -> &VelocityTable {
        &self.table
    }

    pub fn process(&self, unit: &WorkUnit) -> Result<PartialResult, ScanError> {
        let key = unit.key();
        let gather = unit.gather();
        let ns = gather.sample_count();

        if key.start > key.end || key.end > ns {
            return Err(ScanError::RangeOutOfBounds { key, ns });
        }

        let window = SemblanceWindow::new(self.config.window, gather.seconds_per_sample())
            .map_err(|source| ScanError::Invariant { key, source })?;

        let samples: Result<Vec<SampleResult>, SemblanceError> = if self.config.parallel_samples {
            unit.sample_range()
                .into_par_iter()
                .map(|a| self.scan_sample(gather, unit.neighbors(), &window, a))
                .collect()
        } else {
            unit.sample_range()
                .map(|a| self.scan_sample(gather, unit.neighbors(), &window, a))
                .collect()
        };

        let samples = samples.map_err(|source| {
            log::error!("Scan of {} failed: {}", key, source);
            ScanError::Invariant { key, source }
        })?;

        Ok(PartialResult::from_samples(unit.ordinal(), key, samples))
    }

    /// Best candidate for sample `a`. Candidates are tried in table order and
    /// only a strictly higher semblance replaces the current best, so ties
    /// keep the lowest velocity.
    pub fn scan_sample(
        &self,
        gather: &Gather,
        neighbors: &[NeighborGather],
        window: &SemblanceWindow,
        a: usize,
    ) -> Result<SampleResult, SemblanceError> {
        let t0 = a as f64 * window.seg();

        let mut best_semblance = 0.0f64;
        let mut best_velocity = 0.0f64;
        let mut stack = gather.reference_trace().samples()[a] as f64;

        for entry in self.table.iter() {
            let terms = MoveoutTerms::hyperbolic(entry.curvature);
            if let Semblance::Coherent { value, stack: candidate } =
                self.engine.compute(gather, neighbors, terms, t0, window)?
            {
                if value > best_semblance {
                    best_semblance = value;
                    best_velocity = entry.velocity;
                    stack = candidate;
                }
            }
        }

        Ok(SampleResult {
            stack: stack as f32,
            semblance: best_semblance as f32,
            velocity: best_velocity as f32,
        })
    }

    /// Scans a whole gather in one go.
    pub fn scan_gather(&self, ordinal: usize, gather: Arc<Gather>, neighbors: Vec<NeighborGather>) -> Result<PartialResult, ScanError> {
        let ns = gather.sample_count();
        let unit = WorkUnit::new(ordinal, gather, 0..ns).with_neighbors(neighbors);
        self.process(&unit)
    }
}
