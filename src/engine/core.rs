// Sun Jan 18 2026 - Alex

use crate::config::ScanConfig;
use crate::engine::error::EngineError;
use crate::engine::result::{JobStatistics, TaskResult, TaskResultWithMetadata};
use crate::engine::scanner::VelocityScanner;
use crate::engine::scheduler::TaskScheduler;
use crate::engine::task::{UnitKey, WorkUnit};
use crate::engine::traits::{Partitioner, Scanner};
use crate::orchestration::{CommittedCubes, MergeOutcome, PartitionMode, ResultAggregator, TaskPartitioner};
use crate::seismic::GatherSet;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Partition, compute and merge of one scan job.
///
/// Units run on a local [`TaskScheduler`]; results are merged on the calling
/// thread only, so the aggregator never needs a lock.
pub struct Engine {
    config: Arc<ScanConfig>,
    scanner: Arc<dyn Scanner>,
    state: EngineState,
    statistics: JobStatistics,
}

impl Engine {
    pub fn new(config: ScanConfig) -> Result<Self, EngineError> {
        let config = Arc::new(config);
        let scanner = Arc::new(VelocityScanner::new(config.clone())?);
        Ok(Self::with_scanner(config, scanner))
    }

    /// Engine around any scanner; the configuration must already be valid.
    pub fn with_scanner(config: Arc<ScanConfig>, scanner: Arc<dyn Scanner>) -> Self {
        Self {
            config,
            scanner,
            state: EngineState::Idle,
            statistics: JobStatistics::default(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn statistics(&self) -> &JobStatistics {
        &self.statistics
    }

    pub fn partition_mode(&self) -> PartitionMode {
        PartitionMode::from_config(&self.config)
    }

    pub fn plan(&self, gathers: &GatherSet) -> Vec<UnitKey> {
        TaskPartitioner::plan(gathers, self.partition_mode())
    }

    pub fn run(&mut self, gathers: Arc<GatherSet>) -> Result<CommittedCubes, EngineError> {
        self.run_with_observer(gathers, |_| {})
    }

    /// Runs the job, calling `observer` for every finished unit attempt.
    pub fn run_with_observer<F>(&mut self, gathers: Arc<GatherSet>, mut observer: F) -> Result<CommittedCubes, EngineError>
    where
        F: FnMut(&TaskResultWithMetadata),
    {
        if self.state == EngineState::Running {
            return Err(EngineError::InvalidState("engine is already running".to_string()));
        }
        self.state = EngineState::Running;

        let result = self.execute(gathers, &mut observer);
        self.state = if result.is_ok() { EngineState::Completed } else { EngineState::Failed };
        result
    }

    fn execute(
        &mut self,
        gathers: Arc<GatherSet>,
        observer: &mut dyn FnMut(&TaskResultWithMetadata),
    ) -> Result<CommittedCubes, EngineError> {
        let mode = self.partition_mode();
        let mut partitioner = TaskPartitioner::new(gathers.clone(), mode);
        let mut aggregator = ResultAggregator::new(&gathers);
        let mut scheduler = TaskScheduler::new(self.config.threads, self.scanner.clone());
        let mut outstanding: HashMap<UnitKey, WorkUnit> = HashMap::new();

        scheduler.start();
        while let Some(unit) = partitioner.next_unit() {
            outstanding.insert(unit.key(), unit.clone());
            scheduler.submit(unit);
        }

        self.statistics = JobStatistics::new(outstanding.len());
        log::info!("Scheduled {} units ({:?}) on {} threads", outstanding.len(), mode, scheduler.worker_count());

        while !outstanding.is_empty() {
            let finished = scheduler
                .recv()
                .ok_or_else(|| EngineError::InvalidState("workers stopped before the job finished".to_string()))?;

            self.statistics.record(&finished);
            observer(&finished);

            match finished.result {
                TaskResult::Success(partial) => {
                    // Only the first delivery of a unit reaches the aggregator.
                    if outstanding.remove(&finished.key).is_none() {
                        self.statistics.record_discard();
                        continue;
                    }
                    if aggregator.merge(partial)? == MergeOutcome::Discarded {
                        self.statistics.record_discard();
                    }
                }
                TaskResult::Failed(error) => {
                    let attempts = finished.attempt + 1;
                    match outstanding.get(&finished.key) {
                        Some(unit) if finished.attempt < self.config.max_retries => {
                            log::warn!("Retrying {} (attempt {}): {}", finished.key, attempts + 1, error);
                            self.statistics.record_retry();
                            scheduler.resubmit(unit.clone(), attempts);
                        }
                        _ => {
                            log::error!("Unit {} failed after {} attempt(s): {}", finished.key, attempts, error);
                            scheduler.clear_queue();
                            scheduler.stop();
                            return Err(EngineError::UnitFailed { attempts, source: error });
                        }
                    }
                }
            }
        }

        scheduler.stop();
        Ok(aggregator.commit()?)
    }
}
