// Sat Jan 17 2026 - Alex

use crate::config::ScanConfig;
use crate::engine::task::{UnitKey, WorkUnit};
use crate::engine::traits::Partitioner;
use crate::seismic::GatherSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionMode {
    /// One unit per gather, all samples.
    PerCdp,
    /// Units of at most this many samples.
    Chunked(usize),
}

impl PartitionMode {
    pub fn from_config(config: &ScanConfig) -> Self {
        match config.chunk_size {
            Some(size) if size > 0 => PartitionMode::Chunked(size),
            _ => PartitionMode::PerCdp,
        }
    }
}

/// Walks the gather set in CDP order and, within a gather, in sample order.
pub struct TaskPartitioner {
    gathers: Arc<GatherSet>,
    mode: PartitionMode,
    ordinal: usize,
    start: usize,
    generated: usize,
}

impl TaskPartitioner {
    pub fn new(gathers: Arc<GatherSet>, mode: PartitionMode) -> Self {
        Self {
            gathers,
            mode,
            ordinal: 0,
            start: 0,
            generated: 0,
        }
    }

    pub fn mode(&self) -> PartitionMode {
        self.mode
    }

    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Keys of every unit this partitioner would generate, without building them.
    pub fn plan(gathers: &GatherSet, mode: PartitionMode) -> Vec<UnitKey> {
        let mut keys = Vec::new();
        for gather in gathers.gathers() {
            let ns = gather.sample_count();
            let step = match mode {
                PartitionMode::PerCdp => ns,
                PartitionMode::Chunked(size) => size,
            };
            let mut start = 0;
            while start < ns {
                let end = (start + step).min(ns);
                keys.push(UnitKey::new(gather.cdp(), start, end));
                start = end;
            }
        }
        keys
    }
}

impl Partitioner for TaskPartitioner {
    fn next_unit(&mut self) -> Option<WorkUnit> {
        loop {
            let gather = self.gathers.get(self.ordinal)?.clone();
            let ns = gather.sample_count();

            if self.start >= ns {
                self.ordinal += 1;
                self.start = 0;
                continue;
            }

            let end = match self.mode {
                PartitionMode::PerCdp => ns,
                PartitionMode::Chunked(size) => (self.start + size).min(ns),
            };

            let neighbors = self.gathers.neighbors(self.ordinal).to_vec();
            let unit = WorkUnit::new(self.ordinal, gather, self.start..end).with_neighbors(neighbors);
            self.start = end;
            self.generated += 1;

            log::debug!("Generated unit {}", unit.key());
            return Some(unit);
        }
    }
}

impl Iterator for TaskPartitioner {
    type Item = WorkUnit;

    fn next(&mut self) -> Option<WorkUnit> {
        self.next_unit()
    }
}
