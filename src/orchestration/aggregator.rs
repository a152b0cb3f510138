// Sat Jan 17 2026 - Alex

use crate::engine::result::{PartialResult, SampleResult};
use crate::engine::task::UnitKey;
use crate::engine::traits::Aggregator;
use crate::orchestration::error::AggregationError;
use crate::seismic::GatherSet;
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged,
    /// Same unit already merged; the copy was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeKind {
    Stack,
    Semblance,
    Velocity,
}

impl CubeKind {
    pub const ALL: [CubeKind; 3] = [CubeKind::Stack, CubeKind::Semblance, CubeKind::Velocity];

    pub fn name(&self) -> &'static str {
        match self {
            CubeKind::Stack => "stack",
            CubeKind::Semblance => "semblance",
            CubeKind::Velocity => "velocity",
        }
    }
}

/// Write-once cells for every (cdp, sample) of a gather set.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCube {
    cdps: Vec<i32>,
    offsets: Vec<usize>,
    cells: Vec<Option<SampleResult>>,
}

impl OutputCube {
    pub fn new(gathers: &GatherSet) -> Self {
        let mut cdps = Vec::with_capacity(gathers.len());
        let mut offsets = Vec::with_capacity(gathers.len() + 1);
        let mut total = 0;

        for gather in gathers.gathers() {
            cdps.push(gather.cdp());
            offsets.push(total);
            total += gather.sample_count();
        }
        offsets.push(total);

        Self {
            cdps,
            offsets,
            cells: vec![None; total],
        }
    }

    fn position(&self, cdp: i32) -> Option<usize> {
        self.cdps.binary_search(&cdp).ok()
    }

    pub fn sample_count(&self, cdp: i32) -> Option<usize> {
        let g = self.position(cdp)?;
        Some(self.offsets[g + 1] - self.offsets[g])
    }

    pub fn get(&self, cdp: i32, sample: usize) -> Option<SampleResult> {
        let g = self.position(cdp)?;
        let index = self.offsets[g] + sample;
        if index >= self.offsets[g + 1] {
            return None;
        }
        self.cells[index]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Cell range of `key`, checked against the cube shape and the result length.
    fn cell_range(&self, key: UnitKey, len: usize) -> Result<std::ops::Range<usize>, AggregationError> {
        let g = self.position(key.cdp).ok_or(AggregationError::UnknownGather { key })?;
        let ns = self.offsets[g + 1] - self.offsets[g];

        if key.start > key.end || key.end > ns {
            return Err(AggregationError::ShapeMismatch {
                key,
                reason: format!("range exceeds {} samples", ns),
            });
        }
        if len != key.len() {
            return Err(AggregationError::ShapeMismatch {
                key,
                reason: format!("{} values for {} samples", len, key.len()),
            });
        }

        let base = self.offsets[g];
        Ok(base + key.start..base + key.end)
    }

    fn cdp_and_sample(&self, index: usize) -> (i32, usize) {
        // offsets is sorted; the last offset not greater than index owns it.
        let g = self.offsets.partition_point(|&o| o <= index) - 1;
        (self.cdps[g], index - self.offsets[g])
    }
}

/// Fully populated cubes, in increasing CDP and sample order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedCubes {
    cdps: Vec<i32>,
    offsets: Vec<usize>,
    stack: Vec<f32>,
    semblance: Vec<f32>,
    velocity: Vec<f32>,
}

impl CommittedCubes {
    pub fn cdps(&self) -> &[i32] {
        &self.cdps
    }

    pub fn gather_count(&self) -> usize {
        self.cdps.len()
    }

    pub fn cube(&self, kind: CubeKind) -> &[f32] {
        match kind {
            CubeKind::Stack => &self.stack,
            CubeKind::Semblance => &self.semblance,
            CubeKind::Velocity => &self.velocity,
        }
    }

    /// Samples of one cube for the gather at position `g`.
    pub fn trace(&self, kind: CubeKind, g: usize) -> Option<&[f32]> {
        let start = *self.offsets.get(g)?;
        let end = *self.offsets.get(g + 1)?;
        Some(&self.cube(kind)[start..end])
    }

    pub fn get(&self, cdp: i32, sample: usize) -> Option<SampleResult> {
        let g = self.cdps.binary_search(&cdp).ok()?;
        let index = self.offsets[g] + sample;
        if index >= self.offsets[g + 1] {
            return None;
        }
        Some(SampleResult {
            stack: self.stack[index],
            semblance: self.semblance[index],
            velocity: self.velocity[index],
        })
    }

    pub fn total_samples(&self) -> usize {
        self.stack.len()
    }
}

/// Single-writer merge of partial results into an [`OutputCube`].
///
/// Arrival order does not matter: each cell is written once, by the unit
/// that covers it, and every write is checked before any cell is touched.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    cube: OutputCube,
    merged: HashSet<UnitKey>,
    discarded: usize,
}

impl ResultAggregator {
    pub fn new(gathers: &GatherSet) -> Self {
        Self {
            cube: OutputCube::new(gathers),
            merged: HashSet::new(),
            discarded: 0,
        }
    }

    pub fn merge(&mut self, partial: PartialResult) -> Result<MergeOutcome, AggregationError> {
        let key = partial.key();

        if self.merged.contains(&key) {
            log::warn!("Discarding repeated result for {}", key);
            self.discarded += 1;
            return Ok(MergeOutcome::Discarded);
        }

        let range = self.cube.cell_range(key, partial.len())?;

        if let Some(offset) = self.cube.cells[range.clone()].iter().position(|c| c.is_some()) {
            let (cdp, sample) = self.cube.cdp_and_sample(range.start + offset);
            return Err(AggregationError::DuplicateCell { key, cdp, sample });
        }

        for (cell, sample) in self.cube.cells[range].iter_mut().zip(partial.iter()) {
            *cell = Some(sample);
        }
        self.merged.insert(key);

        log::debug!("Merged {}", key);
        Ok(MergeOutcome::Merged)
    }

    pub fn cube(&self) -> &OutputCube {
        &self.cube
    }

    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }

    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    pub fn is_complete(&self) -> bool {
        self.cube.cells.iter().all(|c| c.is_some())
    }

    /// Checks completeness and splits the cells into the three output cubes.
    pub fn commit(self) -> Result<CommittedCubes, AggregationError> {
        let cube = self.cube;
        let missing = cube.cells.iter().filter(|c| c.is_none()).count();

        if let Some(first) = cube.cells.iter().position(|c| c.is_none()) {
            let (cdp, sample) = cube.cdp_and_sample(first);
            return Err(AggregationError::Incomplete { missing, cdp, sample });
        }

        let total = cube.cells.len();
        let mut stack = Vec::with_capacity(total);
        let mut semblance = Vec::with_capacity(total);
        let mut velocity = Vec::with_capacity(total);

        for sample in cube.cells.into_iter().flatten() {
            stack.push(sample.stack);
            semblance.push(sample.semblance);
            velocity.push(sample.velocity);
        }

        log::info!("Committed {} cdps ({} samples)", cube.cdps.len(), total);

        Ok(CommittedCubes {
            cdps: cube.cdps,
            offsets: cube.offsets,
            stack,
            semblance,
            velocity,
        })
    }
}

impl Aggregator for ResultAggregator {
    fn merge(&mut self, partial: PartialResult) -> Result<MergeOutcome, AggregationError> {
        ResultAggregator::merge(self, partial)
    }
}

/// Lock-serialised aggregator for callers that merge from several threads.
pub struct SharedAggregator {
    inner: Mutex<ResultAggregator>,
}

impl SharedAggregator {
    pub fn new(aggregator: ResultAggregator) -> Self {
        Self {
            inner: Mutex::new(aggregator),
        }
    }

    pub fn merge(&self, partial: PartialResult) -> Result<MergeOutcome, AggregationError> {
        self.inner.lock().merge(partial)
    }

    pub fn merged_count(&self) -> usize {
        self.inner.lock().merged_count()
    }

    pub fn commit(self) -> Result<CommittedCubes, AggregationError> {
        self.inner.into_inner().commit()
    }
}
