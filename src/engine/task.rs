// Fri Jan 16 2026 - Alex

use crate::seismic::{Gather, NeighborGather};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Identity of a work unit: one CDP and a half-open sample range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub cdp: i32,
    pub start: usize,
    pub end: usize,
}

impl UnitKey {
    pub fn new(cdp: i32, start: usize, end: usize) -> Self {
        Self { cdp, start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cdp {} samples [{}, {})", self.cdp, self.start, self.end)
    }
}

/// Independently computable slice of the scan. Holds the gather (and any
/// neighbours) it needs by shared reference; never mutated after creation.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    ordinal: usize,
    key: UnitKey,
    gather: Arc<Gather>,
    neighbors: Vec<NeighborGather>,
}

impl WorkUnit {
    pub fn new(ordinal: usize, gather: Arc<Gather>, range: Range<usize>) -> Self {
        let key = UnitKey::new(gather.cdp(), range.start, range.end);
        Self {
            ordinal,
            key,
            gather,
            neighbors: Vec::new(),
        }
    }

    pub fn with_neighbors(mut self, neighbors: Vec<NeighborGather>) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Position of the gather in its gather set.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn key(&self) -> UnitKey {
        self.key
    }

    pub fn sample_range(&self) -> Range<usize> {
        self.key.range()
    }

    pub fn gather(&self) -> &Gather {
        &self.gather
    }

    pub fn neighbors(&self) -> &[NeighborGather] {
        &self.neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::fixtures;

    #[test]
    fn test_unit_key_display_and_len() {
        let key = UnitKey::new(12, 500, 1000);
        assert_eq!(key.to_string(), "cdp 12 samples [500, 1000)");
        assert_eq!(key.len(), 500);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_unit_key_order() {
        let mut keys = vec![UnitKey::new(2, 0, 5), UnitKey::new(1, 5, 10), UnitKey::new(1, 0, 5)];
        keys.sort();
        assert_eq!(keys, vec![UnitKey::new(1, 0, 5), UnitKey::new(1, 5, 10), UnitKey::new(2, 0, 5)]);
    }

    #[test]
    fn test_work_unit_carries_neighbors() {
        let gather = Arc::new(fixtures::flat_gather(3, 4, 10, 1.0));
        let neighbor = NeighborGather {
            gather: Arc::new(fixtures::flat_gather(4, 2, 10, 1.0)),
            displacement: 5.0,
        };
        let unit = WorkUnit::new(0, gather, 0..10).with_neighbors(vec![neighbor]);
        assert_eq!(unit.key(), UnitKey::new(3, 0, 10));
        assert_eq!(unit.neighbors().len(), 1);
        assert_eq!(unit.neighbors()[0].gather.cdp(), 4);
        assert_eq!(unit.sample_range(), 0..10);
    }
}
