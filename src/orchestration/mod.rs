// Sat Jan 17 2026 - Alex

pub mod aggregator;
pub mod error;
pub mod finalizer;
pub mod partitioner;

pub use aggregator::{CommittedCubes, CubeKind, MergeOutcome, OutputCube, ResultAggregator, SharedAggregator};
pub use error::AggregationError;
pub use finalizer::OutputFinalizer;
pub use partitioner::{PartitionMode, TaskPartitioner};
