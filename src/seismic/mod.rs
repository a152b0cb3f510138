// Wed Jan 14 2026 - Alex

pub mod error;
pub mod gather;
pub mod su;
pub mod trace;

#[cfg(test)]
pub mod fixtures;

pub use error::SeismicError;
pub use gather::{Gather, GatherSet, NeighborGather};
pub use su::{SuReader, SuWriter};
pub use trace::{Trace, TraceHeader, HEADER_SIZE};
