// Thu Jan 15 2026 - Alex

pub mod engine;
pub mod error;

pub use engine::{check_range, interpolate, Semblance, SemblanceEngine, SemblanceWindow};
pub use error::SemblanceError;
