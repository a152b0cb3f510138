// Tue Jan 13 2026 - Alex

pub mod config;
pub mod engine;
pub mod moveout;
pub mod orchestration;
pub mod seismic;
pub mod semblance;
pub mod ui;
pub mod utils;
pub mod wire;

pub use config::{ConfigError, ScanConfig};
pub use engine::core::Engine;
pub use engine::{EngineError, ScanError, VelocityScanner};
pub use orchestration::{CommittedCubes, OutputFinalizer, ResultAggregator, TaskPartitioner};
pub use seismic::{Gather, GatherSet, SuReader};
pub use semblance::{Semblance, SemblanceEngine};
