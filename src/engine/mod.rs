// Fri Jan 16 2026 - Alex

pub mod core;
pub mod error;
pub mod result;
pub mod scanner;
pub mod scheduler;
pub mod task;
pub mod traits;
pub mod worker;

pub use self::core::{Engine, EngineState};
pub use error::{EngineError, ScanError};
pub use result::{JobStatistics, PartialResult, SampleResult, TaskResult, TaskResultWithMetadata};
pub use scanner::VelocityScanner;
pub use scheduler::TaskScheduler;
pub use task::{UnitKey, WorkUnit};
pub use traits::{Aggregator, Partitioner, Scanner};
pub use worker::Worker;
