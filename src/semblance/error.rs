// Thu Jan 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemblanceError {
    #[error("Semblance {value} outside [0, 1] (tolerance {tolerance})")]
    OutOfRange { value: f64, tolerance: f64 },
    #[error("Invalid sample interval: {0} s")]
    InvalidSampleInterval(f64),
    #[error("Invalid window duration: {0} s")]
    InvalidWindow(f64),
}
