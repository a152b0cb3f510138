// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid velocity range: {0}")]
    InvalidVelocity(String),
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Longest accepted semblance window in seconds. Far beyond any recorded
/// trace; the exact per-gather limit is enforced when the window is built.
pub const MAX_WINDOW_SECONDS: f64 = 60.0;

/// Immutable parameters of one velocity scan.
///
/// A validated `ScanConfig` is handed to every component at construction;
/// nothing in the crate keeps scan parameters in global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub v_ini: f64,
    pub v_fin: f64,
    pub v_int: usize,
    /// Semblance window duration in seconds.
    pub window: f64,
    /// Maximum projected half-offset of an included trace. Zero disables the cut.
    pub aperture: f64,
    /// Scan azimuth in radians.
    pub azimuth: f64,
    pub target_cdp: Option<i32>,
    pub chunk_size: Option<usize>,
    pub neighbor_radius: Option<f64>,
    pub max_misses: usize,
    pub semblance_tolerance: f64,
    pub threads: usize,
    pub parallel_samples: bool,
    pub max_retries: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            v_ini: 1500.0,
            v_fin: 4500.0,
            v_int: 100,
            window: 0.008,
            aperture: 0.0,
            azimuth: 0.0,
            target_cdp: None,
            chunk_size: None,
            neighbor_radius: None,
            max_misses: 2,
            semblance_tolerance: 1e-6,
            threads: num_cpus::get(),
            parallel_samples: true,
            max_retries: 0,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ScanConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn with_velocities(mut self, v_ini: f64, v_fin: f64, v_int: usize) -> Self {
        self.v_ini = v_ini;
        self.v_fin = v_fin;
        self.v_int = v_int;
        self
    }

    pub fn with_window(mut self, window: f64) -> Self {
        self.window = window;
        self
    }

    pub fn with_aperture(mut self, aperture: f64) -> Self {
        self.aperture = aperture;
        self
    }

    pub fn with_azimuth(mut self, azimuth: f64) -> Self {
        self.azimuth = azimuth;
        self
    }

    pub fn with_target_cdp(mut self, cdp: i32) -> Self {
        self.target_cdp = Some(cdp);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    pub fn with_neighbor_radius(mut self, radius: f64) -> Self {
        self.neighbor_radius = Some(radius);
        self
    }

    pub fn with_max_misses(mut self, max_misses: usize) -> Self {
        self.max_misses = max_misses;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_parallel_samples(mut self, enabled: bool) -> Self {
        self.parallel_samples = enabled;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.v_ini.is_finite() || !self.v_fin.is_finite() {
            return Err(ConfigError::InvalidVelocity("velocity bounds must be finite".to_string()));
        }
        if self.v_ini <= 0.0 {
            return Err(ConfigError::InvalidVelocity(format!("v_ini must be positive, got {}", self.v_ini)));
        }
        if self.v_fin <= self.v_ini {
            return Err(ConfigError::InvalidVelocity(format!(
                "v_fin ({}) must be greater than v_ini ({})",
                self.v_fin, self.v_ini
            )));
        }
        if self.v_int == 0 {
            return Err(ConfigError::InvalidVelocity("v_int must be at least 1".to_string()));
        }
        check_non_negative("window", self.window)?;
        if self.window > MAX_WINDOW_SECONDS {
            return Err(ConfigError::InvalidParameter {
                name: "window",
                reason: format!("must not exceed {} s, got {}", MAX_WINDOW_SECONDS, self.window),
            });
        }
        check_non_negative("aperture", self.aperture)?;
        check_non_negative("semblance_tolerance", self.semblance_tolerance)?;
        if !self.azimuth.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "azimuth",
                reason: "must be finite".to_string(),
            });
        }
        if let Some(radius) = self.neighbor_radius {
            check_non_negative("neighbor_radius", radius)?;
        }
        if self.chunk_size == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_misses == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_misses",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "threads",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite and non-negative, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_velocity_range() {
        let config = ScanConfig::new().with_velocities(3000.0, 2000.0, 10);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidVelocity(_))));
    }

    #[test]
    fn test_rejects_zero_velocity() {
        let config = ScanConfig::new().with_velocities(0.0, 2000.0, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_chunk_and_misses() {
        assert!(ScanConfig::new().with_chunk_size(0).validate().is_err());
        assert!(ScanConfig::new().with_max_misses(0).validate().is_err());
        assert!(ScanConfig::new().with_threads(0).validate().is_err());
    }

    #[test]
    fn test_rejects_negative_window() {
        let config = ScanConfig::new().with_window(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "window", .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_window() {
        assert!(ScanConfig::new().with_window(MAX_WINDOW_SECONDS).validate().is_ok());
        let config = ScanConfig::new().with_window(1e20);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "window", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"v_ini": 2000.0, "v_fin": 3000.0}"#).unwrap();
        assert_eq!(config.v_ini, 2000.0);
        assert_eq!(config.max_misses, 2);
        assert!(config.validate().is_ok());
    }
}
