// Wed Jan 14 2026 - Alex

use crate::config::{ConfigError, ScanConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityEntry {
    pub velocity: f64,
    /// Moveout curvature `4/v²`.
    pub curvature: f64,
}

/// Candidate stacking velocities in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityTable {
    entries: Vec<VelocityEntry>,
}

impl VelocityTable {
    /// `steps` velocities starting at `v_ini` with increment `(v_fin - v_ini) / steps`.
    /// `v_fin` itself is not part of the table.
    pub fn from_range(v_ini: f64, v_fin: f64, steps: usize) -> Result<Self, ConfigError> {
        if steps == 0 {
            return Err(ConfigError::InvalidVelocity("at least one velocity step is required".to_string()));
        }
        if !(v_ini > 0.0) || !(v_fin > v_ini) {
            return Err(ConfigError::InvalidVelocity(format!(
                "expected 0 < v_ini < v_fin, got {} .. {}",
                v_ini, v_fin
            )));
        }

        let increment = (v_fin - v_ini) / steps as f64;
        let entries = (0..steps)
            .map(|i| {
                let velocity = increment * i as f64 + v_ini;
                VelocityEntry {
                    velocity,
                    curvature: 4.0 / velocity / velocity,
                }
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self, ConfigError> {
        Self::from_range(config.v_ini, config.v_fin, config.v_int)
    }

    pub fn entries(&self) -> &[VelocityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VelocityEntry> {
        self.entries.iter()
    }
}
