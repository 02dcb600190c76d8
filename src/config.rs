//! # Configuration
//!
//! All knobs are optional; a missing file or a missing key falls back to the
//! defaults below.
//!
//! ```json
//! {
//!   "simulation": { "tick_interval_ms": 500, "clock_speed": 60.0, "seed": 7 },
//!   "cart": { "storage_dir": "/tmp/order-sim" }
//! }
//! ```

use crate::simulation::RouteParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable the demo binary reads the config path from.
pub const CONFIG_ENV: &str = "ORDER_SIM_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Fraction of the order's total duration before the driver leaves.
    pub driver_start_fraction: f64,
    pub max_eta_minutes: u32,
    /// How long a delivered order stays queryable.
    pub eviction_grace_secs: u64,
    /// Simulated seconds per real second.
    pub clock_speed: f64,
    /// Seed for the chef/driver/geography roster. Random when absent.
    pub seed: Option<u64>,
    pub channel_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let route = RouteParams::default();
        Self {
            tick_interval_ms: 1000,
            driver_start_fraction: route.driver_start_fraction,
            max_eta_minutes: route.max_eta_minutes,
            eviction_grace_secs: 60,
            clock_speed: 1.0,
            seed: None,
            channel_capacity: 32,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    pub fn eviction_grace(&self) -> chrono::Duration {
        let secs = self.eviction_grace_secs.min(u64::from(u32::MAX));
        chrono::Duration::seconds(secs as i64)
    }

    pub fn route(&self) -> RouteParams {
        RouteParams {
            driver_start_fraction: self.driver_start_fraction,
            max_eta_minutes: self.max_eta_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    pub storage_key: String,
    /// Directory for the file-backed store. In-memory storage when absent.
    pub storage_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: "cart".to_string(),
            storage_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub cart: CartConfig,
}

impl AppConfig {
    /// Reads and validates the config at `path`, or returns the defaults
    /// when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads from the path in [`CONFIG_ENV`], if set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be > 0".into()));
        }
        if !(0.0..1.0).contains(&sim.driver_start_fraction) {
            return Err(ConfigError::Invalid(format!(
                "driver_start_fraction must be in [0, 1), got {}",
                sim.driver_start_fraction
            )));
        }
        if !sim.clock_speed.is_finite() || sim.clock_speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "clock_speed must be positive, got {}",
                sim.clock_speed
            )));
        }
        if sim.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be > 0".into()));
        }
        if self.cart.storage_key.is_empty() {
            return Err(ConfigError::Invalid("cart.storage_key must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "simulation": { "tick_interval_ms": 250 } }"#).unwrap();
        assert_eq!(config.simulation.tick_interval_ms, 250);
        assert_eq!(config.simulation.max_eta_minutes, 12);
        assert_eq!(config.cart, CartConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_fraction() {
        let config =
            AppConfig::from_json(r#"{ "simulation": { "driver_start_fraction": 1.0 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            AppConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
