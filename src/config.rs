//! Tracker configuration
//!
//! Defaults match a browser-style geolocation watch: high accuracy, a 10 s
//! timeout, no cached positions, and a 1 Hz duration timer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{Result, TrackerError};

/// Options passed to the platform when subscribing to location updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Maximum wait for a position, milliseconds
    pub timeout_ms: u32,
    /// Maximum age of a cached position, milliseconds
    pub maximum_age_ms: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { high_accuracy: true, timeout_ms: 10_000, maximum_age_ms: 0 }
    }
}

/// Tracking session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct TrackerConfig {
    /// Period of the duration timer, milliseconds
    pub tick_interval_ms: u32,
    /// Activities shorter than this are rejected at finalization
    pub min_save_distance_km: f64,
    /// Prefix of the generated name when the user leaves it blank
    pub default_name_prefix: String,
    pub watch: WatchOptions,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            min_save_distance_km: 0.01,
            default_name_prefix: "Run on".to_string(),
            watch: WatchOptions::default(),
        }
    }
}

impl TrackerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Parse and validate a YAML document. Missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TrackerConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| TrackerError::config_error("tracker config YAML", e.to_string()))?;
        config.validate()?;
        debug!(?config, "Loaded tracker config");
        Ok(config)
    }

    /// Read, parse and validate a YAML config file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(TrackerError::config_error(
                "tick_interval_ms",
                "must be greater than zero",
            ));
        }
        if !self.min_save_distance_km.is_finite() || self.min_save_distance_km < 0.0 {
            return Err(TrackerError::config_error(
                "min_save_distance_km",
                format!("must be a non-negative number, got {}", self.min_save_distance_km),
            ));
        }
        Ok(())
    }
}
