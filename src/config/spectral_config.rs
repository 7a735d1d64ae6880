//! Spectral Configuration - pipeline parameters as operator-tunable TOML values
//!
//! Every constant the resampler and estimator depend on is a field here.
//! Each struct implements `Default` with the values in `defaults`, so a
//! missing file behaves exactly like the stock 50 Hz pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the PSD pipeline.
///
/// Load with `SpectralConfig::load()` which searches:
/// 1. `$SHM_SPECTRA_CONFIG` env var
/// 2. `./spectral_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Grid parameters shared by both resampling variants
    #[serde(default)]
    pub resampling: ResamplingConfig,

    /// Welch segmentation parameters
    #[serde(default)]
    pub welch: WelchConfig,

    /// Cross-sensor aggregation
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

impl SpectralConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded spectral config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load spectral config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./spectral_config.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded spectral config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No spectral_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings and otherwise ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for unknown in super::validation::validate_unknown_keys(contents) {
            warn!(
                key = %unknown.field,
                suggestion = unknown.suggestion.as_deref().unwrap_or("-"),
                "{unknown}"
            );
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Reject parameter combinations the pipeline cannot run with.
    ///
    /// Every violation is collected so the operator sees them all at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = super::validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Resampling
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResamplingConfig {
    /// Grid step (ms)
    #[serde(default = "default_time_increment")]
    pub time_increment_ms: f64,
}

fn default_time_increment() -> f64 {
    defaults::TIME_INCREMENT_MS
}

impl Default for ResamplingConfig {
    fn default() -> Self {
        Self {
            time_increment_ms: default_time_increment(),
        }
    }
}

// ============================================================================
// Welch
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchConfig {
    /// Spacing between consecutive samples (ms); fs = 1000 / spacing
    #[serde(default = "default_sample_spacing")]
    pub sample_spacing_ms: f64,

    /// Segment length is `round(n / segment_count)`
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,

    /// Overlap between consecutive segments, in percent of segment length
    #[serde(default = "default_overlap_percent")]
    pub overlap_percent: f64,
}

fn default_sample_spacing() -> f64 {
    defaults::SAMPLE_SPACING_MS
}
fn default_segment_count() -> usize {
    defaults::SEGMENT_COUNT
}
fn default_overlap_percent() -> f64 {
    defaults::OVERLAP_PERCENT
}

impl WelchConfig {
    /// Sampling frequency in Hz.
    pub fn sampling_frequency(&self) -> f64 {
        1000.0 / self.sample_spacing_ms
    }
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            sample_spacing_ms: default_sample_spacing(),
            segment_count: default_segment_count(),
            overlap_percent: default_overlap_percent(),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Estimate each sensor's PSD on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    defaults::PARALLEL_AGGREGATION
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}
