//! Spectral Configuration Module
//!
//! Pipeline parameters (grid step, Welch segmentation, aggregation mode)
//! loaded from TOML instead of hard-coded literals.
//!
//! ## Loading Order
//!
//! 1. `SHM_SPECTRA_CONFIG` environment variable (path to TOML file)
//! 2. `spectral_config.toml` in the current working directory
//! 3. Built-in defaults (20 ms grid, 3 segments, 50% overlap)
//!
//! ## Usage
//!
//! There is no global instance. Load once and pass a reference down:
//!
//! ```ignore
//! let config = SpectralConfig::load();
//! let psd = pipeline::single_stream_psd(&lines, &config);
//! ```

mod spectral_config;
pub mod defaults;
pub mod validation;

pub use spectral_config::*;
