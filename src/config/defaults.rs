//! System-wide default constants.
//!
//! Grouped by pipeline stage. `SpectralConfig::default()` is built from these.

// ============================================================================
// Resampling
// ============================================================================

/// Grid step for both resampling variants (ms).
///
/// 20 ms = 50 Hz target rate.
pub const TIME_INCREMENT_MS: f64 = 20.0;

// ============================================================================
// Welch Estimator
// ============================================================================

/// Sample spacing assumed by the estimator (ms).
pub const SAMPLE_SPACING_MS: f64 = 20.0;

/// The input length is divided by this to get the segment length.
pub const SEGMENT_COUNT: usize = 3;

/// Segment overlap as a percentage of the segment length.
pub const OVERLAP_PERCENT: f64 = 50.0;

// ============================================================================
// Aggregation
// ============================================================================

/// Run per-sensor estimation on the rayon pool.
pub const PARALLEL_AGGREGATION: bool = true;

// ============================================================================
// Config discovery
// ============================================================================

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SHM_SPECTRA_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "spectral_config.toml";

// ============================================================================
// ID Codes
// ============================================================================

/// Display codes are fixed-width decimal below this modulus.
pub const CODE_MODULO: u64 = 100_000;

/// Multiplier for ID obfuscation. Must be coprime to `CODE_MODULO`.
pub const CODE_PRIME: u64 = 7919;

/// Width of a display code in digits.
pub const CODE_WIDTH: usize = 5;
