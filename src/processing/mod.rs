//! Signal processing module - resampling, Welch PSD and cross-sensor averaging
//!
//! Stages, in pipeline order:
//!
//! - [`resample`]: irregular stream onto a uniform grid (interpolated or aligned)
//! - [`alignment`]: restrict several aligned streams to their common timeline
//! - [`welch`]: one-sided PSD of a uniformly sampled sequence
//! - [`aggregate`]: mean PSD across an aligned sensor set
//!
//! Every stage is a pure function of its input. Soft failures (too few
//! samples, infeasible interpolation) yield empty outputs; only broken
//! preconditions surface as [`ProcessingError`].

pub mod aggregate;
pub mod alignment;
pub mod resample;
pub mod welch;

pub use aggregate::Aggregator;
pub use alignment::{common_timestamps, StreamAligner};
pub use resample::{ResampleMode, Resampler};
pub use welch::{WelchEstimator, WelchParameters};

use thiserror::Error;

/// Errors in signal processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("PSD length mismatch for stream {stream}: expected {expected} bins, found {found}")]
    DimensionMismatch {
        stream: usize,
        expected: usize,
        found: usize,
    },

    #[error("No sensor streams supplied")]
    NoStreams,

    #[error("Interpolation failed: {0}")]
    Interpolation(String),

    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
