//! shm-spectra: vibration PSD estimation for structural health monitoring
//!
//! Turns triaxial accelerometer streams from one or more sensors on a
//! structure into power-spectral-density estimates for natural-frequency
//! tracking.
//!
//! ## Architecture
//!
//! - **Acquisition**: `timestamp;x;y;z` line format parsing and serialization
//! - **Processing**: grid resampling, multi-sensor alignment, Welch PSD,
//!   cross-sensor averaging
//! - **Pipeline**: single-stream and multi-stream entry points
//! - **Codes**: 5-digit display codes for numeric identifiers

pub mod acquisition;
pub mod codes;
pub mod config;
pub mod pipeline;
pub mod processing;
pub mod types;

// Re-export configuration
pub use config::SpectralConfig;

// Re-export commonly used types
pub use types::{Axis, MeanSpectrum, PowerSpectrum, Reading, Stream, TriaxialSpectrum};

// Re-export processing components
pub use processing::{
    Aggregator, ProcessingError, ResampleMode, Resampler, StreamAligner, WelchEstimator,
};

// Re-export pipeline entry points
pub use pipeline::{multi_stream_mean_psd, single_stream_psd, SpectralPipeline};
