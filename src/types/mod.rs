//! Shared data structures for the vibration PSD pipeline
//!
//! - `Reading` / `Stream`: parsed and resampled accelerometer samples
//! - `PowerSpectrum`: Welch estimate for one axis
//! - `TriaxialSpectrum` / `MeanSpectrum`: pipeline outputs

mod reading;
mod spectrum;

pub use reading::*;
pub use spectrum::*;
