//! Processing Pipeline Module
//!
//! ```text
//! single sensor:  lines -> parse -> resample (interpolated) -> Welch per axis
//! multi sensor:   lines -> parse -> resample (aligned) -> intersect timelines
//!                       -> Welch per sensor per axis -> mean across sensors
//! ```
//!
//! These are the two entry points an external API layer calls.

mod spectral_pipeline;

pub use spectral_pipeline::*;
