//! Resampling of irregular reading streams onto a uniform time grid
//!
//! Two variants with different contracts:
//!
//! - [`ResampleMode::Interpolated`] (single-sensor path): keeps the last
//!   reading of each duplicated timestamp, builds the grid
//!   `first, first + inc, ...` strictly below the last timestamp, and
//!   linearly interpolates every axis onto it.
//! - [`ResampleMode::Aligned`] (multi-sensor path): keeps the first reading
//!   of each duplicated timestamp, snaps the grid ends to increment
//!   boundaries, and pairs grid points with the deduplicated readings by
//!   position. Axis values are not interpolated, and the output is as long
//!   as the shorter of the grid and the deduplicated stream.
//!
//! Both return an empty stream when fewer than two distinct timestamps
//! remain.

use super::ProcessingError;
use crate::config::ResamplingConfig;
use crate::types::{Reading, Stream};
use serde::{Deserialize, Serialize};

/// Resampling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMode {
    /// Linear interpolation onto a grid starting at the first sample
    Interpolated,
    /// Boundary-snapped grid with positional value pairing
    Aligned,
}

impl std::fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpolated => write!(f, "interpolated"),
            Self::Aligned => write!(f, "aligned"),
        }
    }
}

impl std::str::FromStr for ResampleMode {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interpolated" => Ok(Self::Interpolated),
            "aligned" => Ok(Self::Aligned),
            other => Err(ProcessingError::InvalidParameter(format!(
                "unknown resample mode '{other}' (expected 'interpolated' or 'aligned')"
            ))),
        }
    }
}

/// Which reading survives when several share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DuplicatePolicy {
    KeepFirst,
    KeepLast,
}

/// Grid resampler for a single sensor stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resampler {
    time_increment: f64,
}

impl Resampler {
    pub fn new(config: &ResamplingConfig) -> Result<Self, ProcessingError> {
        Self::with_increment(config.time_increment_ms)
    }

    /// Build a resampler with an explicit grid step (ms).
    ///
    /// The step must be a whole, positive number of milliseconds: aligned
    /// grid points are truncated to integers and keyed as `i64`.
    pub fn with_increment(time_increment: f64) -> Result<Self, ProcessingError> {
        if !time_increment.is_finite() || time_increment <= 0.0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "time increment must be positive, got {time_increment}"
            )));
        }
        if time_increment.fract() != 0.0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "time increment must be a whole number of ms, got {time_increment}"
            )));
        }
        Ok(Self { time_increment })
    }

    pub const fn time_increment(&self) -> f64 {
        self.time_increment
    }

    /// Resample `stream` with the given strategy.
    pub fn resample(&self, stream: &[Reading], mode: ResampleMode) -> Stream {
        match mode {
            ResampleMode::Interpolated => self.interpolated(stream),
            ResampleMode::Aligned => self.aligned(stream),
        }
    }

    /// Interpolated variant. See module docs.
    pub fn interpolated(&self, stream: &[Reading]) -> Stream {
        let samples = sorted_unique(stream, DuplicatePolicy::KeepLast);
        if samples.len() < 2 {
            tracing::debug!(
                distinct = samples.len(),
                "Too few distinct timestamps to interpolate"
            );
            return Vec::new();
        }

        let first = samples[0].timestamp;
        let last = samples[samples.len() - 1].timestamp;
        let grid = self.open_grid(first, last);

        match interpolate(&samples, &grid) {
            Ok(resampled) => {
                tracing::debug!(
                    input = stream.len(),
                    distinct = samples.len(),
                    output = resampled.len(),
                    "Interpolated stream onto grid"
                );
                resampled
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    first_timestamp = first,
                    last_timestamp = last,
                    distinct = samples.len(),
                    "Interpolation infeasible, returning empty stream"
                );
                Vec::new()
            }
        }
    }

    /// Aligned variant. See module docs.
    pub fn aligned(&self, stream: &[Reading]) -> Stream {
        let samples = sorted_unique(stream, DuplicatePolicy::KeepFirst);
        if samples.len() < 2 {
            tracing::debug!(
                distinct = samples.len(),
                "Too few distinct timestamps to align"
            );
            return Vec::new();
        }
        if samples.iter().any(|s| !s.timestamp.is_finite()) {
            tracing::warn!("Non-finite timestamp in stream, returning empty stream");
            return Vec::new();
        }

        let (start, end) = self.aligned_bounds(samples[0].timestamp, samples[samples.len() - 1].timestamp);
        let inc = self.time_increment;

        // Positional pairing: grid point k takes the k-th distinct reading.
        let resampled: Stream = (0u32..)
            .map(|k| (start + f64::from(k) * inc).trunc())
            .take_while(|&t| t <= end)
            .zip(&samples)
            .map(|(t, s)| Reading::new(t, s.x, s.y, s.z))
            .collect();

        tracing::debug!(
            input = stream.len(),
            distinct = samples.len(),
            grid_start = start,
            grid_end = end,
            output = resampled.len(),
            "Aligned stream onto grid"
        );
        resampled
    }

    /// Grid ends used by the aligned variant.
    ///
    /// The start rounds the truncated first timestamp to the nearest
    /// boundary (ties to even); the end is the boundary after the floor
    /// boundary of the truncated last timestamp.
    pub fn aligned_bounds(&self, first: f64, last: f64) -> (f64, f64) {
        let inc = self.time_increment;
        let start = (first.trunc() / inc).round_ties_even() * inc;
        let end = ((last.trunc() / inc).floor() + 1.0) * inc;
        (start, end)
    }

    /// `first, first + inc, ...` strictly below `last`.
    fn open_grid(&self, first: f64, last: f64) -> Vec<f64> {
        let inc = self.time_increment;
        (0u32..)
            .map(|k| first + f64::from(k) * inc)
            .take_while(|&t| t < last)
            .collect()
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self {
            time_increment: crate::config::defaults::TIME_INCREMENT_MS,
        }
    }
}

/// Stable sort by timestamp, then one forward pass collapsing equal timestamps.
fn sorted_unique(stream: &[Reading], policy: DuplicatePolicy) -> Vec<Reading> {
    let mut sorted = stream.to_vec();
    sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let mut unique: Vec<Reading> = Vec::with_capacity(sorted.len());
    for reading in sorted {
        match unique.last_mut() {
            Some(prev) if prev.timestamp == reading.timestamp => {
                if policy == DuplicatePolicy::KeepLast {
                    *prev = reading;
                }
            }
            _ => unique.push(reading),
        }
    }
    unique
}

/// Piecewise-linear interpolation of every axis at each grid point.
///
/// `samples` must be sorted with strictly increasing timestamps. Grid points
/// outside the sample domain are an error, as are non-finite timestamps.
fn interpolate(samples: &[Reading], grid: &[f64]) -> Result<Stream, ProcessingError> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(ProcessingError::Interpolation("empty sample domain".to_string()));
    };
    if !first.timestamp.is_finite() || !last.timestamp.is_finite() {
        return Err(ProcessingError::Interpolation(
            "non-finite timestamp in sample domain".to_string(),
        ));
    }
    if samples.len() < 2 {
        return Err(ProcessingError::Interpolation(
            "need at least two points to interpolate".to_string(),
        ));
    }

    grid.iter()
        .map(|&t| {
            if !(first.timestamp..=last.timestamp).contains(&t) {
                return Err(ProcessingError::Interpolation(format!(
                    "grid point {t} outside sample domain [{}, {}]",
                    first.timestamp, last.timestamp
                )));
            }
            // Index of the first sample strictly after t, kept inside 1..len
            let hi = samples
                .partition_point(|s| s.timestamp <= t)
                .clamp(1, samples.len() - 1);
            let a = &samples[hi - 1];
            let b = &samples[hi];
            let w = (t - a.timestamp) / (b.timestamp - a.timestamp);
            let lerp = |va: f64, vb: f64| va + w * (vb - va);
            Ok(Reading::new(t, lerp(a.x, b.x), lerp(a.y, b.y), lerp(a.z, b.z)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(t: f64, x: f64) -> Reading {
        Reading::new(t, x, 2.0 * x, -x)
    }

    fn ts(stream: &[Reading]) -> Vec<f64> {
        stream.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("aligned".parse::<ResampleMode>().unwrap(), ResampleMode::Aligned);
        assert_eq!(" Interpolated ".parse::<ResampleMode>().unwrap(), ResampleMode::Interpolated);
        assert!("cubic".parse::<ResampleMode>().is_err());
        assert_eq!(ResampleMode::Aligned.to_string(), "aligned");
    }

    #[test]
    fn test_invalid_increment_rejected() {
        assert!(Resampler::with_increment(0.0).is_err());
        assert!(Resampler::with_increment(-20.0).is_err());
        assert!(Resampler::with_increment(f64::INFINITY).is_err());
    }

    #[test]
    fn test_fractional_increment_rejected() {
        // a 0.5 ms step would truncate to duplicate grid points 0, 0, 1, 1
        assert!(matches!(
            Resampler::with_increment(0.5),
            Err(ProcessingError::InvalidParameter(_))
        ));
        assert!(Resampler::with_increment(20.5).is_err());
        assert!(Resampler::with_increment(1.0).is_ok());

        let config = ResamplingConfig { time_increment_ms: 0.5 };
        assert!(Resampler::new(&config).is_err());
    }

    #[test]
    fn test_sorted_unique_policies() {
        let stream = vec![r(40.0, 1.0), r(20.0, 2.0), r(40.0, 3.0), r(20.0, 4.0), r(0.0, 5.0)];

        let first = sorted_unique(&stream, DuplicatePolicy::KeepFirst);
        assert_eq!(ts(&first), vec![0.0, 20.0, 40.0]);
        assert_eq!(first.iter().map(|r| r.x).collect::<Vec<_>>(), vec![5.0, 2.0, 1.0]);

        let last = sorted_unique(&stream, DuplicatePolicy::KeepLast);
        assert_eq!(ts(&last), vec![0.0, 20.0, 40.0]);
        assert_eq!(last.iter().map(|r| r.x).collect::<Vec<_>>(), vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_interpolated_linear_values() {
        let resampler = Resampler::default();
        // irregular: 0, 10, 50 -> grid 0, 20, 40
        let stream = vec![r(50.0, 5.0), r(0.0, 0.0), r(10.0, 1.0)];
        let out = resampler.interpolated(&stream);
        assert_eq!(ts(&out), vec![0.0, 20.0, 40.0]);
        assert!((out[0].x - 0.0).abs() < 1e-12);
        assert!((out[1].x - 2.0).abs() < 1e-12);
        assert!((out[2].x - 4.0).abs() < 1e-12);
        assert!((out[1].y - 4.0).abs() < 1e-12);
        assert!((out[2].z + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolated_excludes_last_timestamp() {
        let out = Resampler::default().interpolated(&[r(100.0, 0.0), r(160.0, 6.0)]);
        assert_eq!(ts(&out), vec![100.0, 120.0, 140.0]);
    }

    #[test]
    fn test_interpolated_fractional_start() {
        let out = Resampler::default().interpolated(&[r(0.5, 0.0), r(41.0, 1.0)]);
        assert_eq!(ts(&out), vec![0.5, 20.5, 40.5]);
    }

    #[test]
    fn test_interpolated_duplicates_keep_last() {
        let stream = vec![r(0.0, 100.0), r(0.0, 0.0), r(40.0, 4.0)];
        let out = Resampler::default().interpolated(&stream);
        assert_eq!(ts(&out), vec![0.0, 20.0]);
        assert!((out[0].x - 0.0).abs() < 1e-12);
        assert!((out[1].x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_distinct_timestamp_is_empty() {
        let stream = vec![r(100.0, 1.0), r(100.0, 2.0), r(100.0, 3.0)];
        let resampler = Resampler::default();
        assert!(resampler.interpolated(&stream).is_empty());
        assert!(resampler.aligned(&stream).is_empty());
        assert!(resampler.resample(&[], ResampleMode::Interpolated).is_empty());
        assert!(resampler.resample(&[], ResampleMode::Aligned).is_empty());
    }

    #[test]
    fn test_interpolated_non_finite_degrades_to_empty() {
        let stream = vec![r(0.0, 1.0), r(20.0, 2.0), r(f64::NAN, 3.0)];
        assert!(Resampler::default().interpolated(&stream).is_empty());
    }

    #[test]
    fn test_interpolate_rejects_out_of_domain() {
        let samples = vec![r(0.0, 0.0), r(20.0, 1.0)];
        assert!(interpolate(&samples, &[30.0]).is_err());
        assert!(interpolate(&samples[..1], &[0.0]).is_err());
        assert!(interpolate(&samples, &[20.0]).is_ok());
    }

    #[test]
    fn test_aligned_bounds() {
        let resampler = Resampler::default();
        assert_eq!(resampler.aligned_bounds(1262.0, 1452.0), (1260.0, 1460.0));
        // rounds to nearest boundary, including upward
        assert_eq!(resampler.aligned_bounds(1271.0, 1300.0), (1280.0, 1320.0));
        // exact tie rounds to the even multiple
        assert_eq!(resampler.aligned_bounds(1250.0, 1300.0), (1240.0, 1320.0));
        assert_eq!(resampler.aligned_bounds(1270.0, 1300.0), (1280.0, 1320.0));
        // fractional timestamps are truncated first
        assert_eq!(resampler.aligned_bounds(1269.9, 1319.9), (1260.0, 1320.0));
    }

    #[test]
    fn test_aligned_positional_pairing() {
        // grid 0..=60 has 4 points, 3 distinct readings -> 3 outputs
        let stream = vec![r(3.0, 1.0), r(33.0, 2.0), r(44.0, 3.0), r(33.0, 9.0)];
        let out = Resampler::default().aligned(&stream);
        assert_eq!(ts(&out), vec![0.0, 20.0, 40.0]);
        assert_eq!(out.iter().map(|r| r.x).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_aligned_truncates_to_grid_length() {
        // grid 0..=40 has 3 points, 5 distinct readings -> last two dropped
        let stream: Vec<Reading> = [1.0, 5.0, 9.0, 13.0, 27.0]
            .iter()
            .enumerate()
            .map(|(i, &t)| r(t, i as f64))
            .collect();
        let out = Resampler::default().aligned(&stream);
        assert_eq!(ts(&out), vec![0.0, 20.0, 40.0]);
        assert_eq!(out.iter().map(|r| r.x).collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_custom_increment() {
        let resampler = Resampler::with_increment(10.0).unwrap();
        let out = resampler.interpolated(&[r(0.0, 0.0), r(30.0, 3.0)]);
        assert_eq!(ts(&out), vec![0.0, 10.0, 20.0]);
        assert_eq!(resampler.aligned_bounds(14.0, 26.0), (10.0, 30.0));
    }
}
