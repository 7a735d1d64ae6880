//! Welch PSD estimation using rustfft
//!
//! Averaged-periodogram estimate of a uniformly sampled sequence.
//!
//! # Method
//!
//! For a sequence of `n` samples at `fs` Hz:
//!
//! - segment length `L = round(n / segment_count)` (ties to even), at least 1
//! - overlap `round(L * overlap_percent / 100)`, transform size `L`
//! - periodic Hann window, per-segment mean removal
//! - density scaling `1 / (fs * Σw²)`, one-sided (non-DC bins doubled,
//!   except Nyquist for even `L`)
//! - mean over the `(n - overlap) / (L - overlap)` full segments
//!
//! The result has `L / 2 + 1` bins at `k * fs / L`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

use super::ProcessingError;
use crate::config::WelchConfig;
use crate::types::PowerSpectrum;

/// Segmentation derived from an input length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WelchParameters {
    pub segment_length: usize,
    pub overlap: usize,
    pub nfft: usize,
}

impl WelchParameters {
    /// Hop between segment starts.
    pub const fn step(&self) -> usize {
        self.segment_length - self.overlap
    }

    /// Number of full segments that fit in `n` samples.
    pub const fn segments(&self, n: usize) -> usize {
        if n < self.segment_length {
            return 0;
        }
        (n - self.overlap) / self.step()
    }

    /// Number of one-sided frequency bins.
    pub const fn bins(&self) -> usize {
        self.nfft / 2 + 1
    }
}

/// Welch estimator with fixed sampling rate and segmentation policy.
#[derive(Debug, Clone, PartialEq)]
pub struct WelchEstimator {
    sampling_frequency: f64,
    segment_count: usize,
    overlap_percent: f64,
}

impl WelchEstimator {
    pub fn new(config: &WelchConfig) -> Result<Self, ProcessingError> {
        let fs = config.sampling_frequency();
        if !fs.is_finite() || fs <= 0.0 {
            return Err(ProcessingError::InvalidSamplingRate(fs));
        }
        if config.segment_count == 0 {
            return Err(ProcessingError::InvalidParameter(
                "segment_count must be >= 1".to_string(),
            ));
        }
        if !(0.0..100.0).contains(&config.overlap_percent) {
            return Err(ProcessingError::InvalidParameter(format!(
                "overlap_percent must be in [0, 100), got {}",
                config.overlap_percent
            )));
        }
        Ok(Self {
            sampling_frequency: fs,
            segment_count: config.segment_count,
            overlap_percent: config.overlap_percent,
        })
    }

    pub const fn sampling_frequency(&self) -> f64 {
        self.sampling_frequency
    }

    /// Segmentation for an input of `n` samples.
    ///
    /// `n` of 1 or 2 gives a single-sample segment rather than zero.
    pub fn parameters_for(&self, n: usize) -> WelchParameters {
        let raw = (n as f64 / self.segment_count as f64).round_ties_even() as usize;
        let segment_length = raw.max(1).min(n.max(1));
        let overlap = ((segment_length as f64 * self.overlap_percent / 100.0).round_ties_even()
            as usize)
            .min(segment_length - 1);
        WelchParameters {
            segment_length,
            overlap,
            nfft: segment_length,
        }
    }

    /// One-sided PSD of `values`. Empty input gives an empty spectrum.
    pub fn estimate(&self, values: &[f64]) -> PowerSpectrum {
        if values.is_empty() {
            return PowerSpectrum::default();
        }

        let params = self.parameters_for(values.len());
        let len = params.segment_length;
        let step = params.step();
        let n_segments = params.segments(values.len());
        let bins = params.bins();

        let window = hann_periodic(len);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (self.sampling_frequency * window_power);

        let fft = FftPlanner::<f64>::new().plan_fft_forward(params.nfft);
        let mut buffer = vec![Complex::new(0.0, 0.0); params.nfft];
        let mut accumulated = vec![0.0_f64; bins];

        for segment in values.windows(len).step_by(step).take(n_segments) {
            let mean = segment.iter().sum::<f64>() / len as f64;
            for ((slot, &v), &w) in buffer.iter_mut().zip(segment).zip(&window) {
                *slot = Complex::new((v - mean) * w, 0.0);
            }
            fft.process(&mut buffer);
            for (acc, c) in accumulated.iter_mut().zip(&buffer) {
                *acc += c.norm_sqr();
            }
        }

        let nyquist_bin = (params.nfft % 2 == 0).then_some(bins - 1);
        let power: Vec<f64> = accumulated
            .into_iter()
            .enumerate()
            .map(|(k, acc)| {
                let one_sided = if k == 0 || Some(k) == nyquist_bin { 1.0 } else { 2.0 };
                acc * scale * one_sided / n_segments as f64
            })
            .collect();

        let resolution = self.sampling_frequency / params.nfft as f64;
        let frequencies: Vec<f64> = (0..bins).map(|k| k as f64 * resolution).collect();

        tracing::trace!(
            samples = values.len(),
            segment_length = len,
            overlap = params.overlap,
            segments = n_segments,
            bins,
            "Welch estimate"
        );

        PowerSpectrum { frequencies, power }
    }
}

impl Default for WelchEstimator {
    fn default() -> Self {
        let config = WelchConfig::default();
        Self {
            sampling_frequency: config.sampling_frequency(),
            segment_count: config.segment_count,
            overlap_percent: config.overlap_percent,
        }
    }
}

/// Periodic (DFT-even) Hann window. A single-point window is `[1.0]`.
pub fn hann_periodic(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..len)
            .map(|k| 0.5 - 0.5 * (2.0 * PI * k as f64 / len as f64).cos())
            .collect(),
    }
}
