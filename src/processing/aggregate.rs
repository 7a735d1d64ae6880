//! Cross-sensor PSD averaging
//!
//! Every stream of an aligned set gets its own Welch estimate per axis; the
//! frequency bins and the per-axis powers are then summed elementwise and
//! divided by the sensor count. Streams are estimated independently (on the
//! rayon pool when enabled) and only joined once all have finished.

use rayon::prelude::*;

use super::welch::WelchEstimator;
use super::ProcessingError;
use crate::config::{AggregationConfig, WelchConfig};
use crate::types::{axis_values, Axis, Reading, TriaxialSpectrum};

/// Mean PSD over an aligned stream set.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    estimator: WelchEstimator,
    parallel: bool,
}

impl Aggregator {
    pub fn new(welch: &WelchConfig, aggregation: &AggregationConfig) -> Result<Self, ProcessingError> {
        Ok(Self {
            estimator: WelchEstimator::new(welch)?,
            parallel: aggregation.parallel,
        })
    }

    pub const fn with_estimator(estimator: WelchEstimator, parallel: bool) -> Self {
        Self { estimator, parallel }
    }

    pub const fn estimator(&self) -> &WelchEstimator {
        &self.estimator
    }

    /// Per-axis PSD of one stream. Bins come from the X-axis estimate.
    pub fn stream_spectrum(&self, stream: &[Reading]) -> TriaxialSpectrum {
        let x = self.estimator.estimate(&axis_values(stream, Axis::X));
        let y = self.estimator.estimate(&axis_values(stream, Axis::Y));
        let z = self.estimator.estimate(&axis_values(stream, Axis::Z));
        TriaxialSpectrum {
            frequencies: x.frequencies,
            x: x.power,
            y: y.power,
            z: z.power,
        }
    }

    /// Elementwise mean of every stream's spectrum.
    ///
    /// Fails with `DimensionMismatch` if any stream's PSD arrays differ in
    /// length from the first stream's; nothing is truncated or broadcast.
    pub fn mean<S>(&self, streams: &[S]) -> Result<TriaxialSpectrum, ProcessingError>
    where
        S: AsRef<[Reading]> + Sync,
    {
        if streams.is_empty() {
            return Err(ProcessingError::NoStreams);
        }

        let spectra: Vec<TriaxialSpectrum> = if self.parallel {
            streams
                .par_iter()
                .map(|s| self.stream_spectrum(s.as_ref()))
                .collect()
        } else {
            streams
                .iter()
                .map(|s| self.stream_spectrum(s.as_ref()))
                .collect()
        };

        let mut spectra = spectra.into_iter();
        let Some(mut sum) = spectra.next() else {
            return Err(ProcessingError::NoStreams);
        };

        for (index, spectrum) in spectra.enumerate() {
            let stream = index + 1;
            add_assign(&mut sum.frequencies, &spectrum.frequencies, stream)?;
            add_assign(&mut sum.x, &spectrum.x, stream)?;
            add_assign(&mut sum.y, &spectrum.y, stream)?;
            add_assign(&mut sum.z, &spectrum.z, stream)?;
        }

        let count = streams.len() as f64;
        for values in [&mut sum.frequencies, &mut sum.x, &mut sum.y, &mut sum.z] {
            values.iter_mut().for_each(|v| *v /= count);
        }

        tracing::debug!(
            sensors = streams.len(),
            bins = sum.len(),
            parallel = self.parallel,
            "Averaged sensor spectra"
        );
        Ok(sum)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            estimator: WelchEstimator::default(),
            parallel: crate::config::defaults::PARALLEL_AGGREGATION,
        }
    }
}

/// `acc += other`, elementwise, requiring equal lengths.
fn add_assign(acc: &mut [f64], other: &[f64], stream: usize) -> Result<(), ProcessingError> {
    if acc.len() != other.len() {
        return Err(ProcessingError::DimensionMismatch {
            stream,
            expected: acc.len(),
            found: other.len(),
        });
    }
    acc.iter_mut().zip(other).for_each(|(a, b)| *a += b);
    Ok(())
}
