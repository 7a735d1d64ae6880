//! PSD pipeline entry points
//!
//! Both entry points take raw reading lines and never fail on bad data:
//! malformed lines are skipped and streams without enough samples yield an
//! empty spectrum, which callers report as "insufficient data".

use crate::acquisition::parse_lines;
use crate::config::SpectralConfig;
use crate::processing::{
    Aggregator, ProcessingError, ResampleMode, Resampler, StreamAligner, WelchEstimator,
};
use crate::types::{axis_values, Axis, MeanSpectrum, Reading, Stream, TriaxialSpectrum};

/// Configured resampler, aligner, estimator and aggregator.
#[derive(Debug, Clone)]
pub struct SpectralPipeline {
    resampler: Resampler,
    aligner: StreamAligner,
    estimator: WelchEstimator,
    aggregator: Aggregator,
}

impl SpectralPipeline {
    pub fn new(config: &SpectralConfig) -> Result<Self, ProcessingError> {
        let resampler = Resampler::new(&config.resampling)?;
        let estimator = WelchEstimator::new(&config.welch)?;
        Ok(Self {
            resampler,
            aligner: StreamAligner::with_resampler(resampler),
            aggregator: Aggregator::with_estimator(estimator.clone(), config.aggregation.parallel),
            estimator,
        })
    }

    pub const fn resampler(&self) -> &Resampler {
        &self.resampler
    }

    pub const fn aligner(&self) -> &StreamAligner {
        &self.aligner
    }

    /// Single-sensor PSD from raw lines.
    pub fn single_stream<S: AsRef<str>>(&self, lines: &[S]) -> TriaxialSpectrum {
        self.single_stream_readings(&parse_lines(lines))
    }

    /// Single-sensor PSD from parsed readings.
    ///
    /// Readings go through the interpolated resampler; frequency bins are
    /// those of the X-axis estimate.
    pub fn single_stream_readings(&self, readings: &[Reading]) -> TriaxialSpectrum {
        let resampled = self.resampler.resample(readings, ResampleMode::Interpolated);
        if resampled.is_empty() {
            tracing::info!(
                readings = readings.len(),
                "Not enough distinct samples for a PSD estimate"
            );
            return TriaxialSpectrum::default();
        }

        let x = self.estimator.estimate(&axis_values(&resampled, Axis::X));
        let y = self.estimator.estimate(&axis_values(&resampled, Axis::Y));
        let z = self.estimator.estimate(&axis_values(&resampled, Axis::Z));

        tracing::debug!(
            readings = readings.len(),
            resampled = resampled.len(),
            bins = x.len(),
            "Single-stream PSD"
        );

        TriaxialSpectrum {
            frequencies: x.frequencies,
            x: x.power,
            y: y.power,
            z: z.power,
        }
    }

    /// Mean PSD across sensors from one collection of raw lines per sensor.
    pub fn multi_stream<L, S>(&self, sensors: &[L]) -> Result<MeanSpectrum, ProcessingError>
    where
        L: AsRef<[S]>,
        S: AsRef<str>,
    {
        let streams: Vec<Stream> = sensors.iter().map(|lines| parse_lines(lines.as_ref())).collect();
        self.multi_stream_readings(&streams)
    }

    /// Mean PSD across sensors from parsed streams.
    ///
    /// No sensors is an error. An empty common timeline is not: the result
    /// is an empty spectrum with `aligned_samples == 0`, and no estimate is
    /// attempted.
    pub fn multi_stream_readings<S>(&self, streams: &[S]) -> Result<MeanSpectrum, ProcessingError>
    where
        S: AsRef<[Reading]>,
    {
        if streams.is_empty() {
            return Err(ProcessingError::NoStreams);
        }

        let aligned = self.aligner.align(streams);
        let aligned_samples = aligned.first().map_or(0, Vec::len);
        if aligned_samples == 0 {
            tracing::info!(
                sensors = streams.len(),
                "Sensor streams share no common timestamps"
            );
            return Ok(MeanSpectrum {
                spectrum: TriaxialSpectrum::default(),
                sensor_count: streams.len(),
                aligned_samples: 0,
            });
        }

        let spectrum = self.aggregator.mean(&aligned)?;
        Ok(MeanSpectrum {
            spectrum,
            sensor_count: streams.len(),
            aligned_samples,
        })
    }
}

impl Default for SpectralPipeline {
    fn default() -> Self {
        let resampler = Resampler::default();
        Self {
            resampler,
            aligner: StreamAligner::with_resampler(resampler),
            estimator: WelchEstimator::default(),
            aggregator: Aggregator::default(),
        }
    }
}

/// Single-stream PSD with the given configuration.
pub fn single_stream_psd<S: AsRef<str>>(
    lines: &[S],
    config: &SpectralConfig,
) -> Result<TriaxialSpectrum, ProcessingError> {
    Ok(SpectralPipeline::new(config)?.single_stream(lines))
}

/// Multi-stream mean PSD with the given configuration.
pub fn multi_stream_mean_psd<L, S>(
    sensors: &[L],
    config: &SpectralConfig,
) -> Result<MeanSpectrum, ProcessingError>
where
    L: AsRef<[S]>,
    S: AsRef<str>,
{
    SpectralPipeline::new(config)?.multi_stream(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_stream_short_circuits_on_one_timestamp() {
        let lines = ["100;1;2;3", "100;4;5;6", "", "bad"];
        let psd = SpectralPipeline::default().single_stream(&lines);
        assert!(psd.is_empty());
        assert!(psd.x.is_empty() && psd.y.is_empty() && psd.z.is_empty());
    }

    #[test]
    fn test_single_stream_axes_share_length() {
        let lines: Vec<String> = (0..60)
            .map(|i| format!("{};{};{};{}", i * 20 + (i % 3), i % 5, (i * 7) % 11, 1.0))
            .collect();
        let psd = SpectralPipeline::default().single_stream(&lines);
        assert!(!psd.is_empty());
        assert_eq!(psd.x.len(), psd.len());
        assert_eq!(psd.y.len(), psd.len());
        assert_eq!(psd.z.len(), psd.len());
        assert_eq!(psd.frequencies[0], 0.0);
    }

    #[test]
    fn test_multi_stream_requires_sensors() {
        let none: [Vec<&str>; 0] = [];
        assert_eq!(
            SpectralPipeline::default().multi_stream(&none),
            Err(ProcessingError::NoStreams)
        );
    }

    #[test]
    fn test_multi_stream_no_overlap_is_empty() {
        let a = vec!["0;1;1;1", "20;2;2;2", "40;3;3;3"];
        let b = vec!["5000;1;1;1", "5020;2;2;2"];
        let mean = SpectralPipeline::default().multi_stream(&[a, b]).unwrap();
        assert!(mean.is_empty());
        assert_eq!(mean.sensor_count, 2);
        assert_eq!(mean.aligned_samples, 0);
    }

    #[test]
    fn test_config_is_threaded_through() {
        let mut config = SpectralConfig::default();
        config.welch.segment_count = 1;
        config.welch.overlap_percent = 0.0;
        // 10 ms grid over 0..100 -> 10 points, one segment of 10 -> 6 bins
        config.resampling.time_increment_ms = 10.0;
        config.welch.sample_spacing_ms = 10.0;
        let lines = ["0;0;0;0", "100;1;1;1"];
        let psd = single_stream_psd(&lines, &config).unwrap();
        assert_eq!(psd.len(), 6);
        assert!((psd.frequencies[1] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SpectralConfig::default();
        config.resampling.time_increment_ms = -1.0;
        assert!(SpectralPipeline::new(&config).is_err());
    }
}
