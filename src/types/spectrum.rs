//! Power spectral density result types

use serde::{Deserialize, Serialize};

use super::Axis;

/// One-sided PSD estimate for a single numeric sequence.
///
/// `frequencies` and `power` always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectrum {
    /// Frequency bins (Hz)
    pub frequencies: Vec<f64>,
    /// Power spectral density at each bin (units²/Hz)
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Per-axis PSD sharing one frequency array.
///
/// This is the shape handed back to callers of both pipeline entry points:
/// the single-stream path reports the X-axis bins, the multi-stream path
/// reports the mean of every sensor's bins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriaxialSpectrum {
    pub frequencies: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl TriaxialSpectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Power array for one axis.
    pub fn power(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Split one axis back out as a standalone spectrum.
    pub fn axis_spectrum(&self, axis: Axis) -> PowerSpectrum {
        PowerSpectrum {
            frequencies: self.frequencies.clone(),
            power: self.power(axis).to_vec(),
        }
    }
}

/// Mean PSD across an aligned sensor set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanSpectrum {
    #[serde(flatten)]
    pub spectrum: TriaxialSpectrum,
    /// Number of sensors that contributed
    pub sensor_count: usize,
    /// Samples per sensor after alignment (0 means no common timeline)
    pub aligned_samples: usize,
}

impl MeanSpectrum {
    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TriaxialSpectrum {
        TriaxialSpectrum {
            frequencies: vec![0.0, 25.0],
            x: vec![1.0, 2.0],
            y: vec![3.0, 4.0],
            z: vec![5.0, 6.0],
        }
    }

    #[test]
    fn test_axis_spectrum_split() {
        let s = sample();
        let y = s.axis_spectrum(Axis::Y);
        assert_eq!(y.frequencies, s.frequencies);
        assert_eq!(y.power, vec![3.0, 4.0]);
        assert_eq!(y.len(), 2);
        assert_eq!(s.power(Axis::Z), &[5.0, 6.0]);
    }

    #[test]
    fn test_mean_spectrum_serializes_flat() {
        let mean = MeanSpectrum {
            spectrum: sample(),
            sensor_count: 2,
            aligned_samples: 10,
        };
        let json: serde_json::Value = serde_json::to_value(&mean).unwrap();
        assert_eq!(json["frequencies"][1], 25.0);
        assert_eq!(json["x"][0], 1.0);
        assert_eq!(json["sensor_count"], 2);
        assert_eq!(json["aligned_samples"], 10);
        assert!(json.get("spectrum").is_none());
    }

    #[test]
    fn test_empty_default() {
        assert!(TriaxialSpectrum::default().is_empty());
        assert!(MeanSpectrum::default().is_empty());
        assert!(PowerSpectrum::default().is_empty());
    }
}
