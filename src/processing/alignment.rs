//! Multi-sensor stream alignment
//!
//! Each sensor stream is resampled with [`ResampleMode::Aligned`], then every
//! stream is cut down to the timestamps present in *all* of them. The
//! output streams therefore share one identical, ascending timestamp
//! sequence, which is what cross-sensor PSD averaging relies on.

use std::collections::BTreeSet;

use super::resample::{ResampleMode, Resampler};
use super::ProcessingError;
use crate::config::ResamplingConfig;
use crate::types::{Reading, Stream};

/// Aligned grid points are whole milliseconds, so they key exactly as `i64`.
fn grid_key(reading: &Reading) -> i64 {
    reading.timestamp as i64
}

/// Aligns several sensor streams onto a common timeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamAligner {
    resampler: Resampler,
}

impl StreamAligner {
    pub fn new(config: &ResamplingConfig) -> Result<Self, ProcessingError> {
        Ok(Self {
            resampler: Resampler::new(config)?,
        })
    }

    pub const fn with_resampler(resampler: Resampler) -> Self {
        Self { resampler }
    }

    /// Resample each raw stream and restrict all of them to their common
    /// timestamps. Returns one stream per input, in input order.
    ///
    /// If any stream resamples to nothing, every output is empty.
    pub fn align<S: AsRef<[Reading]>>(&self, streams: &[S]) -> Vec<Stream> {
        let resampled: Vec<Stream> = streams
            .iter()
            .map(|s| self.resampler.resample(s.as_ref(), ResampleMode::Aligned))
            .collect();

        let common: BTreeSet<i64> = common_timestamps(&resampled).into_iter().collect();

        let aligned: Vec<Stream> = resampled
            .into_iter()
            .map(|stream| restrict_to(stream, &common))
            .collect();

        tracing::debug!(
            sensors = streams.len(),
            common_timestamps = common.len(),
            "Aligned sensor streams"
        );
        aligned
    }
}

/// Timestamps present in every stream, ascending. Empty for no streams.
pub fn common_timestamps<S: AsRef<[Reading]>>(streams: &[S]) -> Vec<i64> {
    let mut sets = streams
        .iter()
        .map(|s| s.as_ref().iter().map(grid_key).collect::<BTreeSet<i64>>());

    let Some(first) = sets.next() else {
        return Vec::new();
    };
    sets.fold(first, |acc, set| acc.intersection(&set).copied().collect())
        .into_iter()
        .collect()
}

/// Keep only readings whose timestamp is in `keep`, preserving order.
fn restrict_to(stream: Stream, keep: &BTreeSet<i64>) -> Stream {
    stream
        .into_iter()
        .filter(|r| keep.contains(&grid_key(r)))
        .collect()
}

/// True when every stream carries exactly the same timestamp sequence.
pub fn is_aligned<S: AsRef<[Reading]>>(streams: &[S]) -> bool {
    let mut iter = streams.iter().map(AsRef::as_ref);
    let Some(first) = iter.next() else {
        return true;
    };
    iter.all(|s| {
        s.len() == first.len()
            && s.iter().zip(first).all(|(a, b)| a.timestamp == b.timestamp)
    })
}
