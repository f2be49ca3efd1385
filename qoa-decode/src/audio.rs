//! Decoded PCM output

use std::time::Duration;

/// Fully decoded stream
///
/// Samples are interleaved (`[L0, R0, L1, R1, ...]` for stereo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub channels: u8,
    pub sample_rate: u32,
    pub samples_per_channel: usize,
}

/// Summary of a decoded sample sequence
///
/// Used by regression checks that compare against reference decodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub min: i16,
    pub max: i16,
    /// Mean of `|sample|` over all channels
    pub average_magnitude: f64,
}

impl DecodedAudio {
    /// Iterate one channel's samples in time order
    ///
    /// Yields nothing if `channel` is out of range.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = i16> + '_ {
        let stride = (self.channels as usize).max(1);
        let skip = if channel < self.channels as usize {
            channel
        } else {
            self.samples.len()
        };
        self.samples.iter().skip(skip).step_by(stride).copied()
    }

    /// Playback length at the stream's sample rate
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples_per_channel as f64 / self.sample_rate as f64)
    }

    /// Min, max and mean magnitude; `None` for an empty sample buffer
    #[must_use]
    pub fn stats(&self) -> Option<SampleStats> {
        if self.samples.is_empty() {
            return None;
        }

        let mut min = i16::MAX;
        let mut max = i16::MIN;
        let mut sum = 0u64;
        for &sample in &self.samples {
            min = min.min(sample);
            max = max.max(sample);
            sum += sample.unsigned_abs() as u64;
        }

        Some(SampleStats {
            min,
            max,
            average_magnitude: sum as f64 / self.samples.len() as f64,
        })
    }

    /// Samples as little-endian bytes, the layout written to host memory
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
