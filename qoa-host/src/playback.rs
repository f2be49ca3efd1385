//! Conversion of decoded PCM into planar float buffers for playback engines

use qoa_decode::DecodedAudio;

use crate::HostError;

/// De-interleaved `f32` audio in [-1.0, 1.0]
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarAudio {
    pub sample_rate: u32,
    /// One buffer per channel, each `samples_per_channel` long
    pub channels: Vec<Vec<f32>>,
}

impl PlanarAudio {
    /// Split interleaved i16 samples into per-channel `sample / 32768` buffers
    ///
    /// # Errors
    /// `InvalidAudio` for zero channels, sample rate or length, or a sample
    /// buffer shorter than `channels * samples_per_channel`.
    pub fn from_decoded(decoded: &DecodedAudio) -> Result<Self, HostError> {
        if decoded.channels == 0 {
            return Err(HostError::InvalidAudio("channel count must be positive"));
        }
        if decoded.sample_rate == 0 {
            return Err(HostError::InvalidAudio("sample rate must be positive"));
        }
        if decoded.samples_per_channel == 0 {
            return Err(HostError::InvalidAudio("samples per channel must be positive"));
        }

        let channel_count = decoded.channels as usize;
        let frames = decoded.samples_per_channel;
        if decoded.samples.len() < channel_count * frames {
            return Err(HostError::InvalidAudio("sample buffer shorter than declared length"));
        }

        let mut channels: Vec<Vec<f32>> =
            (0..channel_count).map(|_| Vec::with_capacity(frames)).collect();
        for frame in decoded.samples.chunks_exact(channel_count).take(frames) {
            for (buffer, &sample) in channels.iter_mut().zip(frame) {
                buffer.push((sample as f32 / 32768.0).clamp(-1.0, 1.0));
            }
        }

        Ok(Self {
            sample_rate: decoded.sample_rate,
            channels,
        })
    }

    #[must_use]
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}
