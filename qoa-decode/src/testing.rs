//! Stream builder for tests
//!
//! Serializes predictor states and raw slice words into the QOA byte layout.
//! No quantization happens here: slices are written exactly as given, which
//! is enough to craft valid, corrupt and edge-case streams.

use crate::{QOA_FRAME_SAMPLES, QOA_MAGIC, QoaLms, frame_size};

/// Contents of one frame
#[derive(Debug, Clone)]
pub struct FrameSpec {
    pub channels: u8,
    pub sample_rate: u32,
    pub samples: u16,
    /// One predictor state per channel
    pub lms: Vec<QoaLms>,
    /// `slices[channel][slice_index]`
    pub slices: Vec<Vec<u64>>,
}

impl FrameSpec {
    /// Frame with zeroed predictors and all-zero slice words
    #[must_use]
    pub fn zeroed(channels: u8, sample_rate: u32, samples: u16) -> Self {
        let slice_count = (samples as usize).div_ceil(crate::QOA_SLICE_LEN);
        Self {
            channels,
            sample_rate,
            samples,
            lms: vec![QoaLms::default(); channels as usize],
            slices: vec![vec![0; slice_count]; channels as usize],
        }
    }

    /// Frame whose slice words come from `next_slice`, called in file order
    pub fn with_slices(
        channels: u8,
        sample_rate: u32,
        samples: u16,
        mut next_slice: impl FnMut() -> u64,
    ) -> Self {
        let mut spec = Self::zeroed(channels, sample_rate, samples);
        for slice_idx in 0..spec.slices[0].len() {
            for ch in 0..channels as usize {
                spec.slices[ch][slice_idx] = next_slice();
            }
        }
        spec
    }

    /// Byte size this frame serializes to
    #[must_use]
    pub fn byte_size(&self) -> usize {
        frame_size(self.channels as usize, self.samples as usize)
    }
}

/// Serialize one frame, deriving the frame size field from its layout
#[must_use]
pub fn write_frame(spec: &FrameSpec) -> Vec<u8> {
    write_frame_with_size(spec, spec.byte_size() as u16)
}

/// Serialize one frame with an explicit (possibly wrong) frame size field
#[must_use]
pub fn write_frame_with_size(spec: &FrameSpec, size: u16) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(spec.byte_size());
    bytes.push(spec.channels);
    bytes.extend_from_slice(&spec.sample_rate.to_be_bytes()[1..]);
    bytes.extend_from_slice(&spec.samples.to_be_bytes());
    bytes.extend_from_slice(&size.to_be_bytes());

    for lms in &spec.lms {
        for value in lms.history.iter().chain(lms.weights.iter()) {
            bytes.extend_from_slice(&(*value as i16).to_be_bytes());
        }
    }

    let slice_count = spec.slices.first().map_or(0, Vec::len);
    for slice_idx in 0..slice_count {
        for channel in &spec.slices {
            bytes.extend_from_slice(&channel[slice_idx].to_be_bytes());
        }
    }
    bytes
}

/// Serialize a stream header followed by the given frames
#[must_use]
pub fn write_stream(samples_per_channel: u32, frames: &[FrameSpec]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&QOA_MAGIC.to_be_bytes());
    bytes.extend_from_slice(&samples_per_channel.to_be_bytes());
    for frame in frames {
        bytes.extend_from_slice(&write_frame(frame));
    }
    bytes
}

/// Split `samples_per_channel` into full 5120-sample frames plus a shorter
/// tail, filling slices from `next_slice`
pub fn frames_for(
    channels: u8,
    sample_rate: u32,
    samples_per_channel: usize,
    mut next_slice: impl FnMut() -> u64,
) -> Vec<FrameSpec> {
    let mut frames = Vec::new();
    let mut remaining = samples_per_channel;
    while remaining > 0 {
        let samples = remaining.min(QOA_FRAME_SAMPLES);
        frames.push(FrameSpec::with_slices(
            channels,
            sample_rate,
            samples as u16,
            &mut next_slice,
        ));
        remaining -= samples;
    }
    frames
}
