//! QOA frame decoding
//!
//! A frame is self-contained: header, one predictor state per channel, then
//! `ceil(samples / 20)` slice rows with one slice per channel in each row.

use crate::{
    ByteReader, QOA_FRAME_HEADER_SIZE, QOA_FRAME_SAMPLES, QOA_LMS_STATE_SIZE, QOA_MAX_CHANNELS,
    QOA_SLICE_LEN, QoaError, QoaLms, decode_slice, frame_size,
};

/// Frame header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub channels: u8,
    /// 24-bit sample rate in Hz
    pub sample_rate: u32,
    /// Samples per channel in this frame (1-5120)
    pub samples: u16,
    /// Total frame size in bytes, header included
    pub size: u16,
}

impl FrameHeader {
    pub const SIZE: usize = QOA_FRAME_HEADER_SIZE;

    /// Parse and validate a frame header from the start of `bytes`
    ///
    /// Checks the channel count, sample rate, sample count and that the
    /// declared size matches the frame layout. It does not check that the
    /// frame body is present; see [`FrameHeader::check_available`].
    ///
    /// # Errors
    /// `TruncatedHeader`, `InvalidChannelCount`, `InvalidSampleRate` or
    /// `InvalidFrameSize`.
    pub fn parse(bytes: &[u8]) -> Result<Self, QoaError> {
        let truncated = || QoaError::TruncatedHeader {
            offset: 0,
            needed: Self::SIZE,
            available: bytes.len(),
        };
        let mut reader = ByteReader::new(bytes);

        let channels = reader.read_u8().ok_or_else(truncated)?;
        let sample_rate = reader.read_u24().ok_or_else(truncated)?;
        let samples = reader.read_u16().ok_or_else(truncated)?;
        let size = reader.read_u16().ok_or_else(truncated)?;

        let header = Self {
            channels,
            sample_rate,
            samples,
            size,
        };
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<(), QoaError> {
        if self.channels == 0 || self.channels as usize > QOA_MAX_CHANNELS {
            return Err(QoaError::InvalidChannelCount(self.channels));
        }
        if self.sample_rate == 0 {
            return Err(QoaError::InvalidSampleRate);
        }

        let samples = self.samples as usize;
        let expected = frame_size(self.channels as usize, samples);
        if samples == 0 || samples > QOA_FRAME_SAMPLES || self.size as usize != expected {
            return Err(QoaError::InvalidFrameSize {
                samples,
                declared: self.size as usize,
                expected,
            });
        }
        Ok(())
    }

    /// Fail with `TruncatedFrame` unless `available` bytes cover the frame
    pub fn check_available(&self, available: usize) -> Result<(), QoaError> {
        if available < self.size as usize {
            return Err(QoaError::TruncatedFrame {
                offset: 0,
                needed: self.size as usize,
                available,
            });
        }
        Ok(())
    }

    /// Interleaved samples this frame produces (`channels * samples`)
    #[inline]
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.channels as usize * self.samples as usize
    }

    /// Slice rows in this frame (`ceil(samples / 20)`)
    #[inline]
    #[must_use]
    pub fn slices_per_channel(&self) -> usize {
        (self.samples as usize).div_ceil(QOA_SLICE_LEN)
    }
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub header: FrameHeader,
    /// Interleaved samples, `header.channels * header.samples` long
    pub samples: Vec<i16>,
}

/// Decode one frame into a freshly allocated buffer
///
/// # Errors
/// Any header error, or `TruncatedFrame` if `frame_bytes` is shorter than the
/// declared frame size.
pub fn decode_frame(frame_bytes: &[u8]) -> Result<DecodedFrame, QoaError> {
    let header = FrameHeader::parse(frame_bytes)?;
    let mut samples = vec![0i16; header.sample_count()];
    decode_frame_into(frame_bytes, &mut samples)?;
    Ok(DecodedFrame { header, samples })
}

/// Decode one frame into `out`, returning its header
///
/// Writes exactly `channels * samples` interleaved samples to the start of
/// `out`; the rest of `out` is untouched. Bytes past the declared frame size
/// are ignored.
///
/// # Errors
/// Any header error, `TruncatedFrame`, or `BufferTooSmall` if `out` cannot
/// hold the frame.
pub fn decode_frame_into(frame_bytes: &[u8], out: &mut [i16]) -> Result<FrameHeader, QoaError> {
    let header = FrameHeader::parse(frame_bytes)?;
    header.check_available(frame_bytes.len())?;

    let needed = header.sample_count();
    if out.len() < needed {
        return Err(QoaError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    let channels = header.channels as usize;
    let samples = header.samples as usize;
    let truncated = |reader: &ByteReader<'_>| QoaError::TruncatedFrame {
        offset: reader.position(),
        needed: header.size as usize,
        available: frame_bytes.len(),
    };

    let mut reader = ByteReader::new(&frame_bytes[..header.size as usize]);
    reader.take(FrameHeader::SIZE).ok_or_else(|| truncated(&reader))?;

    let mut lms_states = [QoaLms::default(); QOA_MAX_CHANNELS];
    for lms in lms_states.iter_mut().take(channels) {
        let state = reader
            .take_array::<QOA_LMS_STATE_SIZE>()
            .ok_or_else(|| truncated(&reader))?;
        *lms = QoaLms::from_be_bytes(state);
    }

    for slice_idx in 0..header.slices_per_channel() {
        let first_sample = slice_idx * QOA_SLICE_LEN;
        let slice_len = (samples - first_sample).min(QOA_SLICE_LEN);

        for (ch, lms) in lms_states.iter_mut().take(channels).enumerate() {
            let slice = reader.read_u64().ok_or_else(|| truncated(&reader))?;
            let decoded = decode_slice(slice, lms);

            for (i, &sample) in decoded[..slice_len].iter().enumerate() {
                out[(first_sample + i) * channels + ch] = sample;
            }
        }
    }

    Ok(header)
}
