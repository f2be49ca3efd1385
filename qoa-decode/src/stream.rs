//! QOA stream decoding
//!
//! Walks the frames after the stream header, checks that they agree with each
//! other and with the declared sample count, and concatenates their output.

use crate::{
    ByteReader, DecodedAudio, FrameHeader, QOA_FRAME_SAMPLES, QOA_MAGIC, QOA_STREAM_HEADER_SIZE,
    QoaError, decode_frame_into,
};

/// Stream header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub samples_per_channel: u32,
}

impl StreamHeader {
    pub const SIZE: usize = QOA_STREAM_HEADER_SIZE;

    /// Parse the magic and declared sample count
    ///
    /// # Errors
    /// `TruncatedHeader` for fewer than 8 bytes, `MagicMismatch`, or
    /// `EmptyStream` when zero samples are declared.
    pub fn parse(bytes: &[u8]) -> Result<Self, QoaError> {
        let truncated = || QoaError::TruncatedHeader {
            offset: 0,
            needed: Self::SIZE,
            available: bytes.len(),
        };
        let mut reader = ByteReader::new(bytes);
        let magic = reader.read_u32().ok_or_else(truncated)?;
        let samples_per_channel = reader.read_u32().ok_or_else(truncated)?;

        if magic != QOA_MAGIC {
            return Err(QoaError::MagicMismatch { found: magic });
        }
        if samples_per_channel == 0 {
            return Err(QoaError::EmptyStream);
        }

        Ok(Self {
            samples_per_channel,
        })
    }
}

/// Stream-wide format, known after reading the first frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub channels: u8,
    pub sample_rate: u32,
    pub samples_per_channel: usize,
}

impl StreamInfo {
    /// Interleaved sample count of the whole stream
    #[inline]
    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.channels as usize * self.samples_per_channel
    }

    /// Exact output size in bytes (`channels * samples * 2`)
    #[inline]
    #[must_use]
    pub fn output_bytes(&self) -> usize {
        self.total_samples() * size_of::<i16>()
    }
}

/// Read the stream header and first frame header without decoding
///
/// # Errors
/// Any stream or frame header error.
pub fn probe(buffer: &[u8]) -> Result<StreamInfo, QoaError> {
    let header = StreamHeader::parse(buffer)?;
    let first = FrameHeader::parse(&buffer[StreamHeader::SIZE..])
        .map_err(|e| at_offset(e, StreamHeader::SIZE))?;

    Ok(StreamInfo {
        channels: first.channels,
        sample_rate: first.sample_rate,
        samples_per_channel: header.samples_per_channel as usize,
    })
}

/// Decode a complete QOA stream
///
/// The result holds the samples actually decoded, which may fall short of the
/// declared total by up to one frame (see [`decode_into`]).
///
/// # Errors
/// Any [`QoaError`]; no samples are returned on failure.
pub fn decode(buffer: &[u8]) -> Result<DecodedAudio, QoaError> {
    let mut samples = vec![0i16; probe(buffer)?.total_samples()];
    let info = decode_into(buffer, &mut samples)?;
    samples.truncate(info.total_samples());

    Ok(DecodedAudio {
        samples,
        channels: info.channels,
        sample_rate: info.sample_rate,
        samples_per_channel: info.samples_per_channel,
    })
}

/// Decode a complete QOA stream into a caller-owned region
///
/// `out` must hold at least `channels * samples_per_channel` samples for the
/// declared total (see [`probe`]); it is never grown. The returned info
/// carries the samples actually decoded: a stream whose input ends on a frame
/// boundary at most [`QOA_FRAME_SAMPLES`] short of the declared total is
/// accepted, and `out` past `info.total_samples()` is left untouched. On error
/// the contents of `out` are unspecified and must not be used.
///
/// # Errors
/// Any [`QoaError`], including `BufferTooSmall` for a short `out`.
pub fn decode_into(buffer: &[u8], out: &mut [i16]) -> Result<StreamInfo, QoaError> {
    let info = probe(buffer)?;
    let needed = info.total_samples();
    if out.len() < needed {
        return Err(QoaError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    let channels = info.channels as usize;
    let declared = info.samples_per_channel;

    tracing::debug!(
        channels = info.channels,
        sample_rate = info.sample_rate,
        samples_per_channel = declared,
        bytes = buffer.len(),
        "Decoding QOA stream"
    );

    let mut offset = StreamHeader::SIZE;
    let mut decoded = 0usize;
    let mut frame_index = 0usize;

    while decoded < declared && offset < buffer.len() {
        let frame_bytes = &buffer[offset..];
        let header = FrameHeader::parse(frame_bytes).map_err(|e| at_offset(e, offset))?;

        if header.channels != info.channels || header.sample_rate != info.sample_rate {
            return Err(QoaError::FrameSequenceMismatch {
                frame: frame_index,
                channels: header.channels,
                sample_rate: header.sample_rate,
                expected_channels: info.channels,
                expected_sample_rate: info.sample_rate,
            });
        }

        let frame_samples = header.samples as usize;
        if decoded + frame_samples > declared {
            return Err(QoaError::TotalSampleMismatch {
                declared,
                decoded: decoded + frame_samples,
            });
        }

        let start = decoded * channels;
        let end = start + frame_samples * channels;
        decode_frame_into(frame_bytes, &mut out[start..end]).map_err(|e| at_offset(e, offset))?;

        tracing::trace!(
            frame = frame_index,
            offset,
            samples = frame_samples,
            "Decoded QOA frame"
        );

        decoded += frame_samples;
        offset += header.size as usize;
        frame_index += 1;
    }

    // The loop only stops short of the total once the input is exhausted
    let missing = declared - decoded;
    if missing > QOA_FRAME_SAMPLES {
        return Err(QoaError::TotalSampleMismatch { declared, decoded });
    }
    if missing > 0 {
        tracing::warn!(declared, decoded, "QOA stream ends short of declared total");
    }

    tracing::debug!(
        frames = frame_index,
        trailing_bytes = buffer.len() - offset,
        "Decoded QOA stream"
    );

    Ok(StreamInfo {
        samples_per_channel: decoded,
        ..info
    })
}

/// Rebase a frame-relative error offset onto the stream
fn at_offset(err: QoaError, base: usize) -> QoaError {
    match err {
        QoaError::TruncatedHeader {
            offset,
            needed,
            available,
        } => QoaError::TruncatedHeader {
            offset: base + offset,
            needed,
            available,
        },
        QoaError::TruncatedFrame {
            offset,
            needed,
            available,
        } => QoaError::TruncatedFrame {
            offset: base + offset,
            needed,
            available,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FrameSpec, frames_for, write_frame, write_frame_with_size, write_stream};
    use crate::{ErrorKind, QOA_SLICE_LEN};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn random_stream(seed: u64, channels: u8, sample_rate: u32, samples: usize) -> Vec<u8> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let frames = frames_for(channels, sample_rate, samples, || rng.random());
        write_stream(samples as u32, &frames)
    }

    #[test]
    fn test_known_vector_single_full_frame() {
        let data = random_stream(1, 1, 22050, QOA_FRAME_SAMPLES);
        // 8 byte stream header + one frame of 256 slices
        assert_eq!(data.len(), 8 + 8 + 16 + 256 * 8);

        let audio = decode(&data).unwrap();
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples_per_channel, 5120);
        assert_eq!(audio.samples.len(), 5120);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let data = random_stream(7, 2, 44100, 12_345);
        let first = decode(&data).unwrap();
        let second = decode(&data).unwrap();
        assert_eq!(first.to_le_bytes(), second.to_le_bytes());
    }

    #[test]
    fn test_decoded_length_matches_declared_total() {
        for (channels, samples) in [(1, 1), (1, 20), (2, 41), (3, 5120), (2, 5121), (8, 11_000)] {
            let data = random_stream(samples as u64, channels, 48000, samples);
            let audio = decode(&data).unwrap();
            assert_eq!(audio.samples_per_channel, samples);
            assert_eq!(audio.samples.len(), samples * channels as usize);
        }
    }

    #[test]
    fn test_probe_reports_exact_output_size() {
        let data = random_stream(3, 2, 32000, 6000);
        let info = probe(&data).unwrap();
        assert_eq!(
            info,
            StreamInfo {
                channels: 2,
                sample_rate: 32000,
                samples_per_channel: 6000,
            }
        );
        assert_eq!(info.output_bytes(), 2 * 6000 * 2);
    }

    #[test]
    fn test_frames_are_independent() {
        let data = random_stream(11, 2, 44100, QOA_FRAME_SAMPLES * 3);
        let baseline = decode(&data).unwrap();

        // Flip the low bit of the first residual code in the second frame's
        // first slice (bit 57 of the word, bit 1 of its first byte)
        let frame_size = crate::frame_size(2, QOA_FRAME_SAMPLES);
        let slice_offset = 8 + frame_size + 8 + 2 * 16;
        let mut corrupted = data.clone();
        corrupted[slice_offset] ^= 0x02;
        let altered = decode(&corrupted).unwrap();

        let frame_len = QOA_FRAME_SAMPLES * 2;
        let (before, rest) = baseline.samples.split_at(frame_len);
        let (middle, after) = rest.split_at(frame_len);
        assert_eq!(before, &altered.samples[..frame_len]);
        assert_eq!(after, &altered.samples[frame_len * 2..]);

        // Left channel of the first slice row differs somewhere
        let first_slice_left: Vec<i16> =
            middle.iter().step_by(2).take(QOA_SLICE_LEN).copied().collect();
        let altered_left: Vec<i16> = altered.samples[frame_len..]
            .iter()
            .step_by(2)
            .take(QOA_SLICE_LEN)
            .copied()
            .collect();
        assert_ne!(first_slice_left, altered_left);
    }

    #[test]
    fn test_short_buffer_is_truncated_header() {
        let err = decode(&[0x71, 0x6f, 0x61, 0x66]).unwrap_err();
        assert_eq!(
            err,
            QoaError::TruncatedHeader {
                offset: 0,
                needed: 8,
                available: 4,
            }
        );
    }

    #[test]
    fn test_corrupted_magic() {
        let mut data = random_stream(5, 1, 22050, 100);
        data[0] ^= 0xFF;
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::MagicMismatch);
    }

    #[test]
    fn test_zero_declared_samples() {
        let mut data = random_stream(5, 1, 22050, 100);
        data[4..8].copy_from_slice(&0u32.to_be_bytes());
        assert_eq!(decode(&data), Err(QoaError::EmptyStream));
    }

    #[test]
    fn test_header_without_frames() {
        let data = write_stream(100, &[]);
        assert!(matches!(
            decode(&data),
            Err(QoaError::TruncatedHeader {
                offset: 8,
                available: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_frame_size_field_mismatch() {
        let frame = FrameSpec::zeroed(1, 22050, 40);
        let mut data = write_stream(40, &[]);
        data.extend_from_slice(&write_frame_with_size(&frame, frame.byte_size() as u16 + 8));
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::InvalidFrameSize);
    }

    #[test]
    fn test_truncated_final_frame() {
        let mut data = random_stream(9, 2, 22050, 6000);
        data.truncate(data.len() - 3);
        assert_eq!(decode(&data).unwrap_err().kind(), ErrorKind::TruncatedFrame);
    }

    #[test]
    fn test_missing_final_frame_within_one_frame() {
        let mut rng = Pcg64::seed_from_u64(19);
        let frames = frames_for(2, 22050, 6000, || rng.random());
        let full = decode(&write_stream(6000, &frames)).unwrap();

        // 880 short of the declared total: accepted with what was decoded
        let data = write_stream(6000, &frames[..1]);
        let audio = decode(&data).unwrap();
        assert_eq!(audio.samples_per_channel, 5120);
        assert_eq!(audio.samples, full.samples[..2 * 5120]);

        let mut out = vec![i16::MIN; 2 * 6000];
        let info = decode_into(&data, &mut out).unwrap();
        assert_eq!(info.samples_per_channel, 5120);
        assert_eq!(info.total_samples(), 2 * 5120);
        assert!(out[2 * 5120..].iter().all(|&s| s == i16::MIN));
    }

    #[test]
    fn test_missing_exactly_one_frame() {
        let frames = frames_for(1, 22050, 2 * QOA_FRAME_SAMPLES, || 0);
        let data = write_stream(2 * QOA_FRAME_SAMPLES as u32, &frames[..1]);
        assert_eq!(decode(&data).unwrap().samples_per_channel, QOA_FRAME_SAMPLES);
    }

    #[test]
    fn test_missing_more_than_one_frame() {
        let frames = frames_for(1, 22050, 10_241, || 0);
        let data = write_stream(10_241, &frames[..1]);
        assert_eq!(
            decode(&data),
            Err(QoaError::TotalSampleMismatch {
                declared: 10_241,
                decoded: 5120,
            })
        );
    }

    #[test]
    fn test_frame_overruns_declared_total() {
        let frames = frames_for(1, 22050, 6000, || 0);
        let data = write_stream(5500, &frames);
        assert_eq!(
            decode(&data),
            Err(QoaError::TotalSampleMismatch {
                declared: 5500,
                decoded: 6000,
            })
        );
    }

    #[test]
    fn test_channel_count_change() {
        let frames = vec![
            FrameSpec::zeroed(2, 22050, 5120),
            FrameSpec::zeroed(1, 22050, 100),
        ];
        let data = write_stream(5220, &frames);
        assert!(matches!(
            decode(&data),
            Err(QoaError::FrameSequenceMismatch {
                frame: 1,
                channels: 1,
                expected_channels: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_sample_rate_change() {
        let frames = vec![
            FrameSpec::zeroed(1, 22050, 5120),
            FrameSpec::zeroed(1, 44100, 100),
        ];
        let data = write_stream(5220, &frames);
        assert_eq!(
            decode(&data).unwrap_err().kind(),
            ErrorKind::FrameSequenceMismatch
        );
    }

    #[test]
    fn test_trailing_bytes_after_total_are_ignored() {
        let mut data = random_stream(13, 1, 22050, 300);
        let expected = decode(&data).unwrap();
        data.extend_from_slice(&[0xFF; 5]);
        assert_eq!(decode(&data).unwrap(), expected);
    }

    #[test]
    fn test_decode_into_exact_region() {
        let data = random_stream(17, 2, 22050, 5200);
        let expected = decode(&data).unwrap();

        let mut out = vec![0i16; 2 * 5200];
        let info = decode_into(&data, &mut out).unwrap();
        assert_eq!(info.samples_per_channel, 5200);
        assert_eq!(out, expected.samples);

        let mut short = vec![0i16; 2 * 5200 - 1];
        assert_eq!(
            decode_into(&data, &mut short).unwrap_err().kind(),
            ErrorKind::BufferTooSmall
        );
    }

    #[test]
    fn test_matches_frame_by_frame_decode() {
        let mut rng = Pcg64::seed_from_u64(21);
        let frames = frames_for(2, 44100, 7000, || rng.random());
        let data = write_stream(7000, &frames);

        let mut expected = Vec::new();
        for frame in &frames {
            expected.extend(crate::decode_frame(&write_frame(frame)).unwrap().samples);
        }
        assert_eq!(decode(&data).unwrap().samples, expected);
    }
}
