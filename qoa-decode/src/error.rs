//! QOA decoding error types

/// Errors that can occur during QOA decoding
///
/// Every variant aborts the whole decode; no partial output is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QoaError {
    /// Stream does not start with "qoaf"
    #[error("invalid QOA magic 0x{found:08X} (expected \"qoaf\")")]
    MagicMismatch { found: u32 },

    /// Not enough bytes for a stream or frame header
    #[error("truncated header at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedHeader {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Channel count outside 1-8
    #[error("invalid channel count {0} (must be 1-8)")]
    InvalidChannelCount(u8),

    /// Sample rate of zero
    #[error("invalid sample rate 0")]
    InvalidSampleRate,

    /// Frame sample count or declared byte size does not match its layout
    #[error(
        "invalid frame size: {samples} samples, declared {declared} bytes, layout needs {expected}"
    )]
    InvalidFrameSize {
        samples: usize,
        declared: usize,
        expected: usize,
    },

    /// Frame body extends past the end of the input
    #[error("truncated frame at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedFrame {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A later frame changed the stream's channel count or sample rate
    #[error(
        "frame {frame} has {channels} channel(s) @ {sample_rate} Hz, stream is {expected_channels} channel(s) @ {expected_sample_rate} Hz"
    )]
    FrameSequenceMismatch {
        frame: usize,
        channels: u8,
        sample_rate: u32,
        expected_channels: u8,
        expected_sample_rate: u32,
    },

    /// Decoded sample count diverges from the stream header
    #[error("stream declares {declared} samples per channel, frames carry {decoded}")]
    TotalSampleMismatch { declared: usize, decoded: usize },

    /// Stream header declares zero samples
    #[error("stream declares zero samples")]
    EmptyStream,

    /// Caller-supplied output region cannot hold the decoded samples
    #[error("output buffer too small: need {needed} samples, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Fieldless classification of [`QoaError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// First four bytes are not `"qoaf"`
    MagicMismatch,
    /// Stream or frame header cut short
    TruncatedHeader,
    /// Frame channel count outside 1-8
    InvalidChannelCount,
    /// Frame sample rate of zero
    InvalidSampleRate,
    /// Frame sample count out of range or size field inconsistent with it
    InvalidFrameSize,
    /// Frame body shorter than its declared size
    TruncatedFrame,
    /// Later frame changes channel count or sample rate
    FrameSequenceMismatch,
    /// Frames overrun the declared total or fall short of it by more than a frame
    TotalSampleMismatch,
    /// Zero samples declared
    EmptyStream,
    /// Output region too small for the declared total
    BufferTooSmall,
}

impl QoaError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            QoaError::MagicMismatch { .. } => ErrorKind::MagicMismatch,
            QoaError::TruncatedHeader { .. } => ErrorKind::TruncatedHeader,
            QoaError::InvalidChannelCount(_) => ErrorKind::InvalidChannelCount,
            QoaError::InvalidSampleRate => ErrorKind::InvalidSampleRate,
            QoaError::InvalidFrameSize { .. } => ErrorKind::InvalidFrameSize,
            QoaError::TruncatedFrame { .. } => ErrorKind::TruncatedFrame,
            QoaError::FrameSequenceMismatch { .. } => ErrorKind::FrameSequenceMismatch,
            QoaError::TotalSampleMismatch { .. } => ErrorKind::TotalSampleMismatch,
            QoaError::EmptyStream => ErrorKind::EmptyStream,
            QoaError::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            QoaError::MagicMismatch { found: 0x716f_6167 }.to_string(),
            "invalid QOA magic 0x716F6167 (expected \"qoaf\")"
        );
        assert_eq!(
            QoaError::InvalidChannelCount(9).to_string(),
            "invalid channel count 9 (must be 1-8)"
        );
        assert_eq!(
            QoaError::TotalSampleMismatch {
                declared: 100,
                decoded: 40
            }
            .to_string(),
            "stream declares 100 samples per channel, frames carry 40"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(QoaError::EmptyStream.kind(), ErrorKind::EmptyStream);
        assert_eq!(
            QoaError::BufferTooSmall {
                needed: 2,
                available: 1
            }
            .kind(),
            ErrorKind::BufferTooSmall
        );
        assert_eq!(
            QoaError::TotalSampleMismatch {
                declared: 10_241,
                decoded: 5120
            }
            .kind(),
            ErrorKind::TotalSampleMismatch
        );
        assert_eq!(QoaError::InvalidSampleRate.kind(), ErrorKind::InvalidSampleRate);
    }
}
