//! Host boundary errors

use qoa_decode::QoaError;

/// Errors raised by the host boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Input was rejected by the decoder
    #[error("invalid input for QOA format: {0}")]
    Decode(#[from] QoaError),

    /// A region lies outside the shared memory
    #[error("region {offset}..{offset}+{len} outside shared memory of {size} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Input and output regions share bytes
    #[error(
        "output region {output_offset}+{output_len} overlaps input region {input_offset}+{input_len}"
    )]
    Overlap {
        input_offset: usize,
        input_len: usize,
        output_offset: usize,
        output_len: usize,
    },

    /// Growing shared memory would exceed the configured page limit
    #[error("shared memory needs {requested} pages, limit is {max}")]
    MemoryLimit { requested: usize, max: usize },

    /// Host configuration failed validation or parsing
    #[error("invalid host config: {0}")]
    InvalidConfig(String),

    /// Decoded audio is unusable for playback conversion
    #[error("invalid decoded audio: {0}")]
    InvalidAudio(&'static str),
}

impl From<toml::de::Error> for HostError {
    fn from(e: toml::de::Error) -> Self {
        HostError::InvalidConfig(e.to_string())
    }
}
