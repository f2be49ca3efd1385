//! QOA-Decode: bit-exact decoder for QOA (Quite OK Audio) streams
//!
//! QOA is a lossy predictive-PCM format: every frame carries a 4-tap LMS
//! predictor state per channel, followed by 64-bit slices that each hold a
//! scalefactor and twenty 3-bit quantized residuals. Decoding is integer-only
//! and must reproduce the reference decoder's output byte for byte.
//!
//! # Stream Format
//!
//! ```text
//! Stream header (8 bytes):
//!   0x00: magic "qoaf" (u32 BE)
//!   0x04: samples per channel (u32 BE)
//!
//! Frame header (8 bytes, repeats):
//!   0x00: channels (u8, 1-8)
//!   0x01: sample_rate (u24 BE)
//!   0x04: samples_in_frame (u16 BE, 1-5120)
//!   0x06: frame_size (u16 BE)
//!
//! Per-channel LMS state (16 bytes each):
//!   history[4] as i16 BE + weights[4] as i16 BE
//!
//! Slices (8 bytes each, interleaved by channel, up to 256 per channel):
//!   scalefactor (4 bits) + 20 residuals (3 bits each), MSB first
//! ```
//!
//! # Usage
//!
//! ```no_run
//! # fn load() -> Vec<u8> { Vec::new() }
//! let qoa_data = load();
//! match qoa_decode::decode(&qoa_data) {
//!     Ok(audio) => println!(
//!         "{} channel(s) @ {} Hz, {} samples per channel",
//!         audio.channels, audio.sample_rate, audio.samples_per_channel
//!     ),
//!     Err(e) => eprintln!("invalid QOA data: {e}"),
//! }
//! ```
//!
//! Callers that manage their own output memory use [`probe`] to size the
//! region exactly and [`decode_into`] to fill it.

mod audio;
mod bytes;
mod dequant;
mod error;
mod frame;
mod lms;
mod slice;
mod stream;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use audio::{DecodedAudio, SampleStats};
pub use bytes::ByteReader;
pub use dequant::dequantize;
pub use error::{ErrorKind, QoaError};
pub use frame::{DecodedFrame, FrameHeader, decode_frame, decode_frame_into};
pub use lms::QoaLms;
pub use slice::decode_slice;
pub use stream::{StreamHeader, StreamInfo, decode, decode_into, probe};

// =============================================================================
// Constants
// =============================================================================

/// Stream magic, "qoaf"
pub const QOA_MAGIC: u32 = u32::from_be_bytes(*b"qoaf");

/// Stream header size (magic + samples per channel)
pub const QOA_STREAM_HEADER_SIZE: usize = 8;

/// Samples per slice (each slice is 64 bits)
pub const QOA_SLICE_LEN: usize = 20;

/// Slice size in bytes
pub const QOA_SLICE_SIZE: usize = 8;

/// Maximum slices per frame per channel
pub const QOA_MAX_SLICES: usize = 256;

/// Maximum samples per frame per channel (256 slices x 20 samples)
pub const QOA_FRAME_SAMPLES: usize = QOA_MAX_SLICES * QOA_SLICE_LEN;

/// Maximum channel count
pub const QOA_MAX_CHANNELS: usize = 8;

/// LMS filter history/weight length
pub const QOA_LMS_LEN: usize = 4;

/// Frame header size (channels + sample_rate + samples_in_frame + frame_size)
pub const QOA_FRAME_HEADER_SIZE: usize = 8;

/// LMS state size per channel (4 history + 4 weights as i16)
pub const QOA_LMS_STATE_SIZE: usize = 16;

/// Byte size of a frame with the given layout
///
/// `8 + 16 * channels + 8 * channels * ceil(samples / 20)`
#[inline]
#[must_use]
pub const fn frame_size(channels: usize, samples_in_frame: usize) -> usize {
    QOA_FRAME_HEADER_SIZE
        + QOA_LMS_STATE_SIZE * channels
        + QOA_SLICE_SIZE * channels * samples_in_frame.div_ceil(QOA_SLICE_LEN)
}

/// Clamp value to 16-bit signed range
#[inline]
pub(crate) fn clamp_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

// =============================================================================
// Tests
// =============================================================================
