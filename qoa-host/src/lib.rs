//! QOA-Host: session-based host boundary for `qoa-decode`
//!
//! Minimal-runtime hosts talk to the decoder through a flat byte buffer and
//! raw offsets, and learn about failure only through a `(0, 0, 0)` return.
//! This crate keeps that contract at the edge and nowhere else:
//!
//! - [`DecoderSession`] - an explicit decoder handle owning its [`SharedMemory`];
//!   create as many as needed, each is independent
//! - [`DecoderSession::decode_raw`] - the literal `(input_offset, input_len,
//!   output_offset) -> (samples_per_channel, channels, sample_rate)` entry point
//! - [`DecoderSession::decode_region`] / [`DecoderSession::decode`] - the same
//!   boundary with the specific [`HostError`] preserved
//! - [`PlanarAudio`] - per-channel float buffers for playback engines
//!
//! # Usage
//!
//! ```
//! use qoa_host::{DecoderSession, FAILURE_SENTINEL, HostConfig};
//!
//! let mut session = DecoderSession::new(HostConfig::default()).unwrap();
//! session.memory_mut().write(4096, b"not a qoa stream").unwrap();
//! assert_eq!(session.decode_raw(4096, 16, 8192), FAILURE_SENTINEL);
//! ```

mod config;
mod error;
mod memory;
mod playback;
mod session;

pub use config::HostConfig;
pub use error::HostError;
pub use memory::SharedMemory;
pub use playback::PlanarAudio;
pub use session::{DecoderSession, FAILURE_SENTINEL, required_output_bytes};
