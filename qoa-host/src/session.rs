//! Decoder session: the offset-based call boundary
//!
//! A session owns one [`SharedMemory`]. Hosts place QOA bytes in it, call
//! [`DecoderSession::decode_raw`] with raw offsets, and read interleaved
//! little-endian i16 samples back from the output offset.

use qoa_decode::{DecodedAudio, StreamInfo};

use crate::{HostConfig, HostError, SharedMemory};

/// Returned by [`DecoderSession::decode_raw`] on any failure
///
/// A valid stream always has non-zero samples, channels and sample rate, so
/// this value is unambiguous.
pub const FAILURE_SENTINEL: (u32, u32, u32) = (0, 0, 0);

/// Exact output size in bytes for a stream (`channels * samples * 2`)
///
/// Only the headers are read.
pub fn required_output_bytes(qoa_data: &[u8]) -> Result<usize, HostError> {
    Ok(qoa_decode::probe(qoa_data)?.output_bytes())
}

/// Independent decoder instance with its own shared memory
#[derive(Debug)]
pub struct DecoderSession {
    config: HostConfig,
    memory: SharedMemory,
}

impl DecoderSession {
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        config.validate()?;
        let memory = SharedMemory::new(config.page_size, config.initial_pages, config.max_pages)?;
        Ok(Self { config, memory })
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[must_use]
    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SharedMemory {
        &mut self.memory
    }

    /// Decode `input_len` bytes at `input_offset`, writing samples at `output_offset`
    ///
    /// Returns `(samples_per_channel, channels, sample_rate)`, or
    /// [`FAILURE_SENTINEL`] if the regions are out of bounds, the output region
    /// is too small, or the input is not a valid stream.
    pub fn decode_raw(
        &mut self,
        input_offset: u32,
        input_len: u32,
        output_offset: u32,
    ) -> (u32, u32, u32) {
        let result =
            self.decode_region(input_offset as usize, input_len as usize, output_offset as usize);
        match result {
            Ok(info) => (
                info.samples_per_channel as u32,
                info.channels as u32,
                info.sample_rate,
            ),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    input_offset,
                    input_len,
                    output_offset,
                    "QOA decode failed"
                );
                FAILURE_SENTINEL
            }
        }
    }

    /// Same as [`decode_raw`](Self::decode_raw) with the error kept
    pub fn decode_region(
        &mut self,
        input_offset: usize,
        input_len: usize,
        output_offset: usize,
    ) -> Result<StreamInfo, HostError> {
        let info = qoa_decode::probe(self.memory.region(input_offset, input_len)?)?;
        let output_len = info.output_bytes();

        let (input, output) = self
            .memory
            .split_regions((input_offset, input_len), (output_offset, output_len))?;

        // Output offsets carry no alignment guarantee, so decode into i16s first
        let mut samples = vec![0i16; info.total_samples()];
        let decoded = qoa_decode::decode_into(input, &mut samples)?;

        for (dst, sample) in output
            .chunks_exact_mut(2)
            .zip(&samples[..decoded.total_samples()])
        {
            dst.copy_from_slice(&sample.to_le_bytes());
        }
        Ok(decoded)
    }

    /// Full host flow for one buffer
    ///
    /// Grows memory to exactly `input_offset + input + guard + output`, places
    /// the input, decodes through the raw boundary and copies samples out.
    pub fn decode(&mut self, qoa_data: &[u8]) -> Result<DecodedAudio, HostError> {
        let output_len = required_output_bytes(qoa_data)?;
        let input_offset = self.config.input_offset;
        let output_offset = input_offset + qoa_data.len() + self.config.guard_bytes;

        self.memory.ensure(output_offset + output_len)?;
        self.memory.write(input_offset, qoa_data)?;

        let info = self.decode_region(input_offset, qoa_data.len(), output_offset)?;

        let samples = self
            .memory
            .region(output_offset, info.output_bytes())?
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        Ok(DecodedAudio {
            samples,
            channels: info.channels,
            sample_rate: info.sample_rate,
            samples_per_channel: info.samples_per_channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoa_decode::testing::{FrameSpec, write_stream};

    fn small_config() -> HostConfig {
        HostConfig {
            input_offset: 64,
            guard_bytes: 16,
            page_size: 1024,
            initial_pages: 1,
            max_pages: 64,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = HostConfig {
            page_size: 0,
            ..HostConfig::default()
        };
        assert!(matches!(
            DecoderSession::new(config),
            Err(HostError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_decode_grows_to_exact_need() {
        let data = write_stream(2000, &[FrameSpec::zeroed(1, 22050, 2000)]);
        let mut session = DecoderSession::new(small_config()).unwrap();

        let audio = session.decode(&data).unwrap();
        assert_eq!(audio.samples.len(), 2000);

        let needed = 64 + data.len() + 16 + 4000;
        assert_eq!(session.memory().pages(), needed.div_ceil(1024));
    }

    #[test]
    fn test_required_output_bytes() {
        let data = write_stream(100, &[FrameSpec::zeroed(2, 22050, 100)]);
        assert_eq!(required_output_bytes(&data).unwrap(), 400);
    }
}
