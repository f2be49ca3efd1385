//! Slice decoding (one 64-bit word, 20 samples, one channel)

use crate::{QOA_SLICE_LEN, QoaLms, clamp_i16, dequantize};

/// Decode a single slice into 20 samples
///
/// # Slice format (64 bits, big-endian)
/// - Bits 60-63: Scalefactor index (4 bits)
/// - Bits 0-59:  20 quantized residuals (3 bits each, first sample highest)
///
/// All 20 slots are decoded and the predictor advances through each of them,
/// even when the slice is the partial tail of a frame. Dropping the padding
/// samples is the caller's job.
pub fn decode_slice(slice: u64, lms: &mut QoaLms) -> [i16; QOA_SLICE_LEN] {
    let scalefactor = (slice >> 60) as u8;
    let mut output = [0i16; QOA_SLICE_LEN];

    for (i, out) in output.iter_mut().enumerate() {
        let quantized = ((slice >> (57 - i * 3)) & 0x7) as u8;

        let predicted = lms.predict();
        let dequantized = dequantize(scalefactor, quantized);
        let sample = clamp_i16(predicted.wrapping_add(dequantized));

        lms.update(sample as i32, dequantized);
        *out = sample;
    }

    output
}
