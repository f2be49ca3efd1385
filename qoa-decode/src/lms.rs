//! LMS (Least Mean Squares) predictor for QOA decoding

use crate::{QOA_LMS_LEN, QOA_LMS_STATE_SIZE};

/// LMS predictor state for one channel
///
/// QOA uses a 4-tap sign-sign LMS filter. The state is transmitted at the
/// start of every frame, so it never carries over between frames.
///
/// All arithmetic wraps in 32 bits; streams produced by the reference encoder
/// rely on that behaviour for bit-exact reconstruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QoaLms {
    /// Last 4 reconstructed samples, oldest first
    pub history: [i32; QOA_LMS_LEN],

    /// Adaptive filter weights
    pub weights: [i32; QOA_LMS_LEN],
}

impl QoaLms {
    /// Read a predictor state as stored in a frame
    ///
    /// Layout: 4 x i16 BE history followed by 4 x i16 BE weights.
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; QOA_LMS_STATE_SIZE]) -> Self {
        let word = |i: usize| i16::from_be_bytes([bytes[i * 2], bytes[i * 2 + 1]]) as i32;
        Self {
            history: [word(0), word(1), word(2), word(3)],
            weights: [word(4), word(5), word(6), word(7)],
        }
    }

    /// Predict next sample based on history
    ///
    /// `(sum(weights[i] * history[i])) >> 13`, unclamped.
    #[inline]
    #[must_use]
    pub fn predict(&self) -> i32 {
        let mut prediction = 0i32;
        for i in 0..QOA_LMS_LEN {
            prediction = prediction.wrapping_add(self.weights[i].wrapping_mul(self.history[i]));
        }
        prediction >> 13
    }

    /// Update weights and history after decoding a sample
    ///
    /// # Arguments
    /// * `sample` - The reconstructed sample (predicted + dequantized residual, clamped)
    /// * `residual` - The dequantized residual value
    #[inline]
    pub fn update(&mut self, sample: i32, residual: i32) {
        let delta = residual >> 4;
        for i in 0..QOA_LMS_LEN {
            let step = if self.history[i] < 0 {
                delta.wrapping_neg()
            } else {
                delta
            };
            self.weights[i] = self.weights[i].wrapping_add(step);
        }

        self.history.rotate_left(1);
        self.history[QOA_LMS_LEN - 1] = sample;
    }
}
