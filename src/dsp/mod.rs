/// Digital Signal Processing (DSP) module.
///
/// This module provides the per-sample building blocks of the demodulation
/// pipeline. Each block owns its own loop state and exposes a single
/// `process` method that is called once per input sample; composing them in
/// order reproduces the full chain:
///
/// ```text
/// I/Q sample → AGC → SinglePole → CarrierPll → TimingRecovery → symbol
///                                      ↓
///                                LockDetector (once per input block)
/// ```
///
/// All loop arithmetic is carried out in `f64`. The blocks are stateful and
/// **not** thread-safe; the pipeline owns one instance of each and mutates
/// them from a single processing loop.
pub mod agc;
pub mod filter;
pub mod pll;
pub mod timing;

use std::f64::consts::TAU;

/// Compute a single-pole IIR coefficient from a cutoff frequency.
///
/// `1 − e^(−2π·fc/fs)`, in (0, 1) for any positive cutoff and sample rate.
/// Small `fc/fs` ratios give coefficients near zero (slow tracking), large
/// ratios approach one (the filter follows the input almost immediately).
pub fn iir_coefficient(cutoff: f64, sample_rate: f64) -> f64 {
    1.0 - (-TAU * cutoff / sample_rate).exp()
}

/// Ternary slicer: −1, 0 or +1 matching the sign of `x`.
///
/// This is the hard decision device used by the timing error detector. It is
/// deliberately not smooth: `slice(0.0)` is exactly 0.
pub fn slice(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Quantize a soft value to a signed 8-bit symbol byte.
///
/// Truncates toward zero and saturates to [−128, 127]. NaN maps to 0.
pub fn quantize(x: f64) -> i8 {
    // `as` casts from float to int saturate in Rust, no explicit clamp needed
    x as i8
}
