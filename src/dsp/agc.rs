//! Automatic Gain Control (AGC)
//!
//! This module normalizes the amplitude of the incoming baseband stream so
//! the downstream carrier and timing loops see a signal of predictable
//! level regardless of receiver gain or fade depth.
//!
//! # Design
//!
//! The AGC tracks the long-term mean magnitude of the input with a
//! single-pole IIR (exponential moving average) and divides each sample by
//! it:
//!
//! ```text
//! mean ← mean + α·(|x| − mean)
//! out  = x / mean / 2
//! ```
//!
//! The coefficient α is derived from a very low cutoff (10 Hz for LRPT), so
//! the gain follows slow fading but not symbol-rate amplitude changes.
//!
//! The mean starts at zero and is never reset during a run. The first few
//! thousand samples are therefore over-amplified while the estimate rises;
//! this is an accepted startup transient that the feedback loops ride out,
//! not an error condition. While the input has been silent for the whole
//! run the mean stays at zero and the output is held at zero: dividing
//! there would be 0/0, and a NaN would lodge in the downstream filter
//! state for the rest of the run.
//!
//! # Example
//!
//! ```
//! use lrptdemod::dsp::agc::Agc;
//! use num_complex::Complex;
//!
//! // 10 Hz gain-tracking bandwidth at a 140 kHz sample rate
//! let mut agc = Agc::new(10.0, 140_000.0);
//! for _ in 0..10_000 {
//!     agc.process(Complex::new(0.3, 0.4));
//! }
//! // |input| = 0.5, so the normalized output magnitude approaches 1/2
//! let out = agc.process(Complex::new(0.3, 0.4));
//! assert!((out.norm() - 0.5).abs() < 0.05);
//! ```

use num_complex::Complex;

use super::iir_coefficient;

/// Automatic gain control driven by a running mean of the input magnitude.
#[derive(Debug, Clone)]
pub struct Agc {
    /// IIR coefficient, fixed at construction
    coefficient: f64,

    /// Running mean of the input magnitude, zero until the first sample
    mean: f64,
}

impl Agc {
    /// Create an AGC with the given gain-tracking cutoff frequency.
    ///
    /// # Arguments
    ///
    /// * `cutoff` - Gain tracking bandwidth in Hz (10 Hz for LRPT)
    /// * `sample_rate` - Input sample rate in Hz
    pub fn new(cutoff: f64, sample_rate: f64) -> Self {
        Self {
            coefficient: iir_coefficient(cutoff, sample_rate),
            mean: 0.0,
        }
    }

    /// Get the current mean magnitude estimate.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Normalize one sample, updating the mean estimate first.
    ///
    /// Silence in, silence out: the mean only stays at zero while every
    /// sample so far had zero magnitude, so a zero mean implies a zero
    /// input and the 0/0 division is skipped.
    pub fn process(&mut self, input: Complex<f64>) -> Complex<f64> {
        self.mean += self.coefficient * (input.norm() - self.mean);
        if self.mean == 0.0 {
            return Complex::new(0.0, 0.0);
        }
        input / self.mean / 2.0
    }
}
