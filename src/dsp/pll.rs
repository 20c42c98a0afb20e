//! Carrier recovery Phase-Locked Loop (PLL)
//!
//! This module estimates and removes the residual carrier frequency/phase
//! offset left on the baseband by receiver tuning error and Doppler shift,
//! producing the phase-corrected symbol stream that timing recovery works
//! on.
//!
//! # Design
//!
//! A second-order (proportional + integral) tracking loop, run once per
//! input sample:
//!
//! 1. generate the local carrier estimate `e^(i·phase)`
//! 2. derotate: `out = in · conj(carrier)`
//! 3. phase error `e = arg(out)`, in (−π, π]
//! 4. `phase += e·α` (proportional), `freq += e·β` (integral)
//! 5. `phase += freq`, then wrap phase into [0, 2π)
//!
//! α reacts quickly to instantaneous phase error; β integrates it into a
//! frequency estimate that tracks a steady offset with zero residual phase
//! error. With `β = 0.05·α²` the loop is critically damped: the β/α² ratio
//! is what sets the damping, so changing one gain means changing the other.
//!
//! There are no error states. The loop is unconditionally stable for these
//! gains at realistic SNR, but it can fail to acquire on pathological
//! input; that condition is surfaced through [`LockDetector`], never as an
//! error.
//!
//! # Example
//!
//! ```
//! use lrptdemod::dsp::pll::CarrierPll;
//! use num_complex::Complex;
//!
//! let mut pll = CarrierPll::new(0.005);
//! // A sample with a small phase offset gets pulled toward the real axis
//! let out = pll.process(Complex::new(1.0, 0.1));
//! assert!(out.im.abs() <= 0.1);
//! ```

use std::f64::consts::TAU;

use num_complex::Complex;

/// Second-order carrier tracking loop.
#[derive(Debug, Clone)]
pub struct CarrierPll {
    /// Local carrier phase in radians, wrapped to [0, 2π)
    phase: f64,

    /// Integrated frequency estimate in radians per sample
    frequency: f64,

    /// Proportional gain
    alpha: f64,

    /// Integral gain, 0.05·α²
    beta: f64,
}

impl CarrierPll {
    /// Create a PLL with the given proportional gain.
    ///
    /// The integral gain is derived as `0.05·α²`, keeping the loop
    /// critically damped for any choice of α.
    pub fn new(alpha: f64) -> Self {
        Self {
            phase: 0.0,
            frequency: 0.0,
            alpha,
            beta: 0.05 * alpha * alpha,
        }
    }

    /// Current frequency estimate in radians per sample.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Current carrier phase in radians, in [0, 2π).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Derotate one sample and update the loop.
    ///
    /// Returns the phase-corrected sample fed to timing recovery.
    pub fn process(&mut self, input: Complex<f64>) -> Complex<f64> {
        let carrier = Complex::from_polar(1.0, self.phase);
        let output = input * carrier.conj();

        let error = output.arg();
        self.phase += error * self.alpha;
        self.frequency += error * self.beta;

        self.phase += self.frequency;
        self.phase = self.phase.rem_euclid(TAU);

        output
    }
}

/// PLL lock state derived from block-to-block frequency stability.
///
/// Run once per processed input block, not per sample: lock is declared when
/// the frequency estimate moved by less than the threshold (scaled by the
/// sample rate) since the previous block. Purely observational; it feeds the
/// status display and never influences the loops.
#[derive(Debug, Clone)]
pub struct LockDetector {
    /// Frequency estimate at the end of the previous block, radians/sample
    previous_frequency: f64,

    /// Lock threshold (frequency delta scaled by the sample rate)
    threshold: f64,

    /// Input sample rate in Hz
    sample_rate: f64,

    locked: bool,
}

impl LockDetector {
    pub fn new(threshold: f64, sample_rate: f64) -> Self {
        Self {
            previous_frequency: 0.0,
            threshold,
            sample_rate,
            locked: false,
        }
    }

    /// Compare this block's frequency estimate with the previous one.
    pub fn update(&mut self, frequency: f64) -> bool {
        self.locked = (frequency - self.previous_frequency).abs() * self.sample_rate
            < self.threshold;
        self.previous_frequency = frequency;
        self.locked
    }

    /// Lock state as of the last `update` call.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
