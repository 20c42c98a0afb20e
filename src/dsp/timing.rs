//! Decision-directed symbol timing recovery
//!
//! This module resamples the phase-corrected stream down to the symbol rate
//! and tracks symbol-clock frequency/phase drift with a second second-order
//! loop, independent of the carrier PLL.
//!
//! # Design
//!
//! The symbol clock phase is a fractional position in [0, 1) that advances
//! by `frequency / sample_rate` every input sample (`frequency` is in
//! symbols per second, initialized to the nominal symbol rate). A symbol
//! instant is detected when the phase has crossed 1.0 on a *previous*
//! advance; the check happens before the current sample's advance, which is
//! what makes the loop update sparse: the error detector and the gain
//! updates only fire once per symbol, roughly `sample_rate / symbol_rate`
//! times less often than the carrier loop.
//!
//! At each symbol instant, with `r` the in-phase value of the current
//! sample and `p` the previous symbol's in-phase value:
//!
//! ```text
//! e = r·slice(p) − p·slice(r)
//! phase += e·α,  frequency += e·β,  phase wrapped to [0, 1)
//! ```
//!
//! This is a zero-crossing detector on sign transitions of consecutive
//! symbol-rate samples. The gains are tuned far below the carrier loop's
//! because symbol-clock drift is much slower than carrier drift.

use num_complex::Complex;

use super::slice;

/// Second-order symbol clock tracking loop.
#[derive(Debug, Clone)]
pub struct TimingRecovery {
    /// Fractional symbol clock position, wrapped to [0, 1)
    phase: f64,

    /// Symbol clock frequency estimate in symbols per second
    frequency: f64,

    /// In-phase value of the previously recovered symbol
    previous_real: f64,

    /// Input sample rate in Hz
    sample_rate: f64,

    /// Phase gain
    alpha: f64,

    /// Frequency gain
    beta: f64,
}

impl TimingRecovery {
    /// Create a timing loop at the nominal symbol rate.
    pub fn new(symbol_rate: f64, sample_rate: f64, alpha: f64, beta: f64) -> Self {
        Self {
            phase: 0.0,
            frequency: symbol_rate,
            previous_real: 0.0,
            sample_rate,
            alpha,
            beta,
        }
    }

    /// Current symbol clock frequency estimate in symbols per second.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Current fractional symbol clock position.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Advance the symbol clock by one input sample.
    ///
    /// Returns the recovered symbol when this sample lands on a symbol
    /// instant, `None` otherwise. The boundary check uses the phase as left
    /// by the previous sample's advance.
    pub fn process(&mut self, input: Complex<f64>) -> Option<Complex<f64>> {
        let symbol = if self.phase > 1.0 {
            let real = input.re;

            let error = real * slice(self.previous_real) - self.previous_real * slice(real);

            self.phase += error * self.alpha;
            self.frequency += error * self.beta;
            self.phase = self.phase.rem_euclid(1.0);

            self.previous_real = real;

            Some(input)
        } else {
            None
        };

        self.phase += self.frequency / self.sample_rate;

        symbol
    }
}
