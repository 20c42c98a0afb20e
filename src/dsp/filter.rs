//! Single-pole complex low-pass filter
//!
//! Band-limits the normalized baseband ahead of carrier recovery. Same IIR
//! form as the AGC mean tracker, applied to the complex signal itself. For
//! LRPT the cutoff is `symbol_rate·√2/2`, wide enough to pass the QPSK
//! spectrum while knocking down out-of-band noise before the PLL sees it.

use num_complex::Complex;

use super::iir_coefficient;

/// Single-pole IIR low-pass over complex samples.
///
/// State persists across the whole run; it is never reset.
#[derive(Debug, Clone)]
pub struct SinglePole {
    coefficient: f64,
    state: Complex<f64>,
}

impl SinglePole {
    /// Create a filter with the given cutoff frequency.
    pub fn new(cutoff: f64, sample_rate: f64) -> Self {
        Self {
            coefficient: iir_coefficient(cutoff, sample_rate),
            state: Complex::new(0.0, 0.0),
        }
    }

    /// Filter one sample.
    pub fn process(&mut self, input: Complex<f64>) -> Complex<f64> {
        self.state += self.coefficient * (input - self.state);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_response_converges() {
        let mut filter = SinglePole::new(50_912.0, 140_000.0);
        let step = Complex::new(1.0, -1.0);
        let mut out = Complex::new(0.0, 0.0);
        for _ in 0..100 {
            out = filter.process(step);
        }
        assert!((out - step).norm() < 1e-6);
    }

    #[test]
    fn test_dc_passes_unchanged_once_settled() {
        let mut filter = SinglePole::new(1000.0, 140_000.0);
        for _ in 0..100_000 {
            filter.process(Complex::new(0.5, 0.5));
        }
        let out = filter.process(Complex::new(0.5, 0.5));
        assert!((out.re - 0.5).abs() < 1e-9);
        assert!((out.im - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_high_frequency_attenuated() {
        // Alternating-sign input at the Nyquist rate should shrink well below
        // the input amplitude for a narrow cutoff
        let mut filter = SinglePole::new(1000.0, 140_000.0);
        let mut peak: f64 = 0.0;
        for n in 0..10_000 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            let out = filter.process(Complex::new(x, 0.0));
            if n > 1000 {
                peak = peak.max(out.norm());
            }
        }
        assert!(peak < 0.05, "Nyquist tone leaked through: {}", peak);
    }
}
