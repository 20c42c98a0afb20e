//! Demodulation pipeline
//!
//! This module wires the per-sample DSP stages into the complete chain and
//! owns every piece of loop state for the lifetime of a run:
//!
//! ```text
//! samples → AGC → low-pass → carrier PLL → timing recovery → quantize/frame
//!                                 ↓
//!                           lock detector (once per input block)
//! ```
//!
//! Processing is single-threaded and synchronous. The only blocking calls
//! are the block-granularity sink writes triggered by the framer; they never
//! happen mid-sample. After each input block a read-only [`Status`] snapshot
//! is available for display.

use std::f64::consts::TAU;
use std::io::Write;

use num_complex::Complex;
use tracing::{debug, trace};

use crate::dsp::agc::Agc;
use crate::dsp::filter::SinglePole;
use crate::dsp::pll::{CarrierPll, LockDetector};
use crate::dsp::timing::TimingRecovery;
use crate::error::Result;
use crate::framer::{OutputFramer, OUTPUT_BLOCK_SIZE};

/// Nominal LRPT symbol rate in symbols per second.
pub const SYMBOL_RATE: f64 = 72_000.0;

/// AGC gain-tracking bandwidth in Hz.
pub const AGC_BANDWIDTH: f64 = 10.0;

/// Carrier loop proportional gain.
pub const PLL_ALPHA: f64 = 0.005;

/// Carrier lock threshold (block-to-block frequency delta scaled by the
/// sample rate).
pub const PLL_LOCK_THRESHOLD: f64 = 25.0;

/// Timing loop phase gain.
pub const TIMING_ALPHA: f64 = 0.25e-7;

/// Timing loop frequency gain.
pub const TIMING_BETA: f64 = 1.5e-7;

/// Input block size in complex samples.
pub const INPUT_BLOCK_SIZE: usize = 1024;

/// Per-block status snapshot for display and telemetry.
///
/// Refreshed once per input block after all samples in the block have been
/// processed, so it never observes in-progress mutation.
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    /// Recovered symbol clock frequency in symbols per second
    pub symbol_rate: f64,

    /// Estimated residual carrier offset in Hz
    pub carrier_offset_hz: f64,

    /// Raw PLL frequency estimate in radians per sample
    pub pll_frequency: f64,

    /// Carrier lock state
    pub locked: bool,

    /// Last flushed output block (all zeros before the first flush)
    pub constellation: &'a [u8; OUTPUT_BLOCK_SIZE],

    /// Input blocks processed so far
    pub blocks_in: u64,

    /// Output blocks flushed so far
    pub blocks_out: u64,
}

/// The complete sample-to-symbol pipeline.
///
/// # Example
///
/// ```
/// use lrptdemod::Demodulator;
/// use num_complex::Complex;
///
/// let mut demod = Demodulator::new(140_000.0);
/// let mut sink = Vec::new();
/// let block = vec![Complex::new(0.5f32, 0.0); 1024];
/// demod.process_block(&block, &mut sink).unwrap();
/// let status = demod.status();
/// assert_eq!(status.blocks_in, 1);
/// ```
#[derive(Debug)]
pub struct Demodulator {
    sample_rate: f64,
    agc: Agc,
    filter: SinglePole,
    pll: CarrierPll,
    lock: LockDetector,
    timing: TimingRecovery,
    framer: OutputFramer,
    blocks_in: u64,
    was_locked: bool,
}

impl Demodulator {
    /// Create a pipeline for the given input sample rate, using the LRPT
    /// loop constants.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            agc: Agc::new(AGC_BANDWIDTH, sample_rate),
            // Band-limit to the QPSK main lobe ahead of carrier recovery
            filter: SinglePole::new(SYMBOL_RATE * std::f64::consts::SQRT_2 / 2.0, sample_rate),
            pll: CarrierPll::new(PLL_ALPHA),
            lock: LockDetector::new(PLL_LOCK_THRESHOLD, sample_rate),
            timing: TimingRecovery::new(SYMBOL_RATE, sample_rate, TIMING_ALPHA, TIMING_BETA),
            framer: OutputFramer::new(),
            blocks_in: 0,
            was_locked: false,
        }
    }

    /// Run one input block through the pipeline, writing any completed
    /// output blocks to `sink`.
    ///
    /// The block may be shorter than [`INPUT_BLOCK_SIZE`] (the final partial
    /// block of a capture). Sink errors abort immediately; symbols already
    /// accumulated in the unflushed output block stay pending.
    pub fn process_block<W: Write>(&mut self, samples: &[Complex<f32>], sink: &mut W) -> Result<()> {
        for &sample in samples {
            let input = Complex::new(sample.re as f64, sample.im as f64);

            let leveled = self.agc.process(input);
            let filtered = self.filter.process(leveled);
            let corrected = self.pll.process(filtered);

            if let Some(symbol) = self.timing.process(corrected) {
                self.framer.push(symbol, sink)?;
            }
        }

        self.blocks_in += 1;
        let locked = self.lock.update(self.pll.frequency());
        if locked != self.was_locked {
            debug!(
                carrier_offset_hz = self.carrier_offset_hz(),
                block = self.blocks_in,
                "carrier lock {}",
                if locked { "acquired" } else { "lost" }
            );
            self.was_locked = locked;
        }
        trace!(
            block = self.blocks_in,
            symbol_rate = self.timing.frequency(),
            carrier_offset_hz = self.carrier_offset_hz(),
            locked,
            "block processed"
        );

        Ok(())
    }

    /// Estimated residual carrier offset in Hz.
    fn carrier_offset_hz(&self) -> f64 {
        self.pll.frequency() * self.sample_rate / TAU
    }

    /// Snapshot of the pipeline state as of the last processed block.
    pub fn status(&self) -> Status<'_> {
        Status {
            symbol_rate: self.timing.frequency(),
            carrier_offset_hz: self.carrier_offset_hz(),
            pll_frequency: self.pll.frequency(),
            locked: self.lock.is_locked(),
            constellation: self.framer.constellation(),
            blocks_in: self.blocks_in,
            blocks_out: self.framer.flushed_blocks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_is_a_no_op_for_output() {
        let mut demod = Demodulator::new(140_000.0);
        let mut sink = Vec::new();
        demod.process_block(&[], &mut sink).unwrap();
        assert!(sink.is_empty());
        assert_eq!(demod.status().blocks_in, 1);
        assert_eq!(demod.status().blocks_out, 0);
    }

    #[test]
    fn test_symbol_rate_initialized_to_nominal() {
        let demod = Demodulator::new(140_000.0);
        assert_eq!(demod.status().symbol_rate, SYMBOL_RATE);
        assert!(!demod.status().locked);
    }

    #[test]
    fn test_output_is_block_aligned() {
        // 3000 samples at 2 samples/symbol emit ~1499 symbols (2998 bytes):
        // exactly two full output blocks, the rest held back
        let mut demod = Demodulator::new(144_000.0);
        let mut sink = Vec::new();
        let block: Vec<Complex<f32>> = (0..1000)
            .map(|n| {
                let s = if (n / 2) % 2 == 0 { 1.0 } else { -1.0 };
                Complex::new(s * 0.7, s * 0.7)
            })
            .collect();
        for _ in 0..3 {
            demod.process_block(&block, &mut sink).unwrap();
        }
        assert_eq!(sink.len(), 2 * OUTPUT_BLOCK_SIZE);
        assert_eq!(demod.status().blocks_out, 2);
    }
}
