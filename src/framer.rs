//! Symbol quantization and output framing
//!
//! Recovered symbols are quantized to signed 8-bit (I, Q) pairs and batched
//! into fixed 1024-byte blocks. A block is flushed to the sink atomically
//! exactly when it fills; a partial block left over at end of stream is
//! dropped, never written. Downstream LRPT tooling expects whole blocks.
//!
//! The last flushed block is kept around as a read-only constellation view
//! for the status display. It reflects the last *completed* flush, not the
//! symbols currently accumulating, so the view can lag the live stream by
//! up to half a block.

use std::io::{self, Write};

use num_complex::Complex;

use crate::dsp::quantize;

/// Output block size in bytes (512 symbols).
pub const OUTPUT_BLOCK_SIZE: usize = 1024;

/// Scale factor applied before quantization (1.5 · 128).
const SYMBOL_SCALE: f64 = 192.0;

/// Fixed-capacity output block with a write cursor and a flushed-block copy.
#[derive(Debug, Clone)]
pub struct OutputFramer {
    block: [u8; OUTPUT_BLOCK_SIZE],
    cursor: usize,
    last_flushed: [u8; OUTPUT_BLOCK_SIZE],
    flushed_blocks: u64,
}

impl OutputFramer {
    pub fn new() -> Self {
        Self {
            block: [0u8; OUTPUT_BLOCK_SIZE],
            cursor: 0,
            last_flushed: [0u8; OUTPUT_BLOCK_SIZE],
            flushed_blocks: 0,
        }
    }

    /// Quantize one recovered symbol and append its two bytes.
    ///
    /// Flushes the block to `sink` when it fills. Returns `true` when a
    /// flush happened. A failed or short write aborts the run: the error
    /// propagates and nothing is retried.
    pub fn push<W: Write>(&mut self, symbol: Complex<f64>, sink: &mut W) -> io::Result<bool> {
        // Invariant: the cursor always has room for one full symbol
        assert!(self.cursor + 2 <= OUTPUT_BLOCK_SIZE);

        self.block[self.cursor] = quantize(symbol.re * SYMBOL_SCALE) as u8;
        self.block[self.cursor + 1] = quantize(symbol.im * SYMBOL_SCALE) as u8;
        self.cursor += 2;

        if self.cursor == OUTPUT_BLOCK_SIZE {
            sink.write_all(&self.block)?;
            self.last_flushed.copy_from_slice(&self.block);
            self.cursor = 0;
            self.flushed_blocks += 1;
            return Ok(true);
        }

        Ok(false)
    }

    /// Number of complete blocks written to the sink.
    pub fn flushed_blocks(&self) -> u64 {
        self.flushed_blocks
    }

    /// Bytes accumulated in the current (unflushed) block.
    pub fn pending_bytes(&self) -> usize {
        self.cursor
    }

    /// Read-only view of the last flushed block.
    ///
    /// All zeros until the first flush.
    pub fn constellation(&self) -> &[u8; OUTPUT_BLOCK_SIZE] {
        &self.last_flushed
    }
}

impl Default for OutputFramer {
    fn default() -> Self {
        Self::new()
    }
}
