//! Test helper utilities for generating synthetic baseband captures

use std::f64::consts::{FRAC_1_SQRT_2, TAU};

/// Deterministic 2-bit symbol source (xorshift64).
///
/// # Arguments
/// * `count` - Number of QPSK symbols
/// * `seed` - Generator seed (non-zero)
///
/// # Returns
/// Vector of (I, Q) constellation points from {±1/√2 ± i/√2}
pub fn generate_qpsk_symbols(count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut state = seed;
    let mut symbols = Vec::with_capacity(count);
    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let i = if state & 1 == 0 { FRAC_1_SQRT_2 } else { -FRAC_1_SQRT_2 };
        let q = if state & 2 == 0 { FRAC_1_SQRT_2 } else { -FRAC_1_SQRT_2 };
        symbols.push((i, q));
    }
    symbols
}

/// Modulate QPSK symbols onto a baseband capture (Cf32 format).
///
/// Rectangular pulse shaping: each symbol is held for `samples_per_symbol`
/// consecutive samples, then the whole stream is rotated by the carrier
/// offset.
///
/// # Returns
/// Interleaved little-endian f32 (I, Q) bytes
pub fn generate_qpsk_cf32(
    symbols: &[(f64, f64)],
    samples_per_symbol: usize,
    offset_hz: f64,
    sample_rate: f64,
) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(symbols.len() * samples_per_symbol * 8);
    let step = TAU * offset_hz / sample_rate;
    let mut n = 0usize;

    for &(si, sq) in symbols {
        for _ in 0..samples_per_symbol {
            let phase = step * n as f64;
            let (sin, cos) = phase.sin_cos();
            let i = si * cos - sq * sin;
            let q = si * sin + sq * cos;
            buffer.extend_from_slice(&(i as f32).to_le_bytes());
            buffer.extend_from_slice(&(q as f32).to_le_bytes());
            n += 1;
        }
    }

    buffer
}

/// Generate an unmodulated complex carrier at a fixed offset (Cf32 format).
pub fn generate_carrier_cf32(offset_hz: f64, sample_rate: f64, num_samples: usize) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(num_samples * 8);
    let step = TAU * offset_hz / sample_rate;

    for n in 0..num_samples {
        let phase = step * n as f64;
        buffer.extend_from_slice(&(phase.cos() as f32).to_le_bytes());
        buffer.extend_from_slice(&(phase.sin() as f32).to_le_bytes());
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qpsk_symbols_are_deterministic() {
        let a = generate_qpsk_symbols(64, 42);
        let b = generate_qpsk_symbols(64, 42);
        assert_eq!(a, b);
        let c = generate_qpsk_symbols(64, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn test_qpsk_symbols_unit_magnitude() {
        for (i, q) in generate_qpsk_symbols(32, 7) {
            assert!(((i * i + q * q) - 1.0f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_qpsk_cf32_length() {
        let symbols = generate_qpsk_symbols(10, 1);
        let bytes = generate_qpsk_cf32(&symbols, 2, 0.0, 144_000.0);
        assert_eq!(bytes.len(), 10 * 2 * 8);
    }

    #[test]
    fn test_carrier_cf32_starts_at_one() {
        let bytes = generate_carrier_cf32(50.0, 140_000.0, 4);
        let i0 = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let q0 = f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert!((i0 - 1.0).abs() < 1e-6);
        assert!(q0.abs() < 1e-6);
    }
}
