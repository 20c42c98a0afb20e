//! I/Q Sample Reading Module
//!
//! This module reads blocks of complex baseband samples from a byte stream
//! (typically a headerless capture file). The reader is synchronous and
//! block-oriented: each call yields up to `chunk_size` samples, a short
//! final read yields one partial block, and a zero-length read signals
//! end of stream.

use std::io::Read;
use std::path::{Path, PathBuf};

use num_complex::Complex;

use crate::IqFormat;

/**
 * I/Q Data Source Configuration
 */
pub struct IqConfig {
    pub iq_format: IqFormat,
    pub sample_rate: u32,
    pub chunk_size: usize,
}

impl IqConfig {
    pub fn new(sample_rate: u32, chunk_size: usize, iq_format: IqFormat) -> Self {
        Self {
            iq_format,
            sample_rate,
            chunk_size,
        }
    }
}

/**
 * Synchronous I/Q Reader
 */
pub struct IqReader<R: Read> {
    config: IqConfig,
    reader: R,
}

impl IqReader<std::io::BufReader<std::fs::File>> {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        sample_rate: u32,
        chunk_size: usize,
        iq_format: IqFormat,
    ) -> Result<Self, std::io::Error> {
        let path = expanduser(path.as_ref().to_path_buf());
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config = IqConfig::new(sample_rate, chunk_size, iq_format);
        Ok(Self { config, reader })
    }
}

impl<R: Read> IqReader<R> {
    /// Wrap an arbitrary byte reader (stdin, an in-memory buffer in tests).
    pub fn new(reader: R, sample_rate: u32, chunk_size: usize, iq_format: IqFormat) -> Self {
        let config = IqConfig::new(sample_rate, chunk_size, iq_format);
        Self { config, reader }
    }

    /// Sample rate of the source in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Read one block of samples.
    ///
    /// Returns an empty vector at end of stream. A short read at the tail of
    /// the stream is returned as a partial block; the reader keeps pulling
    /// from the underlying source until the block is full or the source is
    /// exhausted, so a block never ends mid-sample unless the stream itself
    /// is truncated (trailing fractional samples are discarded).
    fn read_samples(&mut self) -> Result<Vec<Complex<f32>>, std::io::Error> {
        let bytes_per_sample = self.config.iq_format.bytes_per_sample();
        let mut buffer = vec![0u8; self.config.chunk_size * bytes_per_sample];
        let mut total_read = 0;

        while total_read < buffer.len() {
            match self.reader.read(&mut buffer[total_read..]) {
                Ok(0) => break,
                Ok(n) => total_read += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        buffer.truncate(total_read);
        Ok(crate::convert_bytes_to_complex(self.config.iq_format, &buffer))
    }
}

impl<R: Read> Iterator for IqReader<R> {
    type Item = Result<Vec<Complex<f32>>, std::io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_samples() {
            Ok(samples) if samples.is_empty() => None,
            Ok(samples) => Some(Ok(samples)),
            Err(e) => Some(Err(e)),
        }
    }
}

fn expanduser(path: PathBuf) -> PathBuf {
    // Check if the path starts with "~"
    if let Some(stripped) = path.to_str().and_then(|p| p.strip_prefix('~')) {
        if let Some(home_dir) = dirs::home_dir() {
            // Join the home directory with the rest of the path
            return home_dir.join(stripped.trim_start_matches('/'));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cf32_bytes(samples: &[(f32, f32)]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(samples.len() * 8);
        for &(i, q) in samples {
            bytes.extend_from_slice(&i.to_le_bytes());
            bytes.extend_from_slice(&q.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_full_block_then_eof() {
        let bytes = cf32_bytes(&[(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)]);
        let mut reader = IqReader::new(Cursor::new(bytes), 140_000, 4, IqFormat::Cf32);

        let block = reader.next().expect("one block").expect("read ok");
        assert_eq!(block.len(), 4);
        assert_eq!(block[0], Complex::new(1.0, 0.0));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_partial_final_block() {
        // 6 samples with a chunk size of 4: one full block, one partial block
        let samples: Vec<(f32, f32)> = (0..6).map(|n| (n as f32, -(n as f32))).collect();
        let mut reader = IqReader::new(
            Cursor::new(cf32_bytes(&samples)),
            140_000,
            4,
            IqFormat::Cf32,
        );

        assert_eq!(reader.next().unwrap().unwrap().len(), 4);
        let tail = reader.next().unwrap().unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[1], Complex::new(5.0, -5.0));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_sample_rate_reported() {
        let reader = IqReader::new(Cursor::new(Vec::new()), 140_000, 1024, IqFormat::Cf32);
        assert_eq!(reader.sample_rate(), 140_000);
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = IqReader::new(Cursor::new(Vec::new()), 140_000, 1024, IqFormat::Cf32);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_truncated_sample_discarded() {
        // 1 full sample plus 3 stray bytes
        let mut bytes = cf32_bytes(&[(0.5, 0.5)]);
        bytes.extend_from_slice(&[0, 0, 0]);
        let mut reader = IqReader::new(Cursor::new(bytes), 140_000, 4, IqFormat::Cf32);

        let block = reader.next().unwrap().unwrap();
        assert_eq!(block.len(), 1);
        assert!(reader.next().is_none());
    }
}
