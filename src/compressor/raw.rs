//! Raw (uncompressed) baseline implementation
//!
//! Provides a no-compression baseline for performance comparison. The
//! "compressed" payload is a plain copy of the input, so its timings show the
//! cost of the harness itself: allocation, persistence and re-reading.

use super::{Algorithm, Compressor};
use crate::error::Result;

/// Baseline compressor that stores data without compression
pub struct RawCompressor;

impl RawCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Raw.check_level(level)?;
        Ok(RawCompressor)
    }
}

impl Compressor for RawCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Raw
    }

    fn level(&self) -> i32 {
        0
    }
}
