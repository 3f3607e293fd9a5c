use snap::raw::{Decoder, Encoder};

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// Snappy raw block format. Single tier.
pub struct SnappyCompressor;

impl SnappyCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Snappy.check_level(level)?;
        Ok(SnappyCompressor)
    }
}

impl Compressor for SnappyCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Encoder::new()
            .compress_vec(data)
            .map_err(|e| BenchError::codec("snappy", e))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Decoder::new()
            .decompress_vec(data)
            .map_err(|e| BenchError::codec("snappy", e))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Snappy
    }

    fn level(&self) -> i32 {
        0
    }
}
