use lz4::block::{self, CompressionMode};

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// LZ4 block format with the uncompressed size prepended.
///
/// Level 0 uses the default fast mode; levels 1 through 9 use the
/// high-compression encoder at that level.
pub struct LZ4Compressor {
    level: i32,
}

impl LZ4Compressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Lz4.check_level(level)?;
        Ok(LZ4Compressor { level })
    }

    fn mode(&self) -> Option<CompressionMode> {
        match self.level {
            0 => None,
            level => Some(CompressionMode::HIGHCOMPRESSION(level)),
        }
    }
}

impl Compressor for LZ4Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        // The block API addresses sizes with i32
        if data.len() > i32::MAX as usize {
            return Err(BenchError::codec("lz4", format!("input of {} bytes exceeds the block limit", data.len())));
        }
        block::compress(data, self.mode(), true).map_err(|e| BenchError::codec("lz4", e))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        block::decompress(data, None).map_err(|e| BenchError::codec("lz4", e))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Lz4
    }

    fn level(&self) -> i32 {
        self.level
    }
}
