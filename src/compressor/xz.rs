use std::io::{Read, Write};

use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// XZ (LZMA2) at preset `level`.
pub struct XzCompressor {
    level: i32,
}

impl XzCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Xz.check_level(level)?;
        Ok(XzCompressor { level })
    }
}

impl Compressor for XzCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = XzEncoder::new(Vec::with_capacity(data.len() / 2 + 64), self.level as u32);
        encoder.write_all(data).map_err(|e| BenchError::codec("xz", e))?;
        encoder.finish().map_err(|e| BenchError::codec("xz", e))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = XzDecoder::new(data);
        let mut buffer = Vec::with_capacity(data.len() * 2);
        decoder
            .read_to_end(&mut buffer)
            .map_err(|e| BenchError::codec("xz", e))?;
        Ok(buffer)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Xz
    }

    fn level(&self) -> i32 {
        self.level
    }
}
