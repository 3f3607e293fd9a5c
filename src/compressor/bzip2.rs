use std::io::{Read, Write};

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression;

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// Bzip2 with block size `level` × 100k.
pub struct Bzip2Compressor {
    level: i32,
}

impl Bzip2Compressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Bzip2.check_level(level)?;
        Ok(Bzip2Compressor { level })
    }
}

impl Compressor for Bzip2Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = BzEncoder::new(Vec::with_capacity(data.len() / 2 + 64), Compression::new(self.level as u32));
        encoder
            .write_all(data)
            .map_err(|e| BenchError::codec("bzip2", e))?;
        encoder.finish().map_err(|e| BenchError::codec("bzip2", e))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = BzDecoder::new(data);
        let mut buffer = Vec::with_capacity(data.len() * 2);
        decoder
            .read_to_end(&mut buffer)
            .map_err(|e| BenchError::codec("bzip2", e))?;
        Ok(buffer)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Bzip2
    }

    fn level(&self) -> i32 {
        self.level
    }
}
