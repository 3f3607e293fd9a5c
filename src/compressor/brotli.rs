use std::io::{Read, Write};

use brotli::{CompressorWriter, Decompressor};

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

const BUFFER_SIZE: usize = 4096;
const LG_WINDOW_SIZE: u32 = 22;

/// Brotli with levels 1 (fastest) through 12 (best), mapped onto quality 0..=11.
pub struct BrotliCompressor {
    level: i32,
}

impl BrotliCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Brotli.check_level(level)?;
        Ok(BrotliCompressor { level })
    }

    fn quality(&self) -> u32 {
        (self.level - 1) as u32
    }
}

impl Compressor for BrotliCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut compressed = Vec::with_capacity(data.len() / 2 + 64);
        {
            // The stream is finalized when the writer is dropped
            let mut encoder = CompressorWriter::new(&mut compressed, BUFFER_SIZE, self.quality(), LG_WINDOW_SIZE);
            encoder
                .write_all(data)
                .map_err(|e| BenchError::codec("brotli", e))?;
        }
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = Decompressor::new(data, BUFFER_SIZE);
        let mut buffer = Vec::with_capacity(data.len() * 2);
        decoder
            .read_to_end(&mut buffer)
            .map_err(|e| BenchError::codec("brotli", e))?;
        Ok(buffer)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Brotli
    }

    fn level(&self) -> i32 {
        self.level
    }
}
