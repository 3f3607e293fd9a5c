use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// Gzip on a four-tier scale.
///
/// | tier | flate2 level       |
/// |------|--------------------|
/// | 1    | fastest (1)        |
/// | 2    | default (6)        |
/// | 3    | best (9)           |
/// | 4    | stored blocks (0)  |
pub struct GzipCompressor {
    level: i32,
    compression: Compression,
}

impl GzipCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Gzip.check_level(level)?;
        let compression = match level {
            1 => Compression::fast(),
            2 => Compression::default(),
            3 => Compression::best(),
            _ => Compression::none(),
        };
        Ok(GzipCompressor { level, compression })
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 64), self.compression);
        encoder
            .write_all(data)
            .map_err(|e| BenchError::codec("gzip", e))?;
        encoder.finish().map_err(|e| BenchError::codec("gzip", e))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut buffer = Vec::with_capacity(data.len() * 2);
        decoder
            .read_to_end(&mut buffer)
            .map_err(|e| BenchError::codec("gzip", e))?;
        Ok(buffer)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Gzip
    }

    fn level(&self) -> i32 {
        self.level
    }
}
