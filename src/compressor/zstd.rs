use std::io::{BufReader, Read, Write};
use std::sync::Arc;

use super::{Algorithm, Compressor};
use crate::error::{BenchError, Result};

/// Zstandard on a four-tier scale, optionally primed with a shared dictionary.
pub struct ZstdCompressor {
    level: i32,
    zstd_level: i32,                    // Native zstd level the tier maps to
    dictionary: Option<Arc<[u8]>>,      // Raw dictionary bytes, shared across codecs
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Result<Self> {
        Algorithm::Zstd.check_level(level)?;
        Ok(ZstdCompressor {
            level,
            zstd_level: native_level(level),
            dictionary: None,
        })
    }

    pub fn with_dictionary(level: i32, dictionary: Arc<[u8]>) -> Result<Self> {
        Algorithm::ZstdDict.check_level(level)?;
        if dictionary.is_empty() {
            return Err(BenchError::invalid_config(
                Algorithm::ZstdDict.name(),
                level,
                "dictionary is empty",
            ));
        }
        Ok(ZstdCompressor {
            level,
            zstd_level: native_level(level),
            dictionary: Some(dictionary),
        })
    }
}

/// fastest, default, better, best
fn native_level(tier: i32) -> i32 {
    match tier {
        1 => 1,
        2 => zstd::DEFAULT_COMPRESSION_LEVEL,
        3 => 7,
        _ => 11,
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.dictionary {
            None => zstd::bulk::compress(data, self.zstd_level).map_err(|e| BenchError::codec("zstd", e)),
            Some(dictionary) => {
                let mut encoder = zstd::stream::Encoder::with_dictionary(Vec::new(), self.zstd_level, dictionary)
                    .map_err(|e| BenchError::codec("zstd", e))?;
                encoder
                    .write_all(data)
                    .map_err(|e| BenchError::codec("zstd", e))?;
                encoder.finish().map_err(|e| BenchError::codec("zstd", e))
            }
        }
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match &self.dictionary {
            None => zstd::decode_all(data).map_err(|e| BenchError::codec("zstd", e)),
            Some(dictionary) => {
                let mut decoder = zstd::stream::Decoder::with_dictionary(BufReader::new(data), dictionary)
                    .map_err(|e| BenchError::codec("zstd", e))?;
                let mut buffer = Vec::with_capacity(data.len() * 2);
                decoder
                    .read_to_end(&mut buffer)
                    .map_err(|e| BenchError::codec("zstd", e))?;
                Ok(buffer)
            }
        }
    }

    fn algorithm(&self) -> Algorithm {
        if self.dictionary.is_some() {
            Algorithm::ZstdDict
        } else {
            Algorithm::Zstd
        }
    }

    fn level(&self) -> i32 {
        self.level
    }
}
