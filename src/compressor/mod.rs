//! Codec registry.
//!
//! Maps an algorithm identifier and a level onto a concrete [`Compressor`].
//! Level validation happens once, when the codec is built; a codec that
//! exists never fails because of its configuration.

pub mod brotli;
pub mod bzip2;
pub mod gzip;
pub mod lz4;
pub mod raw;
pub mod snappy;
pub mod xz;
pub mod zstd;

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{BenchError, Result};

use self::brotli::BrotliCompressor;
use self::bzip2::Bzip2Compressor;
use self::gzip::GzipCompressor;
use self::lz4::LZ4Compressor;
use self::raw::RawCompressor;
use self::snappy::SnappyCompressor;
use self::xz::XzCompressor;
use self::zstd::ZstdCompressor;

/// Stateless compress/decompress capability for one algorithm at one level.
pub trait Compressor: Send {
    /// Compresses `data` into a self-describing payload.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Restores the bytes produced by [`Compressor::compress`].
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    fn algorithm(&self) -> Algorithm;

    fn level(&self) -> i32;

    /// Returns the name of the compressor.
    fn name(&self) -> &str {
        self.algorithm().name()
    }
}

/// Every algorithm the registry knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Gzip,
    Zstd,
    ZstdDict,
    Lz4,
    Snappy,
    Xz,
    Brotli,
    Bzip2,
    Raw,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Gzip,
        Algorithm::Zstd,
        Algorithm::ZstdDict,
        Algorithm::Lz4,
        Algorithm::Snappy,
        Algorithm::Xz,
        Algorithm::Brotli,
        Algorithm::Bzip2,
        Algorithm::Raw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Gzip => "gzip",
            Algorithm::Zstd => "zstd",
            Algorithm::ZstdDict => "zstd-dict",
            Algorithm::Lz4 => "lz4",
            Algorithm::Snappy => "snappy",
            Algorithm::Xz => "xz",
            Algorithm::Brotli => "brotli",
            Algorithm::Bzip2 => "bzip2",
            Algorithm::Raw => "raw",
        }
    }

    /// Canonical file extension of the compressed artifact, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Algorithm::Gzip => "gz",
            Algorithm::Zstd | Algorithm::ZstdDict => "zst",
            Algorithm::Lz4 => "lz4",
            Algorithm::Snappy => "snappy",
            Algorithm::Xz => "xz",
            Algorithm::Brotli => "br",
            Algorithm::Bzip2 => "bz2",
            Algorithm::Raw => "raw",
        }
    }

    /// Levels accepted by this algorithm's constructor.
    pub fn levels(self) -> RangeInclusive<i32> {
        match self {
            Algorithm::Gzip | Algorithm::Zstd | Algorithm::ZstdDict => 1..=4,
            Algorithm::Lz4 | Algorithm::Xz => 0..=9,
            Algorithm::Snappy | Algorithm::Raw => 0..=0,
            Algorithm::Brotli => 1..=12,
            Algorithm::Bzip2 => 1..=9,
        }
    }

    pub fn uses_dictionary(self) -> bool {
        matches!(self, Algorithm::ZstdDict)
    }

    /// Fails with `InvalidConfiguration` when `level` is outside [`Algorithm::levels`].
    pub fn check_level(self, level: i32) -> Result<()> {
        let levels = self.levels();
        if levels.contains(&level) {
            Ok(())
        } else {
            Err(BenchError::invalid_config(
                self.name(),
                level,
                format!("level must be within {}..={}", levels.start(), levels.end()),
            ))
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gzip" => Ok(Algorithm::Gzip),
            "zstd" => Ok(Algorithm::Zstd),
            "zstd-dict" | "zstdD" => Ok(Algorithm::ZstdDict),
            "lz4" => Ok(Algorithm::Lz4),
            "snappy" => Ok(Algorithm::Snappy),
            "xz" => Ok(Algorithm::Xz),
            "brotli" => Ok(Algorithm::Brotli),
            "bzip2" => Ok(Algorithm::Bzip2),
            "raw" => Ok(Algorithm::Raw),
            other => Err(BenchError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Side data keyed by the algorithm that consumes it.
pub type Dictionaries = FxHashMap<Algorithm, Arc<[u8]>>;

/// (algorithm, level, optional dictionary) before it is turned into a codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub algorithm: Algorithm,
    pub level: i32,
    pub dictionary: Option<Arc<[u8]>>,
}

impl CodecConfig {
    pub fn new(algorithm: Algorithm, level: i32) -> Self {
        CodecConfig {
            algorithm,
            level,
            dictionary: None,
        }
    }

    pub fn with_dictionary(mut self, dictionary: Arc<[u8]>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Looks up `name` and attaches the dictionary registered for it, if any.
    pub fn resolve(name: &str, level: i32, dictionaries: &Dictionaries) -> Result<Self> {
        let algorithm: Algorithm = name.parse()?;
        let config = CodecConfig::new(algorithm, level);
        Ok(match dictionaries.get(&algorithm) {
            Some(dictionary) => config.with_dictionary(Arc::clone(dictionary)),
            None => config,
        })
    }

    /// Builds the codec, validating the level and any required side data.
    pub fn build(&self) -> Result<Box<dyn Compressor>> {
        let level = self.level;
        Ok(match self.algorithm {
            Algorithm::Gzip => Box::new(GzipCompressor::new(level)?),
            Algorithm::Zstd => Box::new(ZstdCompressor::new(level)?),
            Algorithm::ZstdDict => {
                let dictionary = self.dictionary.clone().ok_or_else(|| {
                    BenchError::invalid_config(
                        self.algorithm.name(),
                        level,
                        "a dictionary is required (pass --zstd-dict)",
                    )
                })?;
                Box::new(ZstdCompressor::with_dictionary(level, dictionary)?)
            }
            Algorithm::Lz4 => Box::new(LZ4Compressor::new(level)?),
            Algorithm::Snappy => Box::new(SnappyCompressor::new(level)?),
            Algorithm::Xz => Box::new(XzCompressor::new(level)?),
            Algorithm::Brotli => Box::new(BrotliCompressor::new(level)?),
            Algorithm::Bzip2 => Box::new(Bzip2Compressor::new(level)?),
            Algorithm::Raw => Box::new(RawCompressor::new(level)?),
        })
    }
}
