//! Error types shared by every stage of the harness.
//!
//! Errors fall into three groups that callers treat differently:
//! configuration errors skip one (algorithm, level) pair, setup errors stop
//! the whole process, and codec/I/O errors on a single file are logged and
//! absorbed by the runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// Algorithm name not present in the codec registry
    #[error("unsupported compression algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// A codec or runner was asked for something it cannot do
    #[error("invalid configuration for {algorithm} level {level}: {reason}")]
    InvalidConfiguration {
        algorithm: String,
        level: i32,
        reason: String,
    },

    /// Harness-wide settings that no run could satisfy
    #[error("invalid configuration: {0}")]
    InvalidSettings(String),

    /// Every epoch of a run was aborted before producing a row
    #[error("{algorithm} level {level} completed no epoch")]
    NoCompletedEpoch { algorithm: String, level: i32 },

    /// Input discovery, work directory or stats file could not be prepared
    #[error("setup failed for {}: {reason}", path.display())]
    Setup { path: PathBuf, reason: String },

    /// A codec rejected its input
    #[error("{codec} failed: {message}")]
    Codec { codec: &'static str, message: String },

    /// Decompressed bytes differ from the original file
    #[error("{codec} round-trip mismatch for {file}: expected {expected} bytes, got {actual}")]
    RoundTripMismatch {
        codec: &'static str,
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    pub fn invalid_config(algorithm: impl Into<String>, level: i32, reason: impl Into<String>) -> Self {
        BenchError::InvalidConfiguration {
            algorithm: algorithm.into(),
            level,
            reason: reason.into(),
        }
    }

    pub fn setup(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BenchError::Setup {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn codec(codec: &'static str, err: impl ToString) -> Self {
        BenchError::Codec {
            codec,
            message: err.to_string(),
        }
    }

    /// True for errors that only disqualify a single (algorithm, level) pair.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BenchError::UnsupportedAlgorithm(_)
                | BenchError::InvalidConfiguration { .. }
                | BenchError::InvalidSettings(_)
        )
    }

    /// True for errors that must stop the whole process.
    pub fn is_setup(&self) -> bool {
        matches!(self, BenchError::Setup { .. })
    }
}
