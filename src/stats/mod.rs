//! Durable record of every measurement.
//!
//! Each run emits one [`StatsRecord`] per epoch plus one averaged record.
//! Records go to a [`StatsSink`]; the shared [`SummaryTable`] is the sink the
//! driver uses, while [`RunLog`] keeps the human-readable trace of a single run.

mod run_log;
mod summary;

pub use run_log::RunLog;
pub use summary::{SummaryTable, SUMMARY_FILE_NAME, SUMMARY_HEADER};

use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// Which row of a run a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochLabel {
    Epoch(u32),
    Average,
}

impl fmt::Display for EpochLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochLabel::Epoch(epoch) => write!(f, "{}", epoch),
            EpochLabel::Average => f.write_str("average"),
        }
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRecord {
    pub algorithm: String,
    pub level: i32,
    pub epoch: EpochLabel,
    pub compression_time_ms: f64,
    pub decompression_time_ms: f64,
    pub compression_ratio: f64,
}

impl StatsRecord {
    pub fn new(
        algorithm: &str,
        level: i32,
        epoch: EpochLabel,
        compression_time: Duration,
        decompression_time: Duration,
        compression_ratio: f64,
    ) -> Self {
        StatsRecord {
            algorithm: algorithm.to_string(),
            level,
            epoch,
            compression_time_ms: as_millis(compression_time),
            decompression_time_ms: as_millis(decompression_time),
            compression_ratio,
        }
    }

    /// Fields in summary-table column order, numbers with two decimals.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.algorithm.clone(),
            self.level.to_string(),
            self.epoch.to_string(),
            format!("{:.2}", self.compression_time_ms),
            format!("{:.2}", self.decompression_time_ms),
            format!("{:.2}", self.compression_ratio),
        ]
    }
}

/// Fractional milliseconds.
pub fn as_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// `compressed / original * 100`; zero for an empty corpus.
pub fn compression_ratio(compressed_size: u64, original_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    compressed_size as f64 / original_size as f64 * 100.0
}

/// Append-only destination for stats records.
pub trait StatsSink {
    fn record(&mut self, record: &StatsRecord) -> Result<()>;
}

impl StatsSink for Vec<StatsRecord> {
    fn record(&mut self, record: &StatsRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn record(&mut self, record: &StatsRecord) -> Result<()> {
        (**self).record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_formatting() {
        let record = StatsRecord::new(
            "zstd",
            3,
            EpochLabel::Epoch(2),
            Duration::from_micros(1_234_567),
            Duration::from_micros(89),
            41.237,
        );
        assert_eq!(record.to_row(), ["zstd", "3", "2", "1234.57", "0.09", "41.24"]);

        let average = StatsRecord { epoch: EpochLabel::Average, ..record };
        assert_eq!(average.to_row()[2], "average");
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(50, 200), 25.0);
        assert_eq!(compression_ratio(300, 200), 150.0);
        assert_eq!(compression_ratio(10, 0), 0.0);
    }
}
