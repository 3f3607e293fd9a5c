use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};

use super::{StatsRecord, StatsSink};

pub const SUMMARY_FILE_NAME: &str = "benchmark_stats.csv";

pub const SUMMARY_HEADER: [&str; 6] = [
    "Algorithm",
    "Level",
    "Epoch",
    "CompressionTime(ms)",
    "DecompressionTime(ms)",
    "CompressionRatio(%)",
];

/// The machine-readable table shared by every run of an invocation.
///
/// Rows are flushed as soon as they are recorded, so an interrupted
/// invocation still leaves every row it emitted.
pub struct SummaryTable {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl SummaryTable {
    /// Creates `<dir>/benchmark_stats.csv` and writes the header row.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(SUMMARY_FILE_NAME);
        let file = File::create(&path).map_err(|e| BenchError::setup(&path, e))?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(SUMMARY_HEADER)
            .map_err(|e| BenchError::setup(&path, e))?;
        writer.flush().map_err(|e| BenchError::setup(&path, e))?;

        Ok(SummaryTable { writer, path, rows: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl StatsSink for SummaryTable {
    fn record(&mut self, record: &StatsRecord) -> Result<()> {
        self.writer.write_record(record.to_row())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
