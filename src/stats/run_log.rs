use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::benchmark::EpochResult;
use crate::dataset::Dataset;
use crate::error::Result;

const SEPARATOR: &str = "----------------------------------------";

/// Human-readable trace of one (algorithm, level) run.
pub struct RunLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl RunLog {
    pub fn file_name(algorithm: &str, level: i32) -> String {
        format!("benchmark_{}_level_{}.log", algorithm, level)
    }

    /// Creates `<dir>/benchmark_<algorithm>_level_<level>.log`, truncating any previous log.
    pub fn create<P: AsRef<Path>>(dir: P, algorithm: &str, level: i32) -> Result<Self> {
        let path = dir.as_ref().join(Self::file_name(algorithm, level));
        let file = File::create(&path)?;
        Ok(RunLog {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&mut self, algorithm: &str, level: i32, dataset: &Dataset, epochs: u32) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Compression Algorithm: {}", algorithm)?;
        writeln!(w, "Compression Level: {}", level)?;
        writeln!(w, "Number of Source Files: {}", dataset.len())?;
        writeln!(w, "Epochs: {}", epochs)?;
        writeln!(w, "{}", SEPARATOR)?;
        for (name, data) in dataset.iter() {
            writeln!(w, "File: {}, Size: {} bytes", name, data.len())?;
        }
        writeln!(w, "{}", SEPARATOR)?;
        Ok(())
    }

    pub fn compressed(&mut self, epoch: u32, file: &str, size: usize, elapsed: Duration) -> Result<()> {
        writeln!(
            self.writer,
            "Epoch {}, Compressed {}: Size={} bytes, Time={:?}",
            epoch, file, size, elapsed
        )?;
        Ok(())
    }

    pub fn decompressed(&mut self, epoch: u32, file: &str, elapsed: Duration) -> Result<()> {
        writeln!(self.writer, "Epoch {}, Decompressed {}: Time={:?}", epoch, file, elapsed)?;
        Ok(())
    }

    pub fn failed(&mut self, epoch: u32, stage: &str, file: &str, reason: &dyn std::fmt::Display) -> Result<()> {
        writeln!(self.writer, "Epoch {}, Failed to {} {}: {}", epoch, stage, file, reason)?;
        Ok(())
    }

    pub fn epoch_summary(&mut self, result: &EpochResult) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Epoch {} Summary:", result.epoch)?;
        writeln!(w, "  Files Compressed: {}", result.files_compressed)?;
        writeln!(w, "  Files Decompressed: {}", result.files_decompressed)?;
        writeln!(w, "  Compression Time: {:?}", result.compression_time)?;
        writeln!(w, "  Decompression Time: {:?}", result.decompression_time)?;
        writeln!(w, "  Compression Ratio: {:.2}%", result.compression_ratio)?;
        writeln!(w, "{}", SEPARATOR)?;
        Ok(())
    }

    pub fn overall_summary(
        &mut self,
        average_compression_time: Duration,
        average_decompression_time: Duration,
        compression_ratio: f64,
    ) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "Overall Summary:")?;
        writeln!(w, "  Average Compression Time: {:?}", average_compression_time)?;
        writeln!(w, "  Average Decompression Time: {:?}", average_decompression_time)?;
        writeln!(w, "  Average Compression Ratio: {:.2}%", compression_ratio)?;
        Ok(())
    }

    /// Flushes buffered lines to disk.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_log_layout() {
        let dir = tempdir().unwrap();
        let dataset = Dataset::from_entries([("a.json", vec![b'a'; 100])]);

        let mut log = RunLog::create(dir.path(), "gzip", 2).unwrap();
        log.header("gzip", 2, &dataset, 1).unwrap();
        log.compressed(1, "a.json", 20, Duration::from_micros(150)).unwrap();
        log.decompressed(1, "a.gz", Duration::from_micros(40)).unwrap();
        log.epoch_summary(&EpochResult {
            epoch: 1,
            compression_time: Duration::from_micros(150),
            decompression_time: Duration::from_micros(40),
            compressed_size: 20,
            files_compressed: 1,
            files_decompressed: 1,
            compression_ratio: 20.0,
        })
        .unwrap();
        log.overall_summary(Duration::from_micros(150), Duration::from_micros(40), 20.0)
            .unwrap();
        let path = log.path().to_path_buf();
        log.finish().unwrap();

        assert_eq!(path.file_name().unwrap(), "benchmark_gzip_level_2.log");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Compression Algorithm: gzip\nCompression Level: 2\n"));
        assert!(content.contains("Number of Source Files: 1\n"));
        assert!(content.contains("File: a.json, Size: 100 bytes\n"));
        assert!(content.contains("Epoch 1, Compressed a.json: Size=20 bytes, Time=150µs\n"));
        assert!(content.contains("Epoch 1 Summary:\n  Files Compressed: 1\n  Files Decompressed: 1\n"));
        assert!(content.contains("  Compression Ratio: 20.00%\n"));
        assert!(content.ends_with("  Average Compression Ratio: 20.00%\n"));
    }
}
