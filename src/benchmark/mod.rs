use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::compressor::{CodecConfig, Compressor};
use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::stats::{as_millis, compression_ratio, EpochLabel, RunLog, StatsRecord, StatsSink};

/// Struct to hold the averaged results of one (algorithm, level) run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    pub algorithm: String,
    pub level: i32,
    /// Epochs that completed and were averaged
    pub epochs: u32,
    pub files: usize,
    pub total_original_size: u64,
    /// Compressed size of the last completed epoch
    pub compressed_size: u64,
    pub average_compression_time_ms: f64,
    pub average_decompression_time_ms: f64,
    pub compression_ratio: f64,
    /// MB/s over the whole dataset
    pub compression_speed: f64,
    pub decompression_speed: f64,
}

/// Measurements of one compress/persist/decompress pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochResult {
    pub epoch: u32,
    pub compression_time: Duration,
    pub decompression_time: Duration,
    pub compressed_size: u64,
    pub files_compressed: usize,
    pub files_decompressed: usize,
    pub compression_ratio: f64,
}

/// Drives every epoch of one codec over a dataset.
pub struct BenchmarkRunner<'a> {
    compressor: Box<dyn Compressor>,
    dataset: &'a Dataset,
    epochs: u32,
    work_dir: PathBuf,
}

impl<'a> BenchmarkRunner<'a> {
    /// Builds the codec for `codec`; fails on configuration errors and on a zero epoch count.
    pub fn new<P: AsRef<Path>>(codec: &CodecConfig, dataset: &'a Dataset, epochs: u32, work_dir: P) -> Result<Self> {
        if epochs == 0 {
            return Err(BenchError::invalid_config(
                codec.algorithm.name(),
                codec.level,
                "epoch count must be at least 1",
            ));
        }
        let compressor = codec.build()?;
        Ok(Self::with_compressor(compressor, dataset, epochs, work_dir))
    }

    pub fn with_compressor<P: AsRef<Path>>(
        compressor: Box<dyn Compressor>,
        dataset: &'a Dataset,
        epochs: u32,
        work_dir: P,
    ) -> Self {
        BenchmarkRunner {
            compressor,
            dataset,
            epochs,
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    pub fn algorithm(&self) -> &str {
        self.compressor.name()
    }

    pub fn level(&self) -> i32 {
        self.compressor.level()
    }

    /// `<work_dir>/benchmark_<algorithm>/<epoch>/compress`
    pub fn epoch_dir(&self, epoch: u32) -> PathBuf {
        self.work_dir
            .join(format!("benchmark_{}", self.algorithm()))
            .join(epoch.to_string())
            .join("compress")
    }

    /// Runs all epochs, emitting one record per completed epoch and a final average record.
    pub fn run(&self, sink: &mut dyn StatsSink) -> Result<BenchmarkResult> {
        if self.epochs == 0 {
            return Err(BenchError::invalid_config(
                self.algorithm(),
                self.level(),
                "epoch count must be at least 1",
            ));
        }
        let algorithm = self.algorithm();
        let level = self.level();

        let mut log = RunLog::create(&self.work_dir, algorithm, level)?;
        log.header(algorithm, level, self.dataset, self.epochs)?;
        info!(
            "Benchmarking {} level {} on {} files ({} epochs)",
            algorithm,
            level,
            self.dataset.len(),
            self.epochs
        );
        let artifacts = self.artifact_names();

        let mut completed: Vec<EpochResult> = Vec::with_capacity(self.epochs as usize);
        for epoch in 1..=self.epochs {
            let dir = self.epoch_dir(epoch);
            if let Err(e) = fs::create_dir_all(&dir) {
                warn!("Epoch {}: cannot create {}: {}", epoch, dir.display(), e);
                log.failed(epoch, "create", &dir.display().to_string(), &e)?;
                continue;
            }

            let result = self.run_epoch(epoch, &dir, &artifacts, &mut log)?;
            if result.files_compressed == 0 {
                warn!("Epoch {}: no file compressed", epoch);
            }
            log.epoch_summary(&result)?;
            sink.record(&StatsRecord::new(
                algorithm,
                level,
                EpochLabel::Epoch(epoch),
                result.compression_time,
                result.decompression_time,
                result.compression_ratio,
            ))?;
            info!(
                "Epoch {}: compressed in {:?}, decompressed in {:?}, ratio {:.2}%",
                epoch, result.compression_time, result.decompression_time, result.compression_ratio
            );
            completed.push(result);
        }

        let last = match completed.last() {
            Some(last) => last,
            None => {
                log.finish()?;
                return Err(BenchError::NoCompletedEpoch {
                    algorithm: algorithm.to_string(),
                    level,
                });
            }
        };

        let count = completed.len() as u32;
        let average_compression_time = completed.iter().map(|e| e.compression_time).sum::<Duration>() / count;
        let average_decompression_time = completed.iter().map(|e| e.decompression_time).sum::<Duration>() / count;

        sink.record(&StatsRecord::new(
            algorithm,
            level,
            EpochLabel::Average,
            average_compression_time,
            average_decompression_time,
            last.compression_ratio,
        ))?;
        log.overall_summary(average_compression_time, average_decompression_time, last.compression_ratio)?;
        debug!("Run log written to {}", log.path().display());
        log.finish()?;

        let total = self.dataset.total_original_size();
        Ok(BenchmarkResult {
            algorithm: algorithm.to_string(),
            level,
            epochs: count,
            files: self.dataset.len(),
            total_original_size: total,
            compressed_size: last.compressed_size,
            average_compression_time_ms: as_millis(average_compression_time),
            average_decompression_time_ms: as_millis(average_decompression_time),
            compression_ratio: last.compression_ratio,
            compression_speed: throughput(total, average_compression_time),
            decompression_speed: throughput(total, average_decompression_time),
        })
    }

    /// Artifact file name for each dataset entry, in dataset order.
    ///
    /// Names swap the input extension for the codec's; if that maps two
    /// inputs (`a.json`, `a.txt`) onto one name, every artifact keeps its
    /// full input name instead (`a.json.raw`).
    pub fn artifact_names(&self) -> Vec<String> {
        let extension = self.compressor.algorithm().extension();
        let short: Vec<String> = self
            .dataset
            .iter()
            .map(|(name, _)| output_file_name(name, extension))
            .collect();
        let distinct: FxHashSet<&str> = short.iter().map(String::as_str).collect();
        if distinct.len() == short.len() {
            return short;
        }

        warn!("Input names collide once their extensions are replaced; keeping full names for artifacts");
        self.dataset
            .iter()
            .map(|(name, _)| format!("{}.{}", name, extension))
            .collect()
    }

    fn run_epoch(&self, epoch: u32, dir: &Path, artifacts: &[String], log: &mut RunLog) -> Result<EpochResult> {
        // === Compression ===
        let mut compression_time = Duration::ZERO;
        let mut compressed_size = 0u64;
        let mut payloads: Vec<(&str, &str, Vec<u8>)> = Vec::with_capacity(self.dataset.len());
        for ((name, data), artifact) in self.dataset.iter().zip(artifacts) {
            let start = Instant::now();
            let result = self.compressor.compress(data);
            let elapsed = start.elapsed();
            match result {
                Ok(payload) => {
                    compression_time += elapsed;
                    compressed_size += payload.len() as u64;
                    debug!("Epoch {}, compressed {}: {} -> {} bytes in {:?}", epoch, name, data.len(), payload.len(), elapsed);
                    log.compressed(epoch, name, payload.len(), elapsed)?;
                    payloads.push((name, artifact.as_str(), payload));
                }
                Err(e) => {
                    warn!("Epoch {}: failed to compress {}: {}", epoch, name, e);
                    log.failed(epoch, "compress", name, &e)?;
                }
            }
        }
        let files_compressed = payloads.len();

        // === Persist ===
        let mut persisted: Vec<(&str, &str, PathBuf)> = Vec::with_capacity(payloads.len());
        for (name, artifact, payload) in payloads {
            let path = dir.join(artifact);
            match fs::write(&path, &payload) {
                Ok(()) => persisted.push((name, artifact, path)),
                Err(e) => {
                    warn!("Epoch {}: failed to write {}: {}", epoch, path.display(), e);
                    log.failed(epoch, "write", name, &e)?;
                }
            }
        }

        // === Decompression ===
        let mut decompression_time = Duration::ZERO;
        let mut files_decompressed = 0;
        for (name, artifact, path) in persisted {
            let payload = match fs::read(&path) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Epoch {}: failed to read {}: {}", epoch, path.display(), e);
                    log.failed(epoch, "read", artifact, &e)?;
                    continue;
                }
            };

            let start = Instant::now();
            let result = self.compressor.decompress(&payload);
            let elapsed = start.elapsed();
            let restored = match result {
                Ok(restored) => restored,
                Err(e) => {
                    warn!("Epoch {}: failed to decompress {}: {}", epoch, artifact, e);
                    log.failed(epoch, "decompress", artifact, &e)?;
                    continue;
                }
            };

            let original = self.dataset.get(name).unwrap_or_default();
            if restored != original {
                let e = BenchError::RoundTripMismatch {
                    codec: self.compressor.algorithm().name(),
                    file: name.to_string(),
                    expected: original.len(),
                    actual: restored.len(),
                };
                warn!("Epoch {}: {}", epoch, e);
                log.failed(epoch, "verify", artifact, &e)?;
                continue;
            }

            decompression_time += elapsed;
            files_decompressed += 1;
            debug!("Epoch {}, decompressed {} in {:?}", epoch, artifact, elapsed);
            log.decompressed(epoch, artifact, elapsed)?;
        }

        Ok(EpochResult {
            epoch,
            compression_time,
            decompression_time,
            compressed_size,
            files_compressed,
            files_decompressed,
            compression_ratio: compression_ratio(compressed_size, self.dataset.total_original_size()),
        })
    }
}

/// Input file name with its extension replaced by `extension`.
pub fn output_file_name(name: &str, extension: &str) -> String {
    Path::new(name)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}

/// MB/s; zero when no time was measured.
pub fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    (bytes as f64 / (1024.0 * 1024.0)) / secs
}
