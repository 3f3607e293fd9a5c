//! End-to-end orchestration of one harness invocation.
//!
//! Setup failures (input discovery, work directory, dictionary, summary file)
//! stop everything before a single row is written. After that, every planned
//! (algorithm, level) pair runs on its own: a pair that cannot be configured
//! is skipped, a run that fails is reported, and the rest still execute.

use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::benchmark::{BenchmarkResult, BenchmarkRunner};
use crate::benchmark_utils::{append_benchmark_results, set_affinity};
use crate::compressor::{Algorithm, CodecConfig, Dictionaries};
use crate::config::{HarnessConfig, PlannedRun};
use crate::dataset::Dataset;
use crate::error::{BenchError, Result};
use crate::stats::SummaryTable;

/// Outcome of a whole invocation.
#[derive(Debug, Default)]
pub struct HarnessReport {
    pub results: Vec<BenchmarkResult>,
    /// Pairs rejected at codec construction, with the reason
    pub skipped: Vec<(PlannedRun, String)>,
    /// Pairs whose run started but ended in an error
    pub failed: Vec<(PlannedRun, String)>,
    pub summary_path: PathBuf,
}

/// Runs every planned pair of `config` against the input corpus.
pub fn run(config: &HarnessConfig) -> Result<HarnessReport> {
    config.validate()?;

    let dataset = Dataset::load(&config.input_dir, &config.filter)?;
    fs::create_dir_all(&config.work_dir).map_err(|e| BenchError::setup(&config.work_dir, e))?;
    let dictionaries = load_dictionaries(config)?;

    if let Some(core) = config.core {
        match set_affinity(core) {
            Ok(()) => info!("Pinned to CPU core {}", core),
            Err(e) => warn!("Could not pin to CPU core {}: {}", core, e),
        }
    }

    let mut table = SummaryTable::create(&config.work_dir)?;
    let mut report = HarnessReport {
        summary_path: table.path().to_path_buf(),
        ..HarnessReport::default()
    };

    let total = config.plan.len();
    for (i, planned) in config.plan.runs().iter().enumerate() {
        info!("({}/{}) {}", i + 1, total, planned);

        let runner = CodecConfig::resolve(&planned.algorithm, planned.level, &dictionaries).and_then(|codec| {
            BenchmarkRunner::new(&codec, &dataset, config.epochs, &config.work_dir)
        });
        let runner = match runner {
            Ok(runner) => runner,
            Err(e) => {
                error!("Skipping {}: {}", planned, e);
                report.skipped.push((planned.clone(), e.to_string()));
                continue;
            }
        };

        match runner.run(&mut table) {
            Ok(result) => report.results.push(result),
            Err(e) => {
                error!("Benchmark {} failed: {}", planned, e);
                report.failed.push((planned.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Finished {} runs ({} skipped, {} failed); {} rows in {}",
        report.results.len(),
        report.skipped.len(),
        report.failed.len(),
        table.rows(),
        report.summary_path.display()
    );

    if let Some(path) = &config.results_json {
        append_benchmark_results(&report.results, path)?;
        info!("Appended {} results to {}", report.results.len(), path.display());
    }

    Ok(report)
}

fn load_dictionaries(config: &HarnessConfig) -> Result<Dictionaries> {
    let mut dictionaries = Dictionaries::default();
    if let Some(path) = &config.dictionary {
        let bytes = fs::read(path).map_err(|e| BenchError::setup(path, e))?;
        info!("Loaded {} byte dictionary from {}", bytes.len(), path.display());
        dictionaries.insert(Algorithm::ZstdDict, Arc::from(bytes));
    }
    Ok(dictionaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchmarkPlan;
    use tempfile::tempdir;

    #[test]
    fn test_setup_error_precedes_work_dir() {
        let root = tempdir().unwrap();
        let mut config = HarnessConfig::new(root.path().join("missing"));
        config.work_dir = root.path().join("work");

        let err = run(&config).unwrap_err();
        assert!(err.is_setup());
        assert!(!config.work_dir.exists());
    }

    #[test]
    fn test_unreadable_dictionary_is_setup_error() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("a.json"), b"{}").unwrap();
        let mut config = HarnessConfig::new(root.path());
        config.work_dir = root.path().join("work");
        config.dictionary = Some(root.path().join("absent.dict"));
        config.plan = BenchmarkPlan::new(vec![PlannedRun::new("raw", 0)]);

        let err = run(&config).unwrap_err();
        assert!(err.is_setup());
        assert!(!config.work_dir.join("benchmark_stats.csv").exists());
    }
}
