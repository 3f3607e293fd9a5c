use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::{tempdir, TempDir};

use compression_harness::benchmark_utils::read_benchmark_results;
use compression_harness::config::{BenchmarkPlan, HarnessConfig, PlanSpec, PlannedRun};
use compression_harness::dataset::FileFilter;
use compression_harness::driver;
use compression_harness::stats::SUMMARY_HEADER;

fn corpus() -> TempDir {
    let dir = tempdir().unwrap();
    let mut random = vec![0u8; 50];
    StdRng::seed_from_u64(7).fill(&mut random[..]);
    fs::write(dir.path().join("a.json"), vec![b'a'; 100]).unwrap();
    fs::write(dir.path().join("b.json"), random).unwrap();
    fs::write(dir.path().join("skip.txt"), b"not part of the corpus").unwrap();
    dir
}

fn config(input: &Path, work: &Path, plan: &[&str]) -> HarnessConfig {
    let mut config = HarnessConfig::new(input);
    config.work_dir = work.to_path_buf();
    config.plan = BenchmarkPlan::from_specs(plan.iter().map(|spec| spec.parse::<PlanSpec>().unwrap()));
    config
}

fn summary_rows(work: &Path) -> Vec<Vec<String>> {
    let content = fs::read_to_string(work.join("benchmark_stats.csv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next().unwrap(), SUMMARY_HEADER.join(","));
    lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_rows_per_valid_pair() {
    let input = corpus();
    let work = tempdir().unwrap();
    let mut config = config(input.path(), work.path(), &["gzip:1,2", "snappy:0", "zstd:1-4"]);
    config.epochs = 2;

    let report = driver::run(&config).unwrap();
    assert_eq!(report.results.len(), 7);
    assert!(report.skipped.is_empty() && report.failed.is_empty());

    let rows = summary_rows(work.path());
    assert_eq!(rows.len(), 7 * 3);
    for chunk in rows.chunks(3) {
        assert_eq!(chunk[0][2], "1");
        assert_eq!(chunk[1][2], "2");
        assert_eq!(chunk[2][2], "average");
        assert!(chunk.iter().all(|row| row[0] == chunk[0][0] && row[1] == chunk[0][1]));
        // ratio of the average row is the last epoch's
        assert_eq!(chunk[2][5], chunk[1][5]);
    }

    for result in &report.results {
        assert_eq!(result.files, 2);
        assert_eq!(result.total_original_size, 150);
        assert!(result.compression_ratio > 0.0);
        let log = work
            .path()
            .join(format!("benchmark_{}_level_{}.log", result.algorithm, result.level));
        let log = fs::read_to_string(log).unwrap();
        assert!(log.contains(&format!("Compression Algorithm: {}", result.algorithm)));
        assert!(log.contains("File: a.json, Size: 100 bytes"));
        assert!(log.contains("Overall Summary:"));
    }

    assert!(work.path().join("benchmark_gzip/2/compress/a.gz").exists());
    assert!(work.path().join("benchmark_zstd/1/compress/b.zst").exists());
    assert!(work.path().join("benchmark_snappy/2/compress/b.snappy").exists());
}

#[test]
fn test_invalid_level_skipped_others_complete() {
    let input = corpus();
    let work = tempdir().unwrap();
    let mut config = config(input.path(), work.path(), &["lz4:0"]);
    config.plan = BenchmarkPlan::new(vec![
        PlannedRun::new("zstd", 9),
        PlannedRun::new("lz4", 0),
        PlannedRun::new("lzham", 1),
        PlannedRun::new("gzip", 1),
    ]);
    config.epochs = 3;

    let report = driver::run(&config).unwrap();
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].0, PlannedRun::new("zstd", 9));
    assert_eq!(report.skipped[1].0, PlannedRun::new("lzham", 1));

    let rows = summary_rows(work.path());
    assert_eq!(rows.len(), 2 * 4);
    assert!(rows.iter().all(|row| row[0] == "lz4" || row[0] == "gzip"));
    assert!(!work.path().join("benchmark_zstd_level_9.log").exists());
}

#[test]
fn test_wildcard_inputs_sharing_a_stem() {
    let input = tempdir().unwrap();
    fs::write(input.path().join("a.json"), b"{\"a\": 1}").unwrap();
    fs::write(input.path().join("a.txt"), b"hello").unwrap();
    let work = tempdir().unwrap();
    let mut config = config(input.path(), work.path(), &["raw:0"]);
    config.filter = FileFilter::parse("*");

    let report = driver::run(&config).unwrap();
    assert_eq!(report.results[0].files, 2);

    let dir = work.path().join("benchmark_raw/1/compress");
    assert_eq!(fs::read(dir.join("a.json.raw")).unwrap(), b"{\"a\": 1}");
    assert_eq!(fs::read(dir.join("a.txt.raw")).unwrap(), b"hello");

    let log = fs::read_to_string(work.path().join("benchmark_raw_level_0.log")).unwrap();
    assert!(!log.contains("Failed"));
    assert!(log.contains("  Files Decompressed: 2"));
}

#[test]
fn test_missing_input_dir_writes_no_summary() {
    let root = tempdir().unwrap();
    let work = root.path().join("work");
    let config = config(&root.path().join("absent"), &work, &["zstd:1"]);

    let err = driver::run(&config).unwrap_err();
    assert!(err.is_setup());
    assert!(!work.join("benchmark_stats.csv").exists());
}

#[test]
fn test_no_matching_files_writes_no_summary() {
    let input = tempdir().unwrap();
    fs::write(input.path().join("data.csv"), b"a,b\n1,2\n").unwrap();
    let work = tempdir().unwrap();
    let config = config(input.path(), work.path(), &["zstd:1"]);

    let err = driver::run(&config).unwrap_err();
    assert!(err.is_setup());
    assert!(!work.path().join("benchmark_stats.csv").exists());
}

#[test]
fn test_zero_epochs_rejected_before_running() {
    let input = corpus();
    let work = tempdir().unwrap();
    let mut config = config(input.path(), work.path(), &["zstd:1"]);
    config.epochs = 0;

    let err = driver::run(&config).unwrap_err();
    assert!(err.is_configuration());
    assert!(!work.path().join("benchmark_stats.csv").exists());
}

#[test]
fn test_dictionary_enables_zstd_dict() {
    let input = corpus();
    let work = tempdir().unwrap();
    let dictionary = input.path().join("dict.bin");
    fs::write(&dictionary, b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();

    let mut config = config(input.path(), work.path(), &[]);
    config.dictionary = Some(dictionary);
    config.plan = BenchmarkPlan::standard(true);

    let report = driver::run(&config).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.results.len(), 11);
    assert!(report.results.iter().any(|r| r.algorithm == "zstd-dict" && r.level == 4));
    assert_eq!(summary_rows(work.path()).len(), 11 * 2);
}

#[test]
fn test_zstd_dict_without_dictionary_is_skipped() {
    let input = corpus();
    let work = tempdir().unwrap();
    let config = config(input.path(), work.path(), &["zstd-dict:1", "raw"]);

    let report = driver::run(&config).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].compression_ratio, 100.0);
}

#[test]
fn test_results_appended_to_json() {
    let input = corpus();
    let work = tempdir().unwrap();
    let json = work.path().join("results.json");
    let mut config = config(input.path(), work.path(), &["snappy", "lz4:0"]);
    config.results_json = Some(json.clone());

    driver::run(&config).unwrap();
    driver::run(&config).unwrap();

    let results = read_benchmark_results(&json).unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].algorithm, "snappy");
    assert_eq!(results[3].algorithm, "lz4");
}
