use log::warn;
use prettytable::{row, Table};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

use crate::benchmark::BenchmarkResult;
use crate::compressor::Algorithm;
use crate::error::Result;

/// Reads a JSON array of results; a missing or unparsable file yields an empty list.
pub fn read_benchmark_results(file_path: &Path) -> Result<Vec<BenchmarkResult>> {
    if !file_path.exists() {
        return Ok(Vec::new());
    }
    let file_content = fs::read(file_path)?;
    Ok(serde_json::from_slice::<Vec<BenchmarkResult>>(&file_content).unwrap_or_else(|e| {
        warn!("Error parsing results file '{}' ({}). Starting fresh.", file_path.display(), e);
        Vec::new()
    }))
}

/// Appends `new_results` to the JSON array stored at `file_path`.
pub fn append_benchmark_results(new_results: &[BenchmarkResult], file_path: &Path) -> Result<()> {
    let mut results = read_benchmark_results(file_path)?;
    results.extend_from_slice(new_results);

    let json = serde_json::to_string_pretty(&results)?;
    fs::write(file_path, json)?;
    Ok(())
}

/// Prints one table per algorithm, levels ascending.
pub fn print_benchmark_results(results: &[BenchmarkResult]) {
    // Group results by algorithm
    let mut groups: FxHashMap<&str, Vec<&BenchmarkResult>> = FxHashMap::default();
    for result in results {
        groups.entry(result.algorithm.as_str()).or_default().push(result);
    }

    let mut algorithms: Vec<&str> = groups.keys().copied().collect();
    algorithms.sort_unstable();

    for algorithm in algorithms {
        let mut group = groups.remove(algorithm).unwrap_or_default();
        group.sort_by_key(|r| r.level);

        let mut table = Table::new();
        table.add_row(row![
            "Level",
            "Comp Time (ms)",
            "Decomp Time (ms)",
            "Comp Ratio (%)",
            "Comp Speed (MB/s)",
            "Decomp Speed (MB/s)"
        ]);
        for result in &group {
            table.add_row(row![
                result.level,
                format!("{:.2}", result.average_compression_time_ms),
                format!("{:.2}", result.average_decompression_time_ms),
                format!("{:.2}", result.compression_ratio),
                format!("{:.2}", result.compression_speed),
                format!("{:.2}", result.decompression_speed),
            ]);
        }

        println!("\nResults for Compressor: {}", algorithm);
        table.printstd();
    }
}

/// Prints every algorithm with its levels and artifact extension.
pub fn print_algorithm_catalogue() {
    let mut table = Table::new();
    table.add_row(row!["Algorithm", "Levels", "Extension", "Dictionary"]);
    for algorithm in Algorithm::ALL {
        let levels = algorithm.levels();
        table.add_row(row![
            algorithm.name(),
            format!("{}..={}", levels.start(), levels.end()),
            format!(".{}", algorithm.extension()),
            if algorithm.uses_dictionary() { "required" } else { "-" },
        ]);
    }
    table.printstd();
}

/// Pins the calling process to `core`.
#[cfg(target_os = "linux")]
pub fn set_affinity(core: usize) -> Result<()> {
    // SAFETY: cpu_set_t is plain data and zero-initialised before use
    let result = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };
    if result != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn set_affinity(core: usize) -> Result<()> {
    warn!("CPU pinning is only supported on Linux; ignoring core {}", core);
    Ok(())
}
