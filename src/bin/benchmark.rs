use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info};

use compression_harness::benchmark_utils::{print_algorithm_catalogue, print_benchmark_results};
use compression_harness::config::{
    BenchmarkPlan, HarnessConfig, PlanSpec, DEFAULT_EPOCHS, DEFAULT_EXTENSION, DEFAULT_WORK_DIR,
};
use compression_harness::dataset::FileFilter;
use compression_harness::driver;

#[derive(Parser)]
#[command(
    name = "benchmark",
    about = "Measure compression time, decompression time and ratio across codecs and levels",
    version
)]
struct Cli {
    /// Directory containing the files to compress
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Number of epochs per (algorithm, level) pair
    #[arg(short, long = "epoch", default_value_t = DEFAULT_EPOCHS)]
    epochs: u32,
    /// Dictionary file used by the zstd-dict algorithm
    #[arg(long)]
    zstd_dict: Option<PathBuf>,
    /// Directory for logs, artifacts and the summary table
    #[arg(short, long, default_value = DEFAULT_WORK_DIR)]
    work_dir: PathBuf,
    /// Extension of the input files to load ("*" for every file)
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
    /// Run ALGO:LEVELS instead of the standard plan, e.g. zstd:1-4 or gzip:1,2 (repeatable)
    #[arg(short, long = "run")]
    runs: Vec<PlanSpec>,
    /// Append averaged results to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,
    /// Pin the process to this CPU core
    #[arg(long)]
    core: Option<usize>,
    /// Print the supported algorithms and levels, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let cli = Cli::parse();
    if cli.list {
        print_algorithm_catalogue();
        return Ok(());
    }

    let Some(input) = cli.input else {
        bail!("--input is required (see --help)");
    };

    let plan = if cli.runs.is_empty() {
        BenchmarkPlan::standard(cli.zstd_dict.is_some())
    } else {
        BenchmarkPlan::from_specs(cli.runs)
    };

    let config = HarnessConfig {
        input_dir: input,
        work_dir: cli.work_dir,
        epochs: cli.epochs,
        filter: FileFilter::parse(&cli.extension),
        dictionary: cli.zstd_dict,
        plan,
        results_json: cli.json,
        core: cli.core,
    };

    let report = driver::run(&config)
        .with_context(|| format!("benchmark of {} aborted", config.input_dir.display()))?;

    print_benchmark_results(&report.results);
    for (planned, reason) in &report.skipped {
        error!("Skipped {}: {}", planned, reason);
    }
    for (planned, reason) in &report.failed {
        error!("Failed {}: {}", planned, reason);
    }
    info!("Summary written to {}", report.summary_path.display());

    Ok(())
}
