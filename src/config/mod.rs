//! Explicit description of what one harness invocation measures.
//!
//! The plan is an ordered list of (algorithm, level) pairs handed to the
//! driver at startup; nothing about it lives in process-wide state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::compressor::Algorithm;
use crate::dataset::FileFilter;
use crate::error::{BenchError, Result};

pub const DEFAULT_WORK_DIR: &str = "temp";
pub const DEFAULT_EXTENSION: &str = "json";
pub const DEFAULT_EPOCHS: u32 = 1;

/// Longest level range accepted in one `a-b` item.
pub const MAX_LEVEL_SPAN: i64 = 64;

/// One requested (algorithm, level) pair.
///
/// The algorithm stays a plain name so an unknown one is reported for that
/// pair alone when its codec is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    pub algorithm: String,
    pub level: i32,
}

impl PlannedRun {
    pub fn new(algorithm: impl Into<String>, level: i32) -> Self {
        PlannedRun {
            algorithm: algorithm.into(),
            level,
        }
    }
}

impl fmt::Display for PlannedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} level {}", self.algorithm, self.level)
    }
}

/// Group of runs sharing one algorithm, as written on the command line:
/// `zstd:1-4`, `gzip:1,2`, `snappy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSpec {
    pub algorithm: String,
    pub levels: Vec<i32>,
}

impl FromStr for PlanSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, levels) = match s.split_once(':') {
            Some((name, levels)) => (name.trim(), Some(levels)),
            None => (s.trim(), None),
        };
        if name.is_empty() {
            return Err(format!("missing algorithm name in '{}'", s));
        }

        let levels = match levels {
            Some(levels) => parse_levels(levels)?,
            // A bare name expands to every level the algorithm accepts
            None => match name.parse::<Algorithm>() {
                Ok(algorithm) => algorithm.levels().collect(),
                Err(_) => return Err(format!("unknown algorithm '{}' needs explicit levels", name)),
            },
        };

        Ok(PlanSpec {
            algorithm: name.to_string(),
            levels,
        })
    }
}

fn parse_levels(list: &str) -> std::result::Result<Vec<i32>, String> {
    let mut levels = Vec::new();
    for item in list.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("invalid level '{}'", value.trim()))
        };
        // '-' after the first character so negative levels still parse
        match item.char_indices().skip(1).find(|&(_, c)| c == '-').map(|(at, _)| at) {
            Some(at) => {
                let (start, end) = (parse(&item[..at])?, parse(&item[at + 1..])?);
                if start > end {
                    return Err(format!("empty level range '{}'", item));
                }
                if i64::from(end) - i64::from(start) >= MAX_LEVEL_SPAN {
                    return Err(format!("level range '{}' spans more than {} levels", item, MAX_LEVEL_SPAN));
                }
                levels.extend(start..=end);
            }
            None => levels.push(parse(item)?),
        }
    }
    if levels.is_empty() {
        return Err(format!("no levels given in '{}'", list));
    }
    Ok(levels)
}

/// Ordered list of runs for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkPlan {
    runs: Vec<PlannedRun>,
}

impl BenchmarkPlan {
    pub fn new(runs: Vec<PlannedRun>) -> Self {
        BenchmarkPlan { runs }
    }

    /// gzip {1,2}, snappy {0}, zstd {1..4}, and zstd-dict {1..4} when a
    /// dictionary is available.
    pub fn standard(with_dictionary: bool) -> Self {
        let mut specs = vec![
            ("gzip", vec![1, 2]),
            ("snappy", vec![0]),
            ("zstd", vec![1, 2, 3, 4]),
        ];
        if with_dictionary {
            specs.push(("zstd-dict", vec![1, 2, 3, 4]));
        }
        BenchmarkPlan::from_specs(specs.into_iter().map(|(algorithm, levels)| PlanSpec {
            algorithm: algorithm.to_string(),
            levels,
        }))
    }

    pub fn from_specs<I: IntoIterator<Item = PlanSpec>>(specs: I) -> Self {
        let runs = specs
            .into_iter()
            .flat_map(|spec| {
                let algorithm = spec.algorithm;
                spec.levels
                    .into_iter()
                    .map(move |level| PlannedRun::new(algorithm.clone(), level))
            })
            .collect();
        BenchmarkPlan { runs }
    }

    pub fn runs(&self) -> &[PlannedRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Everything the driver needs for one invocation.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub input_dir: PathBuf,
    pub work_dir: PathBuf,
    pub epochs: u32,
    pub filter: FileFilter,
    pub dictionary: Option<PathBuf>,
    pub plan: BenchmarkPlan,
    /// Append averaged results to this JSON file
    pub results_json: Option<PathBuf>,
    /// Pin the process to this CPU core before measuring
    pub core: Option<usize>,
}

impl HarnessConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        HarnessConfig {
            input_dir: input_dir.into(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            epochs: DEFAULT_EPOCHS,
            filter: FileFilter::parse(DEFAULT_EXTENSION),
            dictionary: None,
            plan: BenchmarkPlan::standard(false),
            results_json: None,
            core: None,
        }
    }

    /// Rejects settings that would make every run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(BenchError::InvalidSettings("epoch count must be at least 1".into()));
        }
        if self.plan.is_empty() {
            return Err(BenchError::InvalidSettings("the benchmark plan is empty".into()));
        }
        Ok(())
    }
}
