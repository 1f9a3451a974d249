use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::harness::BenchConfig;
use crate::report::ReportRow;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub warmup: usize,
    pub repetitions: usize,
    pub seed: u64,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

impl RunMeta {
    pub fn new(cfg: &BenchConfig, timestamp_utc: String, git_sha: Option<String>) -> Self {
        RunMeta {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: cfg.profile.as_str().to_string(),
            warmup: cfg.warmup_iters(),
            repetitions: cfg.repetitions(),
            seed: cfg.seed,
            timestamp_utc,
            git_sha,
        }
    }
}

/// Rows of one workload, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub workload: String,
    pub left: BackendKind,
    pub right: BackendKind,
    /// Number of valuations compared per row when `--verify` was given.
    pub verified_valuations: Option<Vec<usize>>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRunReport {
    pub run: RunMeta,
    pub workloads: Vec<WorkloadReport>,
}
