use std::hint::black_box;
use std::time::Instant;

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stats::stats_ns;

pub const DEFAULT_WARMUP: usize = 5;
pub const DEFAULT_REPETITIONS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// 5 warmup calls and 10 timed repetitions per cell.
    Standard,
    /// Smoke-test profile, 1 warmup call and 3 timed repetitions.
    Quick,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Quick => "quick",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub seed: u64,
    /// Overrides the profile's warmup count.
    pub warmup: Option<usize>,
    /// Overrides the profile's repetition count.
    pub repetitions: Option<usize>,
}

impl BenchConfig {
    pub fn new(profile: Profile) -> Self {
        BenchConfig {
            profile,
            seed: 0,
            warmup: None,
            repetitions: None,
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    pub fn warmup_iters(&self) -> usize {
        self.warmup.unwrap_or(match self.profile {
            Profile::Standard => DEFAULT_WARMUP,
            Profile::Quick => 1,
        })
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions.unwrap_or(match self.profile {
            Profile::Standard => DEFAULT_REPETITIONS,
            Profile::Quick => 3,
        })
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig::new(Profile::Standard)
    }
}

/// Timing statistics of one (backend, workload, size) cell.
///
/// Built only from its samples; never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub mean: f64,
    pub stddev: f64,
    /// Wall-clock nanoseconds of each timed repetition, in execution order.
    pub samples: Vec<u64>,
}

impl BenchmarkResult {
    pub fn from_samples(samples: Vec<u64>) -> Result<Self> {
        let summary = stats_ns(&samples)?;
        Ok(BenchmarkResult {
            mean: summary.mean,
            stddev: summary.stddev,
            samples,
        })
    }
}

/// Run `action` `warmup_iters` times untimed, then `repetitions` times timed.
///
/// Each timed call is measured separately on the monotonic clock. The returned value is
/// passed through `black_box` after the clock stops, so the work cannot be elided and
/// its deallocation is not part of the sample. Errors from `action` are returned
/// immediately; warmup samples never reach the statistics.
pub fn run_bench<T>(
    warmup_iters: usize,
    repetitions: usize,
    mut action: impl FnMut() -> Result<T>,
) -> Result<BenchmarkResult> {
    for _ in 0..warmup_iters {
        black_box(action()?);
    }

    let mut samples = Vec::with_capacity(repetitions);
    for _ in 0..repetitions {
        let start = Instant::now();
        let value = action()?;
        let elapsed = start.elapsed();
        black_box(value);
        samples.push(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
    }

    BenchmarkResult::from_samples(samples)
}

/// [`run_bench`] with the counts taken from a [`BenchConfig`].
pub fn measure<T>(cfg: &BenchConfig, action: impl FnMut() -> Result<T>) -> Result<BenchmarkResult> {
    run_bench(cfg.warmup_iters(), cfg.repetitions(), action)
}
