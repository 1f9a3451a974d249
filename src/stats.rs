//! Summary statistics over timing samples.
//!
//! The standard deviation is the *population* deviation: squared deviations are divided
//! by the sample count, not `count - 1`. Older report files use the same definition.

use crate::error::{BenchError, Result};

/// Mean and population standard deviation of a sample set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub stddev: f64,
}

pub fn stats(samples: &[f64]) -> Result<Summary> {
    if samples.is_empty() {
        return Err(BenchError::EmptySampleSet);
    }
    if let Some(bad) = samples.iter().find(|x| !x.is_finite() || **x < 0.0) {
        return Err(BenchError::invalid_input(format!(
            "timing samples must be finite and non-negative, got {bad}"
        )));
    }

    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count;

    // Rounding can put the mean a hair outside [min, max] for near-identical samples.
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = mean.clamp(min, max);
    let stddev = if min == max { 0.0 } else { variance.sqrt() };

    Ok(Summary { mean, stddev })
}

/// Convenience wrapper for integral nanosecond samples.
pub fn stats_ns(samples: &[u64]) -> Result<Summary> {
    let as_f64: Vec<f64> = samples.iter().map(|&x| x as f64).collect();
    stats(&as_f64)
}
