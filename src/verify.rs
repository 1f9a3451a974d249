//! Cross-backend parity check.
//!
//! Timing two backends only means something if they compute the same function. With
//! `--verify`, every row is rebuilt (untimed) on both backends and the results are
//! evaluated on all valuations for small universes, or on a seeded random sample of
//! valuations for large ones.

use rand::Rng;

use crate::backend::BooleanBackend;
use crate::error::{BenchError, Result};
use crate::harness::BenchConfig;

/// Universes up to this size are checked exhaustively.
pub const EXHAUSTIVE_LIMIT: usize = 12;
pub const DEFAULT_VERIFY_SAMPLES: usize = 1024;

#[derive(Clone, Copy, Debug)]
pub struct ParityCheck {
    /// Random valuations drawn for universes above [`EXHAUSTIVE_LIMIT`].
    pub samples: usize,
}

impl Default for ParityCheck {
    fn default() -> Self {
        ParityCheck {
            samples: DEFAULT_VERIFY_SAMPLES,
        }
    }
}

impl ParityCheck {
    pub fn new(samples: usize) -> Self {
        ParityCheck { samples }
    }

    /// Valuations to evaluate for a universe of `n` variables.
    pub fn valuations(&self, cfg: &BenchConfig, n: usize) -> Vec<Vec<bool>> {
        if n <= EXHAUSTIVE_LIMIT {
            (0..(1usize << n))
                .map(|row| (0..n).map(|i| (row >> (n - 1 - i)) & 1 == 1).collect())
                .collect()
        } else {
            let mut rng = cfg.rng();
            (0..self.samples)
                .map(|_| (0..n).map(|_| rng.gen::<bool>()).collect())
                .collect()
        }
    }

    /// Compare `left` and `right` over a universe of `n` variables. Returns the number of
    /// valuations checked.
    pub fn check<L: BooleanBackend, R: BooleanBackend>(
        &self,
        cfg: &BenchConfig,
        instance: &str,
        left: &(L, L::Node),
        right: &(R, R::Node),
        n: usize,
    ) -> Result<usize> {
        let valuations = self.valuations(cfg, n);
        for valuation in &valuations {
            if left.0.evaluate(&left.1, valuation) != right.0.evaluate(&right.1, valuation) {
                return Err(BenchError::ParityMismatch {
                    left: L::LABEL,
                    right: R::LABEL,
                    instance: instance.to_string(),
                    valuation: valuation.clone(),
                });
            }
        }
        log::debug!(
            "{instance}: {} and {} agree on {} valuations",
            L::LABEL,
            R::LABEL,
            valuations.len()
        );
        Ok(valuations.len())
    }
}
