//! Monotonic functions of a given arity.
//!
//! Variables `x_0 .. x_{2^arity - 1}` stand for the outputs of an `arity`-input function
//! on every input vector. At level `i` the variables are split into blocks of `2^(i+1)`
//! and each variable of the lower half must imply its partner in the upper half. The
//! satisfying assignments of the conjunction are exactly the monotonic functions, so the
//! model count is a Dedekind number.

use super::{positive_literals, SizeWorkload};
use crate::backend::{BooleanBackend, VariableUniverse};
use crate::error::{BenchError, Result};

/// Largest arity whose variable count (`2^arity`) the harness accepts.
pub const MAX_ARITY: usize = 15;

#[derive(Clone, Copy, Debug, Default)]
pub struct Monotonicity;

impl SizeWorkload for Monotonicity {
    fn name(&self) -> &'static str {
        "monotonicity"
    }

    fn default_sizes(&self) -> Vec<usize> {
        (1..=5).collect()
    }

    fn validate(&self, arity: usize) -> Result<()> {
        if arity > MAX_ARITY {
            return Err(BenchError::invalid_input(format!(
                "monotonicity arity {arity} exceeds {MAX_ARITY}"
            )));
        }
        Ok(())
    }

    fn universe(&self, arity: usize) -> VariableUniverse {
        VariableUniverse::indexed(1 << arity)
    }

    fn build<B: BooleanBackend>(&self, backend: &B, arity: usize) -> Result<B::Node> {
        self.validate(arity)?;
        let num_vars = 1usize << arity;
        let literals = positive_literals(backend, num_vars)?;
        let mut result = backend.mk_const(true);

        for level in 0..arity {
            let block_size = 1usize << (level + 1);
            let half_block = block_size / 2;
            let mut regulator = backend.mk_const(true);
            for block in (0..num_vars).step_by(block_size) {
                for item in 0..half_block {
                    let low = &literals[block + item];
                    let high = &literals[block + item + half_block];
                    let implies = backend.mk_or(&backend.mk_not(low), high)?;
                    regulator = backend.mk_and(&regulator, &implies)?;
                }
            }
            result = backend.mk_and(&result, &regulator)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::all_valuations;
    use crate::backend::{LibBdd, TableBackend};
    use crate::benches::tests::{assert_backends_agree, assert_reinvocable};

    fn model_count<B: BooleanBackend>(backend: &B, node: &B::Node, n: usize) -> usize {
        all_valuations(n).filter(|v| backend.evaluate(node, v)).count()
    }

    #[test]
    fn arity_one_is_a_single_implication() {
        let (b, f) = Monotonicity.instance::<TableBackend>(1).unwrap();
        for v in all_valuations(2) {
            assert_eq!(b.evaluate(&f, &v), !v[0] || v[1]);
        }
    }

    #[test]
    fn arity_zero_is_true() {
        let (b, f) = Monotonicity.instance::<LibBdd>(0).unwrap();
        assert!(b.evaluate(&f, &[false]));
        assert!(b.evaluate(&f, &[true]));
        assert_eq!(f, b.mk_const(true));
    }

    #[test]
    fn dedekind_numbers() {
        // Monotonic functions of 0..=3 inputs.
        for (arity, expected) in [(0, 2), (1, 3), (2, 6), (3, 20)] {
            let (b, f) = Monotonicity.instance::<LibBdd>(arity).unwrap();
            assert_eq!(model_count(&b, &f, 1 << arity), expected, "arity {arity}");
        }
    }

    #[test]
    fn arity_limit() {
        assert!(matches!(
            Monotonicity.validate(MAX_ARITY + 1),
            Err(BenchError::InvalidInput(_))
        ));
        assert!(Monotonicity.validate(MAX_ARITY).is_ok());
    }

    #[test]
    fn backends_agree_and_rebuild_identically() {
        for arity in 1..=3 {
            assert_backends_agree(&Monotonicity, arity);
        }
        assert_reinvocable(&Monotonicity, 3);
    }
}
