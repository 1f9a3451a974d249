//! Workload generators.
//!
//! Size-sweep workloads ([`adder`], [`monotonicity`], [`substitution`]) implement
//! [`SizeWorkload`] and are written once against [`BooleanBackend`]. Corpus workloads
//! live in [`expressions`].

use crate::backend::{BooleanBackend, VarId, VariableUniverse};
use crate::error::Result;

pub mod monotonicity;

pub use adder::RippleCarryAdder;
pub use monotonicity::Monotonicity;
pub use substitution::{SubstitutionChain, SubstitutionStart};

/// A workload whose input is synthesized from one integer size.
///
/// `build` must be re-invokable: two calls with the same size and a fresh backend
/// produce the same function, and nothing is cached between calls.
pub trait SizeWorkload {
    /// Name used in logs and run reports.
    fn name(&self) -> &'static str;

    fn default_sizes(&self) -> Vec<usize>;

    /// Reject sizes the workload is not defined for. Called before any backend work.
    fn validate(&self, size: usize) -> Result<()>;

    fn universe(&self, size: usize) -> VariableUniverse;

    fn build<B: BooleanBackend>(&self, backend: &B, size: usize) -> Result<B::Node>;

    /// Validate, create a fresh backend context and build.
    fn instance<B: BooleanBackend>(&self, size: usize) -> Result<(B, B::Node)> {
        self.validate(size)?;
        let backend = B::with_universe(&self.universe(size))?;
        let node = self.build(&backend, size)?;
        Ok((backend, node))
    }
}

/// Literals `x_0 .. x_{count-1}` in positive polarity.
pub(crate) fn positive_literals<B: BooleanBackend>(backend: &B, count: usize) -> Result<Vec<B::Node>> {
    (0..count).map(|i| backend.mk_literal(VarId(i), true)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::tests::all_valuations;
    use crate::backend::{ExprTree, LibBdd, TableBackend};

    /// Build `size` on all three backends and check they agree on every valuation.
    pub(crate) fn assert_backends_agree<W: SizeWorkload>(workload: &W, size: usize) {
        let (bdd, f) = workload.instance::<LibBdd>(size).unwrap();
        let (expr, g) = workload.instance::<ExprTree>(size).unwrap();
        let (table, h) = workload.instance::<TableBackend>(size).unwrap();
        let n = workload.universe(size).len();
        for v in all_valuations(n) {
            let expected = bdd.evaluate(&f, &v);
            assert_eq!(expr.evaluate(&g, &v), expected, "{} n={size} {v:?}", workload.name());
            assert_eq!(table.evaluate(&h, &v), expected, "{} n={size} {v:?}", workload.name());
        }
    }

    /// Two invocations with fresh contexts build the same function of the same size.
    pub(crate) fn assert_reinvocable<W: SizeWorkload>(workload: &W, size: usize) {
        let (b1, f1) = workload.instance::<ExprTree>(size).unwrap();
        let (b2, f2) = workload.instance::<ExprTree>(size).unwrap();
        assert_eq!(f1, f2);
        assert_eq!(b1.node_count(&f1), b2.node_count(&f2));

        let (b1, f1) = workload.instance::<LibBdd>(size).unwrap();
        let (b2, f2) = workload.instance::<LibBdd>(size).unwrap();
        assert_eq!(b1.node_count(&f1), b2.node_count(&f2));
    }
}
