use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

pub mod backend;
pub mod benches;
pub mod corpus;
pub mod driver;
pub mod error;
pub mod harness;
pub mod report;
pub mod schema;
pub mod stats;
pub mod verify;

/// Workload family to benchmark.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workload {
    /// Ripple-carry adder under the worst variable ordering.
    Adder,
    /// Conjunction of all monotonicity constraints of a given arity.
    Monotonicity,
    /// Chain of substitutions that grows the arity by one per step.
    Substitution,
    /// Parsing of corpus expressions.
    ExprParse,
    /// CNF conversion of corpus expressions.
    ExprCnf,
}

impl Workload {
    pub const ALL: [Workload; 5] = [
        Workload::Adder,
        Workload::Monotonicity,
        Workload::Substitution,
        Workload::ExprParse,
        Workload::ExprCnf,
    ];

    /// Backends compared when the command line does not choose them.
    pub fn default_backends(&self) -> (BackendKind, BackendKind) {
        match self {
            Workload::Substitution => (BackendKind::Table, BackendKind::Bdd),
            _ => (BackendKind::Bdd, BackendKind::Expr),
        }
    }
}
