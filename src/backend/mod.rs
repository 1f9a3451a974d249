//! The capability set every benchmarked Boolean-function backend provides.
//!
//! Workload generators are written once against [`BooleanBackend`]; each backend is a
//! thin adapter over its own representation. Variables are identified by their position
//! in a [`VariableUniverse`], which fixes the variable ordering independently of the
//! variable names.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

pub mod bdd;
pub mod expr;
pub mod table;

pub use bdd::LibBdd;
pub use expr::ExprTree;
pub use table::TableBackend;

/// Position of a variable in its [`VariableUniverse`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered list of variables a backend instance works with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableUniverse {
    names: Vec<String>,
    by_name: HashMap<String, VarId>,
}

impl VariableUniverse {
    pub fn new(names: Vec<String>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if by_name.insert(name.clone(), VarId(i)).is_some() {
                return Err(BenchError::invalid_input(format!(
                    "variable `{name}` declared twice"
                )));
            }
        }
        Ok(VariableUniverse { names, by_name })
    }

    /// Universe of `count` variables named `x_0 .. x_{count-1}`.
    pub fn indexed(count: usize) -> Self {
        let names: Vec<String> = (0..count).map(|i| format!("x_{i}")).collect();
        let by_name = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), VarId(i)))
            .collect();
        VariableUniverse { names, by_name }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn var_by_name(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }
}

/// Minimal operation contract shared by all backends under comparison.
///
/// A backend value is a context (variable set, name lookup) bound to one universe.
/// Constructing a fresh context per workload invocation keeps invocations independent.
pub trait BooleanBackend: Sized {
    type Node: Clone;

    /// Label used in report headers.
    const LABEL: &'static str;

    fn with_universe(universe: &VariableUniverse) -> Result<Self>;

    fn mk_literal(&self, var: VarId, polarity: bool) -> Result<Self::Node>;
    fn mk_const(&self, value: bool) -> Self::Node;
    fn mk_and(&self, left: &Self::Node, right: &Self::Node) -> Result<Self::Node>;
    fn mk_or(&self, left: &Self::Node, right: &Self::Node) -> Result<Self::Node>;
    fn mk_xor(&self, left: &Self::Node, right: &Self::Node) -> Result<Self::Node>;
    fn mk_not(&self, node: &Self::Node) -> Self::Node;

    /// Parse an expression over variables of this universe.
    fn parse(&self, text: &str) -> Result<Self::Node>;

    /// Conjunctive normal form of `node`, as a node of the same backend.
    fn to_cnf(&self, node: &Self::Node) -> Result<Self::Node>;

    /// Replace every occurrence of `var` in `node` by `replacement`.
    fn substitute(&self, node: &Self::Node, var: VarId, replacement: &Self::Node)
        -> Result<Self::Node>;

    /// Value of `node` under a full valuation indexed by [`VarId`].
    fn evaluate(&self, node: &Self::Node, valuation: &[bool]) -> bool;

    /// Representation size in the backend's own unit (BDD nodes, tree nodes, table rows).
    fn node_count(&self, node: &Self::Node) -> usize;

    /// `Some((var, polarity))` when `node` is a single literal.
    fn literal_of(&self, node: &Self::Node) -> Option<(VarId, bool)>;
}

/// Backends selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Reduced ordered BDDs from `biodivine-lib-bdd`.
    Bdd,
    /// Plain expression trees.
    Expr,
    /// Truth tables over the support of the function.
    Table,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Bdd => LibBdd::LABEL,
            BackendKind::Expr => ExprTree::LABEL,
            BackendKind::Table => TableBackend::LABEL,
        }
    }
}

/// Expand `$body` once per backend, with `$backend` bound to the concrete type selected
/// by `$kind`.
#[macro_export]
macro_rules! with_backend {
    ($kind:expr, $backend:ident => $body:expr) => {
        match $kind {
            $crate::backend::BackendKind::Bdd => {
                type $backend = $crate::backend::LibBdd;
                $body
            }
            $crate::backend::BackendKind::Expr => {
                type $backend = $crate::backend::ExprTree;
                $body
            }
            $crate::backend::BackendKind::Table => {
                type $backend = $crate::backend::TableBackend;
                $body
            }
        }
    };
}

/// Fail with a labelled backend error unless `var` lies inside the universe.
pub(crate) fn check_var(label: &'static str, universe_len: usize, var: VarId) -> Result<()> {
    if var.0 < universe_len {
        Ok(())
    } else {
        Err(BenchError::backend(
            label,
            format!("variable {} outside a universe of {universe_len}", var.0),
        ))
    }
}
