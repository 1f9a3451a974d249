//! Truth-table backend.
//!
//! A table stores one output per row over its own input variables, which are kept sorted
//! by [`VarId`]. Operations widen the inputs to the union of both operands, so the table
//! grows with the support of the function rather than with the universe. The first input
//! is the most significant bit of the row index.

use biodivine_lib_bdd::boolean_expression::BooleanExpression;

use super::{check_var, BooleanBackend, VarId, VariableUniverse};
use crate::error::{BenchError, Result};

/// Widest table the backend will build (2^24 rows).
pub const MAX_TABLE_INPUTS: usize = 24;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TruthTable {
    inputs: Vec<VarId>,
    outputs: Vec<bool>,
}

impl TruthTable {
    fn constant(value: bool) -> Self {
        TruthTable {
            inputs: Vec::new(),
            outputs: vec![value],
        }
    }

    #[cfg(test)]
    pub(crate) fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    pub fn row_count(&self) -> usize {
        self.outputs.len()
    }

    /// Output for the row in which each input takes the value given by `value_of`.
    fn output_at(&self, value_of: impl Fn(VarId) -> bool) -> bool {
        let row = self
            .inputs
            .iter()
            .fold(0usize, |row, var| (row << 1) | usize::from(value_of(*var)));
        self.outputs[row]
    }
}

/// Value of `var` in row `row` of a table over `inputs`.
fn bit_of(inputs: &[VarId], row: usize, var: VarId) -> bool {
    let position = inputs
        .binary_search(&var)
        .unwrap_or_else(|_| unreachable!("variable {} not among table inputs", var.0));
    (row >> (inputs.len() - 1 - position)) & 1 == 1
}

fn merge_inputs(left: &[VarId], right: &[VarId]) -> Vec<VarId> {
    let mut inputs: Vec<VarId> = left.iter().chain(right.iter()).copied().collect();
    inputs.sort();
    inputs.dedup();
    inputs
}

pub struct TableBackend {
    universe: VariableUniverse,
}

impl TableBackend {
    fn check_width(inputs: &[VarId]) -> Result<()> {
        if inputs.len() > MAX_TABLE_INPUTS {
            Err(BenchError::backend(
                Self::LABEL,
                format!(
                    "table over {} inputs exceeds the limit of {MAX_TABLE_INPUTS}",
                    inputs.len()
                ),
            ))
        } else {
            Ok(())
        }
    }

    /// Build a table over `inputs` whose rows are computed by `row_value`.
    fn tabulate(inputs: Vec<VarId>, row_value: impl Fn(&[VarId], usize) -> bool) -> Result<TruthTable> {
        Self::check_width(&inputs)?;
        let outputs = (0..(1usize << inputs.len()))
            .map(|row| row_value(&inputs, row))
            .collect();
        Ok(TruthTable { inputs, outputs })
    }

    fn apply(
        &self,
        left: &TruthTable,
        right: &TruthTable,
        op: impl Fn(bool, bool) -> bool,
    ) -> Result<TruthTable> {
        if left.inputs == right.inputs {
            let outputs = left
                .outputs
                .iter()
                .zip(right.outputs.iter())
                .map(|(a, b)| op(*a, *b))
                .collect();
            return Ok(TruthTable {
                inputs: left.inputs.clone(),
                outputs,
            });
        }
        let inputs = merge_inputs(&left.inputs, &right.inputs);
        Self::tabulate(inputs, |inputs, row| {
            let value_of = |var| bit_of(inputs, row, var);
            op(left.output_at(value_of), right.output_at(value_of))
        })
    }

    fn from_expression(&self, expression: &BooleanExpression) -> Result<TruthTable> {
        use BooleanExpression as E;
        let binary = |l: &BooleanExpression, r: &BooleanExpression, op: fn(bool, bool) -> bool| -> Result<TruthTable> {
            self.apply(&self.from_expression(l)?, &self.from_expression(r)?, op)
        };
        match expression {
            E::Const(value) => Ok(self.mk_const(*value)),
            E::Variable(name) => {
                let var = self.universe.var_by_name(name).ok_or_else(|| {
                    BenchError::backend(Self::LABEL, format!("unknown variable `{name}`"))
                })?;
                self.mk_literal(var, true)
            }
            E::Not(inner) => Ok(self.mk_not(&self.from_expression(inner)?)),
            E::And(l, r) => binary(l, r, |a, b| a && b),
            E::Or(l, r) => binary(l, r, |a, b| a || b),
            E::Xor(l, r) => binary(l, r, |a, b| a ^ b),
            E::Imp(l, r) => binary(l, r, |a, b| !a || b),
            E::Iff(l, r) => binary(l, r, |a, b| a == b),
            E::Cond(c, t, e) => {
                let c = self.from_expression(c)?;
                let then_part = self.mk_and(&c, &self.from_expression(t)?)?;
                let else_part = self.mk_and(&self.mk_not(&c), &self.from_expression(e)?)?;
                self.mk_or(&then_part, &else_part)
            }
        }
    }
}

impl BooleanBackend for TableBackend {
    type Node = TruthTable;

    const LABEL: &'static str = "Table";

    fn with_universe(universe: &VariableUniverse) -> Result<Self> {
        Ok(TableBackend {
            universe: universe.clone(),
        })
    }

    fn mk_literal(&self, var: VarId, polarity: bool) -> Result<TruthTable> {
        check_var(Self::LABEL, self.universe.len(), var)?;
        Ok(TruthTable {
            inputs: vec![var],
            outputs: vec![!polarity, polarity],
        })
    }

    fn mk_const(&self, value: bool) -> TruthTable {
        TruthTable::constant(value)
    }

    fn mk_and(&self, left: &TruthTable, right: &TruthTable) -> Result<TruthTable> {
        self.apply(left, right, |a, b| a && b)
    }

    fn mk_or(&self, left: &TruthTable, right: &TruthTable) -> Result<TruthTable> {
        self.apply(left, right, |a, b| a || b)
    }

    fn mk_xor(&self, left: &TruthTable, right: &TruthTable) -> Result<TruthTable> {
        self.apply(left, right, |a, b| a ^ b)
    }

    fn mk_not(&self, node: &TruthTable) -> TruthTable {
        TruthTable {
            inputs: node.inputs.clone(),
            outputs: node.outputs.iter().map(|x| !x).collect(),
        }
    }

    fn parse(&self, text: &str) -> Result<TruthTable> {
        let expression = BooleanExpression::try_from(text)
            .map_err(|e| BenchError::backend(Self::LABEL, e))?;
        self.from_expression(&expression)
    }

    /// Conjunction of one clause per falsifying row, each clause excluding exactly its row.
    /// A table without falsifying rows becomes the constant `true`.
    fn to_cnf(&self, node: &TruthTable) -> Result<TruthTable> {
        let mut cnf = self.mk_const(true);
        for row in (0..node.row_count()).filter(|row| !node.outputs[*row]) {
            let mut clause = self.mk_const(false);
            for var in &node.inputs {
                let literal = self.mk_literal(*var, !bit_of(&node.inputs, row, *var))?;
                clause = self.mk_or(&clause, &literal)?;
            }
            cnf = self.mk_and(&cnf, &clause)?;
        }
        Ok(cnf)
    }

    fn substitute(
        &self,
        node: &TruthTable,
        var: VarId,
        replacement: &TruthTable,
    ) -> Result<TruthTable> {
        check_var(Self::LABEL, self.universe.len(), var)?;
        if node.inputs.binary_search(&var).is_err() {
            return Ok(node.clone());
        }
        let remaining: Vec<VarId> = node.inputs.iter().copied().filter(|v| *v != var).collect();
        let inputs = merge_inputs(&remaining, &replacement.inputs);
        Self::tabulate(inputs, |inputs, row| {
            let value_of = |v| bit_of(inputs, row, v);
            let substituted = replacement.output_at(value_of);
            node.output_at(|v| if v == var { substituted } else { value_of(v) })
        })
    }

    fn evaluate(&self, node: &TruthTable, valuation: &[bool]) -> bool {
        node.output_at(|var| valuation[var.index()])
    }

    fn node_count(&self, node: &TruthTable) -> usize {
        node.row_count()
    }

    fn literal_of(&self, node: &TruthTable) -> Option<(VarId, bool)> {
        match (node.inputs.as_slice(), node.outputs.as_slice()) {
            ([var], [low, high]) if low != high => Some((*var, *high)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{all_valuations, check_contract};

    #[test]
    fn capability_contract() {
        check_contract::<TableBackend>();
    }

    #[test]
    fn inputs_follow_the_support() {
        let b = TableBackend::with_universe(&VariableUniverse::indexed(5)).unwrap();
        let x4 = b.mk_literal(VarId(4), true).unwrap();
        let x1 = b.mk_literal(VarId(1), false).unwrap();
        let f = b.mk_or(&x4, &x1).unwrap();
        assert_eq!(f.inputs(), &[VarId(1), VarId(4)]);
        assert_eq!(f.row_count(), 4);
        assert_eq!(b.mk_const(true).row_count(), 1);
    }

    #[test]
    fn substitution_grows_arity() {
        let b = TableBackend::with_universe(&VariableUniverse::indexed(3)).unwrap();
        let x0 = b.mk_literal(VarId(0), true).unwrap();
        let x1 = b.mk_literal(VarId(1), true).unwrap();
        let x2 = b.mk_literal(VarId(2), true).unwrap();
        let step = b.mk_xor(&x1, &x2).unwrap();
        let f = b.mk_xor(&x0, &x1).unwrap();
        let g = b.substitute(&f, VarId(1), &step).unwrap();
        assert_eq!(g.inputs(), &[VarId(0), VarId(1), VarId(2)]);
        for v in all_valuations(3) {
            assert_eq!(b.evaluate(&g, &v), v[0] ^ v[1] ^ v[2]);
        }
        // Substituting a variable outside the support is the identity.
        assert_eq!(b.substitute(&x0, VarId(2), &step).unwrap(), x0);
    }

    #[test]
    fn cnf_is_a_clause_per_falsifying_row() {
        let b = TableBackend::with_universe(&VariableUniverse::indexed(4)).unwrap();
        let f = b.parse("(x_0 & x_1) | (x_2 & x_3)").unwrap();
        assert_eq!(b.to_cnf(&f).unwrap(), f);

        // x_0 | x_1 falsifies one row only: a single clause.
        let single = b.parse("x_0 | x_1").unwrap();
        assert_eq!(b.to_cnf(&single).unwrap(), single);

        let tautology = b.parse("x_0 | !x_0").unwrap();
        assert_eq!(b.to_cnf(&tautology).unwrap(), b.mk_const(true));
        let contradiction = b.parse("x_1 & !x_1").unwrap();
        let cnf = b.to_cnf(&contradiction).unwrap();
        assert!(all_valuations(4).all(|v| !b.evaluate(&cnf, &v)));
    }

    #[test]
    fn cond_expression() {
        let b = TableBackend::with_universe(&VariableUniverse::indexed(3)).unwrap();
        let f = b.parse("x_0 ? x_1 : x_2").unwrap();
        assert_eq!(f.inputs(), &[VarId(0), VarId(1), VarId(2)]);
        for v in all_valuations(3) {
            assert_eq!(b.evaluate(&f, &v), if v[0] { v[1] } else { v[2] });
        }
    }

    #[test]
    fn width_limit_is_a_backend_failure() {
        let n = MAX_TABLE_INPUTS + 1;
        let b = TableBackend::with_universe(&VariableUniverse::indexed(n)).unwrap();
        let split = n / 2;
        let left = TruthTable {
            inputs: (0..split).map(VarId).collect(),
            outputs: vec![true; 1 << split],
        };
        let right = TruthTable {
            inputs: (split..n).map(VarId).collect(),
            outputs: vec![true; 1 << (n - split)],
        };
        assert!(matches!(
            b.mk_and(&left, &right),
            Err(BenchError::BackendFailure { .. })
        ));
        assert!(b.mk_and(&left, &left).is_ok());
    }
}
