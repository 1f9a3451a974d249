//! Adapter for `biodivine-lib-bdd`.

use biodivine_lib_bdd::boolean_expression::BooleanExpression;
use biodivine_lib_bdd::{Bdd, BddValuation, BddVariable, BddVariableSet};

use super::{check_var, BooleanBackend, VarId, VariableUniverse};
use crate::error::{BenchError, Result};

pub struct LibBdd {
    vars: BddVariableSet,
    variables: Vec<BddVariable>,
}

impl LibBdd {
    fn var(&self, var: VarId) -> Result<BddVariable> {
        check_var(Self::LABEL, self.variables.len(), var)?;
        Ok(self.variables[var.index()])
    }
}

impl BooleanBackend for LibBdd {
    type Node = Bdd;

    const LABEL: &'static str = "BDD";

    fn with_universe(universe: &VariableUniverse) -> Result<Self> {
        if universe.len() > usize::from(u16::MAX) {
            return Err(BenchError::backend(
                Self::LABEL,
                format!("{} variables exceed the u16 variable limit", universe.len()),
            ));
        }
        let names: Vec<&str> = universe.names().iter().map(String::as_str).collect();
        let vars = BddVariableSet::new(&names);
        let variables = vars.variables();
        Ok(LibBdd { vars, variables })
    }

    fn mk_literal(&self, var: VarId, polarity: bool) -> Result<Bdd> {
        Ok(self.vars.mk_literal(self.var(var)?, polarity))
    }

    fn mk_const(&self, value: bool) -> Bdd {
        if value {
            self.vars.mk_true()
        } else {
            self.vars.mk_false()
        }
    }

    fn mk_and(&self, left: &Bdd, right: &Bdd) -> Result<Bdd> {
        Ok(left.and(right))
    }

    fn mk_or(&self, left: &Bdd, right: &Bdd) -> Result<Bdd> {
        Ok(left.or(right))
    }

    fn mk_xor(&self, left: &Bdd, right: &Bdd) -> Result<Bdd> {
        Ok(left.xor(right))
    }

    fn mk_not(&self, node: &Bdd) -> Bdd {
        node.not()
    }

    fn parse(&self, text: &str) -> Result<Bdd> {
        let expression = BooleanExpression::try_from(text)
            .map_err(|e| BenchError::backend(Self::LABEL, e))?;
        self.vars.safe_eval_expression(&expression).ok_or_else(|| {
            BenchError::backend(Self::LABEL, format!("unknown variable in `{text}`"))
        })
    }

    fn to_cnf(&self, node: &Bdd) -> Result<Bdd> {
        Ok(self.vars.mk_cnf(&node.to_cnf()))
    }

    /// Shannon composition `ite(g, f|v=1, f|v=0)`, so `g` may mention `v` itself.
    fn substitute(&self, node: &Bdd, var: VarId, replacement: &Bdd) -> Result<Bdd> {
        let var = self.var(var)?;
        let high = node.restrict(&[(var, true)]);
        let low = node.restrict(&[(var, false)]);
        Ok(Bdd::if_then_else(replacement, &high, &low))
    }

    fn evaluate(&self, node: &Bdd, valuation: &[bool]) -> bool {
        node.eval_in(&BddValuation::new(valuation.to_vec()))
    }

    fn node_count(&self, node: &Bdd) -> usize {
        node.size()
    }

    fn literal_of(&self, node: &Bdd) -> Option<(VarId, bool)> {
        // Two terminals plus one decision node.
        if node.size() != 3 {
            return None;
        }
        let var = node.support_set().into_iter().next()?;
        let index = self.variables.iter().position(|v| *v == var)?;
        let mut valuation = vec![false; self.variables.len()];
        valuation[index] = true;
        Some((VarId(index), self.evaluate(node, &valuation)))
    }
}
