//! Expression-tree backend.
//!
//! Nodes are immutable `Rc` trees built exactly as requested (no constant folding, no
//! hash-consing), so the cost of each workload is the cost of its syntax.

use std::rc::Rc;

use biodivine_lib_bdd::boolean_expression::BooleanExpression;

use super::{check_var, BooleanBackend, VarId, VariableUniverse};
use crate::error::{BenchError, Result};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    Const(bool),
    Var(VarId),
    Not(Rc<Expr>),
    And(Rc<Expr>, Rc<Expr>),
    Or(Rc<Expr>, Rc<Expr>),
    Xor(Rc<Expr>, Rc<Expr>),
}

pub type ExprRef = Rc<Expr>;

/// A CNF literal.
type Lit = (VarId, bool);
/// A disjunction of literals, sorted and without duplicates.
type Clause = Vec<Lit>;

pub struct ExprTree {
    universe: VariableUniverse,
}

impl ExprTree {
    fn from_expression(&self, expression: &BooleanExpression) -> Result<ExprRef> {
        use BooleanExpression as E;
        let node = match expression {
            E::Const(value) => Expr::Const(*value),
            E::Variable(name) => {
                let var = self.universe.var_by_name(name).ok_or_else(|| {
                    BenchError::backend(Self::LABEL, format!("unknown variable `{name}`"))
                })?;
                Expr::Var(var)
            }
            E::Not(inner) => Expr::Not(self.from_expression(inner)?),
            E::And(l, r) => Expr::And(self.from_expression(l)?, self.from_expression(r)?),
            E::Or(l, r) => Expr::Or(self.from_expression(l)?, self.from_expression(r)?),
            E::Xor(l, r) => Expr::Xor(self.from_expression(l)?, self.from_expression(r)?),
            E::Imp(l, r) => {
                Expr::Or(Rc::new(Expr::Not(self.from_expression(l)?)), self.from_expression(r)?)
            }
            E::Iff(l, r) => Expr::Not(Rc::new(Expr::Xor(
                self.from_expression(l)?,
                self.from_expression(r)?,
            ))),
            // c ? t : e  ==  (c & t) | (!c & e), with `c` shared.
            E::Cond(c, t, e) => {
                let c = self.from_expression(c)?;
                Expr::Or(
                    Rc::new(Expr::And(c.clone(), self.from_expression(t)?)),
                    Rc::new(Expr::And(Rc::new(Expr::Not(c)), self.from_expression(e)?)),
                )
            }
        };
        Ok(Rc::new(node))
    }
}

impl BooleanBackend for ExprTree {
    type Node = ExprRef;

    const LABEL: &'static str = "Expr";

    fn with_universe(universe: &VariableUniverse) -> Result<Self> {
        Ok(ExprTree {
            universe: universe.clone(),
        })
    }

    fn mk_literal(&self, var: VarId, polarity: bool) -> Result<ExprRef> {
        check_var(Self::LABEL, self.universe.len(), var)?;
        let literal = Rc::new(Expr::Var(var));
        Ok(if polarity {
            literal
        } else {
            Rc::new(Expr::Not(literal))
        })
    }

    fn mk_const(&self, value: bool) -> ExprRef {
        Rc::new(Expr::Const(value))
    }

    fn mk_and(&self, left: &ExprRef, right: &ExprRef) -> Result<ExprRef> {
        Ok(Rc::new(Expr::And(left.clone(), right.clone())))
    }

    fn mk_or(&self, left: &ExprRef, right: &ExprRef) -> Result<ExprRef> {
        Ok(Rc::new(Expr::Or(left.clone(), right.clone())))
    }

    fn mk_xor(&self, left: &ExprRef, right: &ExprRef) -> Result<ExprRef> {
        Ok(Rc::new(Expr::Xor(left.clone(), right.clone())))
    }

    fn mk_not(&self, node: &ExprRef) -> ExprRef {
        Rc::new(Expr::Not(node.clone()))
    }

    fn parse(&self, text: &str) -> Result<ExprRef> {
        let expression = BooleanExpression::try_from(text)
            .map_err(|e| BenchError::backend(Self::LABEL, e))?;
        self.from_expression(&expression)
    }

    fn to_cnf(&self, node: &ExprRef) -> Result<ExprRef> {
        let clauses = cnf_clauses(node, true);
        let mut result: Option<ExprRef> = None;
        for clause in clauses {
            let mut disjunction: Option<ExprRef> = None;
            for (var, polarity) in clause {
                let literal = self.mk_literal(var, polarity)?;
                disjunction = Some(match disjunction {
                    None => literal,
                    Some(acc) => self.mk_or(&acc, &literal)?,
                });
            }
            let disjunction = disjunction.unwrap_or_else(|| self.mk_const(false));
            result = Some(match result {
                None => disjunction,
                Some(acc) => self.mk_and(&acc, &disjunction)?,
            });
        }
        Ok(result.unwrap_or_else(|| self.mk_const(true)))
    }

    fn substitute(&self, node: &ExprRef, var: VarId, replacement: &ExprRef) -> Result<ExprRef> {
        check_var(Self::LABEL, self.universe.len(), var)?;
        Ok(substitute(node, var, replacement))
    }

    fn evaluate(&self, node: &ExprRef, valuation: &[bool]) -> bool {
        evaluate(node, valuation)
    }

    fn node_count(&self, node: &ExprRef) -> usize {
        match node.as_ref() {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Not(inner) => 1 + self.node_count(inner),
            Expr::And(l, r) | Expr::Or(l, r) | Expr::Xor(l, r) => {
                1 + self.node_count(l) + self.node_count(r)
            }
        }
    }

    fn literal_of(&self, node: &ExprRef) -> Option<(VarId, bool)> {
        match node.as_ref() {
            Expr::Var(var) => Some((*var, true)),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Var(var) => Some((*var, false)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn evaluate(node: &Expr, valuation: &[bool]) -> bool {
    match node {
        Expr::Const(value) => *value,
        Expr::Var(var) => valuation[var.index()],
        Expr::Not(inner) => !evaluate(inner, valuation),
        Expr::And(l, r) => evaluate(l, valuation) && evaluate(r, valuation),
        Expr::Or(l, r) => evaluate(l, valuation) || evaluate(r, valuation),
        Expr::Xor(l, r) => evaluate(l, valuation) ^ evaluate(r, valuation),
    }
}

fn substitute(node: &ExprRef, var: VarId, replacement: &ExprRef) -> ExprRef {
    match node.as_ref() {
        Expr::Var(v) if *v == var => replacement.clone(),
        Expr::Const(_) | Expr::Var(_) => node.clone(),
        Expr::Not(inner) => Rc::new(Expr::Not(substitute(inner, var, replacement))),
        Expr::And(l, r) => Rc::new(Expr::And(
            substitute(l, var, replacement),
            substitute(r, var, replacement),
        )),
        Expr::Or(l, r) => Rc::new(Expr::Or(
            substitute(l, var, replacement),
            substitute(r, var, replacement),
        )),
        Expr::Xor(l, r) => Rc::new(Expr::Xor(
            substitute(l, var, replacement),
            substitute(r, var, replacement),
        )),
    }
}

/// Clauses of `node` (when `positive`) or of its negation, by distribution over the
/// negation normal form. Tautological and repeated clauses are dropped.
fn cnf_clauses(node: &Expr, positive: bool) -> Vec<Clause> {
    let mut clauses = match (node, positive) {
        (Expr::Const(value), _) => {
            if *value == positive {
                Vec::new()
            } else {
                vec![Vec::new()]
            }
        }
        (Expr::Var(var), _) => vec![vec![(*var, positive)]],
        (Expr::Not(inner), _) => cnf_clauses(inner, !positive),
        (Expr::And(l, r), true) | (Expr::Or(l, r), false) => {
            let mut left = cnf_clauses(l, positive);
            left.extend(cnf_clauses(r, positive));
            left
        }
        (Expr::Or(l, r), true) | (Expr::And(l, r), false) => {
            product(&cnf_clauses(l, positive), &cnf_clauses(r, positive))
        }
        // a ^ b  ==  (a | b) & (!a | !b)
        (Expr::Xor(l, r), true) => {
            let mut result = product(&cnf_clauses(l, true), &cnf_clauses(r, true));
            result.extend(product(&cnf_clauses(l, false), &cnf_clauses(r, false)));
            result
        }
        // !(a ^ b)  ==  (a | !b) & (!a | b)
        (Expr::Xor(l, r), false) => {
            let mut result = product(&cnf_clauses(l, true), &cnf_clauses(r, false));
            result.extend(product(&cnf_clauses(l, false), &cnf_clauses(r, true)));
            result
        }
    };
    clauses.sort();
    clauses.dedup();
    clauses
}

/// Pairwise disjunction of two clause sets.
fn product(left: &[Clause], right: &[Clause]) -> Vec<Clause> {
    let mut result = Vec::with_capacity(left.len() * right.len());
    for a in left {
        for b in right {
            let mut clause: Clause = a.iter().chain(b.iter()).copied().collect();
            clause.sort();
            clause.dedup();
            let tautology = clause.windows(2).any(|w| w[0].0 == w[1].0);
            if !tautology {
                result.push(clause);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{all_valuations, check_contract};

    #[test]
    fn capability_contract() {
        check_contract::<ExprTree>();
    }

    #[test]
    fn parse_single_variable_has_no_connectives() {
        let universe = VariableUniverse::new(vec!["v_IMPDH2".to_string()]).unwrap();
        let b = ExprTree::with_universe(&universe).unwrap();
        let node = b.parse("v_IMPDH2").unwrap();
        assert_eq!(*node, Expr::Var(VarId(0)));
        assert_eq!(b.node_count(&node), 1);
    }

    #[test]
    fn cnf_shape() {
        let b = ExprTree::with_universe(&VariableUniverse::indexed(4)).unwrap();
        let f = b.parse("(x_0 & x_1) | (x_2 & x_3)").unwrap();
        let cnf = b.to_cnf(&f).unwrap();
        // Four two-literal clauses.
        assert_eq!(cnf_clauses(&cnf, true).len(), 4);
        for v in all_valuations(4) {
            assert_eq!(b.evaluate(&f, &v), b.evaluate(&cnf, &v));
        }

        let tautology = b.parse("x_0 | !x_0").unwrap();
        assert_eq!(*b.to_cnf(&tautology).unwrap(), Expr::Const(true));
        let contradiction = b.parse("x_0 & !x_0").unwrap();
        let cnf = b.to_cnf(&contradiction).unwrap();
        assert!(all_valuations(4).all(|v| !b.evaluate(&cnf, &v)));
    }

    #[test]
    fn cond_shares_its_condition() {
        let b = ExprTree::with_universe(&VariableUniverse::indexed(3)).unwrap();
        let f = b.parse("x_0 ? x_1 : x_2").unwrap();
        let Expr::Or(then_part, else_part) = f.as_ref() else {
            panic!("unexpected shape {f:?}");
        };
        let (Expr::And(c, _), Expr::And(not_c, _)) = (then_part.as_ref(), else_part.as_ref()) else {
            panic!("unexpected branches {f:?}");
        };
        let Expr::Not(negated) = not_c.as_ref() else {
            panic!("unexpected else condition {not_c:?}");
        };
        assert!(Rc::ptr_eq(c, negated));
        for v in all_valuations(3) {
            assert_eq!(b.evaluate(&f, &v), if v[0] { v[1] } else { v[2] });
        }
    }

    #[test]
    fn substitution_replaces_every_occurrence() {
        let b = ExprTree::with_universe(&VariableUniverse::indexed(2)).unwrap();
        let f = b.parse("x_0 & !x_0 | x_1").unwrap();
        let g = b.parse("x_1").unwrap();
        let h = b.substitute(&f, VarId(0), &g).unwrap();
        assert_eq!(b.node_count(&h), b.node_count(&f));
        for v in all_valuations(2) {
            assert_eq!(b.evaluate(&h, &v), v[1]);
        }
    }
}
