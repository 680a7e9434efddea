#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! An in-memory CNF formula: a list of clauses over variables `1..=num_vars`.

use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use core::ops::Index;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    num_vars: usize,
}

impl Cnf {
    /// Creates an empty formula over `num_vars` variables.
    #[must_use]
    pub const fn new(num_vars: usize) -> Self {
        Self {
            clauses: Vec::new(),
            num_vars,
        }
    }

    pub fn add_clause(&mut self, clause: impl Into<Clause>) {
        let clause = clause.into();
        if let Some(max) = clause.iter().map(|l| l.variable() as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }

    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Checks a model against every clause.
    ///
    /// # Arguments
    ///
    /// * `model` - signed literals, as returned by a solver's `model()`.
    ///
    /// # Returns
    ///
    /// `true` if every clause has at least one literal present in the model.
    #[must_use]
    pub fn verify(&self, model: &[i32]) -> bool {
        let mut values = vec![None; self.num_vars + 1];
        for &lit in model {
            let var = lit.unsigned_abs() as usize;
            if let Some(slot) = values.get_mut(var) {
                *slot = Some(lit > 0);
            }
        }

        self.clauses.iter().all(|clause| {
            clause.iter().any(|lit: &Literal| {
                values
                    .get(lit.variable() as usize)
                    .copied()
                    .flatten()
                    .is_some_and(|value| value == lit.polarity())
            })
        })
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl From<Vec<Vec<i32>>> for Cnf {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        let mut cnf = Self::new(0);
        for clause in clauses {
            cnf.add_clause(clause);
        }
        cnf
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        crate::sat::dimacs::format_dimacs(self, f)
    }
}
