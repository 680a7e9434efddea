#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::literal::{Literal, Variable};
use std::ops::Index;
use std::vec::Drain;

#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash)]
pub enum Reason {
    #[default]
    Decision,
    /// Fixed at the root level by a unit clause.
    Unit,
    /// Implied by the clause at this index; the implied literal sits at position 0.
    Clause(usize),
}

/// Assigned literals in assignment order, with the decision level and reason of
/// every assigned variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    steps: Vec<Literal>,
    level_starts: Vec<usize>,
    levels: Vec<usize>,
    reasons: Vec<Reason>,
    /// Next trail position to propagate.
    pub head: usize,
}

impl Index<usize> for Trail {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl Trail {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            steps: Vec::with_capacity(num_vars),
            level_starts: Vec::new(),
            levels: vec![0; num_vars + 1],
            reasons: vec![Reason::Decision; num_vars + 1],
            head: 0,
        }
    }

    pub fn grow(&mut self, num_vars: usize) {
        if self.levels.len() < num_vars + 1 {
            self.levels.resize(num_vars + 1, 0);
            self.reasons.resize(num_vars + 1, Reason::Decision);
        }
    }

    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.level_starts.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn new_decision_level(&mut self) {
        self.level_starts.push(self.steps.len());
    }

    pub fn push(&mut self, lit: Literal, reason: Reason) {
        let var = lit.variable() as usize;
        self.levels[var] = self.decision_level();
        self.reasons[var] = reason;
        self.steps.push(lit);
    }

    #[must_use]
    pub fn level(&self, var: Variable) -> usize {
        self.levels[var as usize]
    }

    #[must_use]
    pub fn reason(&self, var: Variable) -> Reason {
        self.reasons[var as usize]
    }

    /// Pops every literal assigned above `level`, most recent last.
    pub fn backtrack_to(&mut self, level: usize) -> Drain<'_, Literal> {
        let start = self
            .level_starts
            .get(level)
            .copied()
            .unwrap_or(self.steps.len());
        self.level_starts.truncate(level);
        self.head = self.head.min(start);
        self.steps.drain(start..)
    }
}
