#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conflict-driven clause learning.
//!
//! The solver keeps two watched literals per clause (positions 0 and 1),
//! propagates over the trail, learns a first-UIP clause on every conflict and
//! jumps back to the clause's second highest level. Decisions follow variable
//! activity, polarities come from saved phases and the search restarts on a
//! Luby schedule. Clauses are only ever added at the root level.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::conflict_analysis::analyse_conflict;
use crate::sat::literal::Literal;
use crate::sat::phase_saving::SavedPhases;
use crate::sat::restarter::Luby;
use crate::sat::solver::{SatSolver, SolverError, SolverStats};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::Vsids;
use crate::sat::watch::WatchedLiterals;
use std::time::Instant;
use tracing::trace;

/// Conflicts between two restarts, before Luby scaling.
const RESTART_UNIT: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct Cdcl {
    clauses: Vec<Clause>,
    watches: WatchedLiterals,
    assignment: Assignment,
    trail: Trail,
    selector: Vsids,
    phases: SavedPhases,
    restarter: Luby<RESTART_UNIT>,
    seen: Vec<bool>,
    max_variables: usize,
    /// Set once the formula is known to be unsatisfiable at the root level.
    inconsistent: bool,
    model: Vec<i32>,
    stats: SolverStats,
}

impl Cdcl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clauses currently held, learnt ones included.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    fn assign(&mut self, lit: Literal, reason: Reason) {
        self.assignment.assign(lit);
        self.trail.push(lit, reason);
    }

    fn backtrack_to(&mut self, level: usize) {
        if self.trail.decision_level() <= level {
            return;
        }
        for lit in self.trail.backtrack_to(level) {
            self.assignment.unassign(lit.variable());
            self.phases.save(lit);
            self.selector.reinsert(lit.variable());
        }
    }

    /// Unit propagation over the trail.
    ///
    /// # Returns
    ///
    /// The index of a clause whose literals are all false, if any.
    fn propagate(&mut self) -> Option<usize> {
        while self.trail.head < self.trail.len() {
            let lit = self.trail[self.trail.head];
            self.trail.head += 1;
            self.stats.propagations += 1;

            let false_lit = !lit;
            let mut watchers = self.watches.take(false_lit);
            let mut conflict = None;
            let mut i = 0;

            while i < watchers.len() {
                let idx = watchers[i];
                let clause = &mut self.clauses[idx];
                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }

                let first = clause[0];
                if self.assignment.literal_value(first) == Some(true) {
                    i += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&k| self.assignment.literal_value(clause[k]) != Some(false));
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    self.watches[clause[1]].push(idx);
                    watchers.swap_remove(i);
                    continue;
                }

                if self.assignment.literal_value(first) == Some(false) {
                    conflict = Some(idx);
                    break;
                }
                self.assign(first, Reason::Clause(idx));
                i += 1;
            }

            let mut pushed = std::mem::replace(&mut self.watches[false_lit], watchers);
            self.watches[false_lit].append(&mut pushed);

            if conflict.is_some() {
                return conflict;
            }
        }
        None
    }

    fn learn(&mut self, conflict: usize) {
        let analysis = analyse_conflict(&self.clauses, &self.trail, &mut self.seen, conflict);
        for var in analysis.involved {
            self.selector.bump(var);
        }
        self.selector.decay();

        self.backtrack_to(analysis.backtrack_level);
        let asserting = analysis.learnt[0];
        if analysis.learnt.len() == 1 {
            self.assign(asserting, Reason::Unit);
        } else {
            let idx = self.clauses.len();
            let clause = Clause::learnt(analysis.learnt);
            self.watches.add_clause(&clause, idx);
            self.clauses.push(clause);
            self.assign(asserting, Reason::Clause(idx));
        }
        self.stats.learnt_clauses += 1;
    }

    fn check_literal(&self, lit: Literal) -> Result<(), SolverError> {
        let var = lit.variable() as usize;
        if var == 0 || var > self.max_variables {
            return Err(SolverError::InvalidLiteral {
                literal: lit.to_i32(),
                max_variables: self.max_variables,
            });
        }
        Ok(())
    }

    fn contradiction(&mut self, literals: &[Literal]) -> SolverError {
        self.inconsistent = true;
        SolverError::Contradiction {
            clause: literals.iter().map(|l| l.to_i32()).collect(),
        }
    }
}

impl SatSolver for Cdcl {
    fn reserve(&mut self, max_variables: usize) {
        if max_variables <= self.max_variables {
            return;
        }
        self.max_variables = max_variables;
        self.assignment.grow(max_variables);
        self.trail.grow(max_variables);
        self.watches.grow(max_variables);
        self.selector.grow(max_variables);
        self.phases.grow(max_variables);
        self.seen.resize(max_variables + 1, false);
    }

    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), SolverError> {
        for &lit in literals {
            self.check_literal(lit)?;
        }
        if self.inconsistent {
            return Err(self.contradiction(literals));
        }
        self.backtrack_to(0);

        let mut clause = Clause::new(literals).normalised();
        if clause.is_tautology()
            || clause
                .iter()
                .any(|&l| self.assignment.literal_value(l) == Some(true))
        {
            return Ok(());
        }
        clause.retain(|l| self.assignment.literal_value(*l) != Some(false));

        match clause.len() {
            0 => Err(self.contradiction(literals)),
            1 => {
                self.assign(clause[0], Reason::Unit);
                if self.propagate().is_some() {
                    return Err(self.contradiction(literals));
                }
                Ok(())
            }
            _ => {
                let idx = self.clauses.len();
                self.watches.add_clause(&clause, idx);
                self.clauses.push(clause);
                Ok(())
            }
        }
    }

    fn check_satisfiable(&mut self, deadline: Option<Instant>) -> Result<bool, SolverError> {
        let start = Instant::now();
        let result = self.search(deadline);
        self.stats.elapsed += start.elapsed();
        self.stats.restarts = self.restarter.num_restarts();
        result
    }

    fn model(&self) -> Vec<i32> {
        self.model.clone()
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }
}

impl Cdcl {
    fn search(&mut self, deadline: Option<Instant>) -> Result<bool, SolverError> {
        if self.inconsistent {
            return Ok(false);
        }
        self.backtrack_to(0);

        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                self.backtrack_to(0);
                return Err(SolverError::Timeout);
            }

            if let Some(conflict) = self.propagate() {
                self.stats.conflicts += 1;
                if self.trail.decision_level() == 0 {
                    self.inconsistent = true;
                    return Ok(false);
                }
                self.learn(conflict);

                if self.restarter.should_restart() {
                    trace!(conflicts = self.stats.conflicts, "restart");
                    self.backtrack_to(0);
                }
                continue;
            }

            let Some(var) = self.selector.pick(&self.assignment) else {
                self.model = self.assignment.model();
                return Ok(true);
            };
            self.stats.decisions += 1;
            self.trail.new_decision_level();
            let polarity = self.phases.next(var);
            self.assign(Literal::new(var, polarity), Reason::Decision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::cnf::Cnf;
    use crate::sat::dimacs::parse_dimacs;
    use std::io::Cursor;
    use std::time::Duration;

    fn solver_for(cnf: &Cnf) -> Result<Cdcl, SolverError> {
        let mut solver = Cdcl::new();
        solver.reserve(cnf.num_vars());
        for clause in cnf.iter() {
            solver.add_clause(clause.literals())?;
        }
        Ok(solver)
    }

    /// Pigeonhole: `n + 1` pigeons into `n` holes.
    fn pigeonhole(n: i32) -> Cnf {
        let var = |p: i32, h: i32| p * n + h + 1;
        let mut clauses = Vec::new();
        for p in 0..=n {
            clauses.push((0..n).map(|h| var(p, h)).collect());
        }
        for h in 0..n {
            for p in 0..=n {
                for q in (p + 1)..=n {
                    clauses.push(vec![-var(p, h), -var(q, h)]);
                }
            }
        }
        Cnf::from(clauses)
    }

    #[test]
    fn test_satisfiable_model_verifies() {
        let input = "p cnf 5 6\n1 2 0\n-1 3 0\n-2 -3 0\n3 4 5 0\n-4 -5 0\n-3 -4 0\n";
        let cnf = parse_dimacs(Cursor::new(input)).unwrap();
        let mut solver = solver_for(&cnf).unwrap();

        assert_eq!(solver.check_satisfiable(None), Ok(true));
        let model = solver.model();
        assert_eq!(model.len(), 5);
        assert!(cnf.verify(&model));
    }

    #[test]
    fn test_pigeonhole_is_unsatisfiable() {
        let cnf = pigeonhole(4);
        let mut solver = solver_for(&cnf).unwrap();
        assert_eq!(solver.check_satisfiable(None), Ok(false));
        assert!(solver.stats().conflicts > 0);
    }

    #[test]
    fn test_contradictory_units_rejected_at_add_time() {
        let mut solver = Cdcl::new();
        solver.reserve(2);
        solver.add_clause(&[Literal::from(-1)]).unwrap();
        let err = solver.add_clause(&[Literal::from(1)]).unwrap_err();
        assert_eq!(err, SolverError::Contradiction { clause: vec![1] });
        assert_eq!(solver.check_satisfiable(None), Ok(false));
    }

    #[test]
    fn test_contradiction_through_propagation() {
        let mut solver = Cdcl::new();
        solver.reserve(3);
        solver.add_clause(&[Literal::from(-1), Literal::from(2)]).unwrap();
        solver.add_clause(&[Literal::from(-2), Literal::from(3)]).unwrap();
        solver.add_clause(&[Literal::from(-3)]).unwrap();
        assert!(matches!(
            solver.add_clause(&[Literal::from(1)]),
            Err(SolverError::Contradiction { .. })
        ));
    }

    #[test]
    fn test_invalid_literals() {
        let mut solver = Cdcl::new();
        solver.reserve(3);
        assert_eq!(
            solver.add_clause(&[Literal::from(0)]),
            Err(SolverError::InvalidLiteral {
                literal: 0,
                max_variables: 3
            })
        );
        assert!(matches!(
            solver.add_clause(&[Literal::from(2), Literal::from(-4)]),
            Err(SolverError::InvalidLiteral { literal: -4, .. })
        ));
    }

    #[test]
    fn test_empty_formula_is_satisfiable() {
        let mut solver = Cdcl::new();
        solver.reserve(2);
        assert_eq!(solver.check_satisfiable(None), Ok(true));
        assert_eq!(solver.model().len(), 2);
    }

    #[test]
    fn test_tautology_is_ignored() {
        let mut solver = Cdcl::new();
        solver.reserve(1);
        solver.add_clause(&[Literal::from(1), Literal::from(-1)]).unwrap();
        assert_eq!(solver.num_clauses(), 0);
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let cnf = pigeonhole(6);
        let mut solver = solver_for(&cnf).unwrap();
        let deadline = Instant::now().checked_sub(Duration::from_millis(1));
        assert_eq!(solver.check_satisfiable(deadline), Err(SolverError::Timeout));
    }
}
