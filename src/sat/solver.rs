#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The contract a SAT engine has to honour to be driven by the planner.
//!
//! The planner talks to solvers only through [`SatSolver`]: it reserves the
//! variable range of one encoding, streams clauses in, asks for a verdict under
//! an optional deadline and reads back the model.

use crate::sat::literal::Literal;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The clause made the formula unsatisfiable at the root level.
    #[error("clause {clause:?} contradicts the formula at the root level")]
    Contradiction { clause: Vec<i32> },
    /// Literal `0`, or a variable beyond the reserved range.
    #[error("literal {literal} is outside the reserved range of {max_variables} variables")]
    InvalidLiteral { literal: i32, max_variables: usize },
    #[error("satisfiability check ran out of time")]
    Timeout,
}

/// Counters reported by a solver after a call to `check_satisfiable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub restarts: usize,
    pub learnt_clauses: usize,
    pub elapsed: Duration,
}

pub trait SatSolver {
    /// Makes variables `1..=max_variables` available. Calling it again with a
    /// larger bound grows the range.
    fn reserve(&mut self, max_variables: usize);

    /// Adds a clause at the root level.
    ///
    /// # Errors
    ///
    /// `SolverError::InvalidLiteral` for a literal outside the reserved range,
    /// `SolverError::Contradiction` when the clause makes the formula trivially
    /// unsatisfiable. After a contradiction the formula stays unsatisfiable.
    fn add_clause(&mut self, literals: &[Literal]) -> Result<(), SolverError>;

    /// Decides the formula built so far.
    ///
    /// # Errors
    ///
    /// `SolverError::Timeout` if `deadline` passes before a verdict.
    fn check_satisfiable(&mut self, deadline: Option<Instant>) -> Result<bool, SolverError>;

    /// The satisfying assignment found by the last successful check, one signed
    /// literal per reserved variable.
    fn model(&self) -> Vec<i32>;

    fn stats(&self) -> SolverStats {
        SolverStats::default()
    }
}
