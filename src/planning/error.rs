#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Error types of the planning layer.

use crate::planning::state::FluentId;
use crate::sat::solver::SolverError;
use thiserror::Error;

/// Invalid search or SAT configuration, reported before any work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("heuristic weight must be a finite number greater than 0, got {0}")]
    InvalidWeight(f64),
    #[error("time budget must be greater than zero")]
    ZeroTimeout,
    #[error("unknown heuristic `{0}`")]
    UnknownHeuristic(String),
}

/// A problem whose parts refer to fluents it does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("{context} refers to fluent {fluent}, but the problem has {num_fluents} fluents")]
    FluentOutOfRange {
        context: String,
        fluent: FluentId,
        num_fluents: usize,
    },
    #[error("initial state has {found} fluents, expected {expected}")]
    InitialStateSize { expected: usize, found: usize },
}

/// Why a plan does not solve a problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("step {step}: no action with index {action}")]
    UnknownAction { step: usize, action: usize },
    #[error("step {step}: `{action}` is not applicable")]
    NotApplicable { step: usize, action: String },
    #[error("the plan does not reach the goal")]
    GoalNotReached,
}

/// A satisfying assignment that does not describe a sequential plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("actions {first} and {second} are both selected at step {step}")]
    MutexViolation {
        step: usize,
        first: usize,
        second: usize,
    },
}

/// Failure of a planning run. Not finding a plan is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("SAT solver failed: {0}")]
    Solver(#[from] SolverError),
    #[error("could not decode the solver model: {0}")]
    Decoding(#[from] DecodingError),
    #[error("horizon {max_horizon} needs more variables than a solver can address")]
    HorizonTooLarge { max_horizon: usize },
}
