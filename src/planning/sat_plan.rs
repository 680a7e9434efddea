#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Planning as satisfiability.
//!
//! Horizons `0, 1, 2, ...` are tried in turn. Each attempt encodes the problem
//! for that horizon, loads the clauses into a fresh solver and asks for a model
//! under the run's deadline. The first satisfiable horizon yields the plan, so
//! the plan has the fewest steps among all plans.

use crate::planning::config::SatConfig;
use crate::planning::decode::decode_model;
use crate::planning::encoding::{Encoding, VariableMap, encode};
use crate::planning::error::PlanningError;
use crate::planning::plan::{NoPlanReason, PlanOutcome};
use crate::planning::problem::Problem;
use crate::sat::cdcl::Cdcl;
use crate::sat::solver::{SatSolver, SolverError, SolverStats};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Counters collected over all horizons of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SatStats {
    /// Number of horizons encoded.
    pub horizons: usize,
    /// The horizon of the last attempt.
    pub last_horizon: usize,
    /// Variables and clauses of the last attempt's encoding.
    pub variables: usize,
    pub clauses: usize,
    /// Solver counters summed over all attempts.
    pub decisions: usize,
    pub conflicts: usize,
    pub propagations: usize,
    pub restarts: usize,
    pub elapsed: Duration,
}

impl SatStats {
    const fn absorb(&mut self, solver: &SolverStats) {
        self.decisions += solver.decisions;
        self.conflicts += solver.conflicts;
        self.propagations += solver.propagations;
        self.restarts += solver.restarts;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatOutcome {
    pub outcome: PlanOutcome,
    pub stats: SatStats,
}

/// Solves `problem` with the built-in CDCL solver.
///
/// # Errors
///
/// See [`solve_plan_via_sat_with`].
pub fn solve_plan_via_sat(problem: &Problem, config: &SatConfig) -> Result<SatOutcome, PlanningError> {
    solve_plan_via_sat_with(problem, config, Cdcl::new)
}

/// Runs the horizon loop with solvers created by `new_solver`, one per attempt.
///
/// A clause rejected as a root-level contradiction makes that horizon
/// unsatisfiable; no further clauses are added to that solver.
///
/// # Errors
///
/// - `PlanningError::Config` for an invalid configuration;
/// - `PlanningError::HorizonTooLarge` when the largest horizon needs more
///   variables than fit a literal;
/// - `PlanningError::Solver` when the solver rejects a literal;
/// - `PlanningError::Decoding` when a model does not describe a sequential plan.
///
/// Running out of horizons or time is reported through `PlanOutcome::NoPlan`.
pub fn solve_plan_via_sat_with<S, F>(
    problem: &Problem,
    config: &SatConfig,
    mut new_solver: F,
) -> Result<SatOutcome, PlanningError>
where
    S: SatSolver,
    F: FnMut() -> S,
{
    config.validate()?;
    let largest = VariableMap::new(problem.num_fluents(), problem.num_actions(), config.max_horizon());
    if !largest.fits_literal_range() {
        return Err(PlanningError::HorizonTooLarge {
            max_horizon: config.max_horizon(),
        });
    }
    let start = Instant::now();
    let deadline = start + config.timeout();
    let mut stats = SatStats::default();

    let mut outcome = PlanOutcome::NoPlan(NoPlanReason::HorizonExhausted {
        max_horizon: config.max_horizon(),
    });

    for horizon in 0..=config.max_horizon() {
        if Instant::now() >= deadline {
            outcome = PlanOutcome::NoPlan(NoPlanReason::Timeout);
            break;
        }

        let encoding = encode(problem, horizon);
        stats.horizons += 1;
        stats.last_horizon = horizon;
        stats.variables = encoding.variables().num_variables();
        stats.clauses = encoding.cnf().len();

        let mut solver = new_solver();
        let verdict = attempt(&mut solver, &encoding, deadline);
        stats.absorb(&solver.stats());

        match verdict {
            Ok(true) => {
                let plan = decode_model(&solver.model(), encoding.variables())?;
                outcome = PlanOutcome::Found(plan);
                break;
            }
            Ok(false) => debug!(horizon, "horizon is unsatisfiable"),
            Err(SolverError::Timeout) => {
                outcome = PlanOutcome::NoPlan(NoPlanReason::Timeout);
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    stats.elapsed = start.elapsed();
    match &outcome {
        PlanOutcome::Found(plan) => {
            info!(horizon = stats.last_horizon, length = plan.len(), "SAT encoding found a plan");
        }
        PlanOutcome::NoPlan(reason) => {
            info!(%reason, horizons = stats.horizons, "SAT encoding found no plan");
        }
    }

    Ok(SatOutcome { outcome, stats })
}

/// Loads one encoding and decides it.
fn attempt<S: SatSolver>(
    solver: &mut S,
    encoding: &Encoding,
    deadline: Instant,
) -> Result<bool, SolverError> {
    solver.reserve(encoding.variables().num_variables());
    for clause in encoding.cnf().iter() {
        match solver.add_clause(clause.literals()) {
            Ok(()) => {}
            Err(SolverError::Contradiction { clause }) => {
                debug!(
                    horizon = encoding.variables().horizon(),
                    ?clause,
                    "contradiction while loading clauses"
                );
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
    }
    solver.check_satisfiable(Some(deadline))
}
