#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Weighted A* over the explicit state space.
//!
//! Nodes are ordered by `f = weight * h + g` with unit action costs. A state is
//! expanded at most once: the closed set is checked when a node is popped and
//! when successors are generated. With `weight = 1` and an admissible, consistent
//! estimator (`Blind`, `Max`) the first plan found is cost-minimal; larger
//! weights trade plan quality for fewer expansions.

use crate::planning::config::SearchConfig;
use crate::planning::error::ConfigError;
use crate::planning::extract::extract_plan;
use crate::planning::heuristic::{Heuristic, HeuristicType};
use crate::planning::node::{Node, NodeArena};
use crate::planning::open_list::{ClosedSet, OpenList};
use crate::planning::plan::{NoPlanReason, PlanOutcome};
use crate::planning::problem::Problem;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: usize,
    /// Successor nodes pushed onto the open list.
    pub generated: usize,
    /// Popped nodes whose state had already been expanded.
    pub duplicates: usize,
    /// Successors dropped because their state was already expanded.
    pub pruned: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub outcome: PlanOutcome,
    pub stats: SearchStats,
}

/// Searches for a plan from the initial state to the goal.
///
/// # Arguments
///
/// * `problem` - the grounded problem.
/// * `heuristic` - goal-distance estimator queried once per generated node.
/// * `config` - weight and time budget. The budget is checked once per expansion.
///
/// # Errors
///
/// `ConfigError` if `config` is invalid. Running out of states or time is
/// reported through `PlanOutcome::NoPlan`.
pub fn search_plan<H: Heuristic + ?Sized>(
    problem: &Problem,
    heuristic: &H,
    config: &SearchConfig,
) -> Result<SearchOutcome, ConfigError> {
    config.validate()?;
    let start = Instant::now();
    let goal = problem.goal();

    let mut stats = SearchStats::default();
    let mut arena = NodeArena::default();
    let mut open = OpenList::new(config.weight());
    let mut closed = ClosedSet::default();

    let init = problem.initial_state().clone();
    let h = heuristic.estimate(&init, goal);
    debug!(h, weight = config.weight(), "starting search");
    let root = arena.push(Node::root(init, h));
    open.push(root, &arena[root]);

    let outcome = loop {
        if start.elapsed() >= config.timeout() {
            break PlanOutcome::NoPlan(NoPlanReason::Timeout);
        }
        let Some(current) = open.pop() else {
            break PlanOutcome::NoPlan(NoPlanReason::Exhausted);
        };

        let node = &arena[current];
        if !closed.insert(node.state().clone()) {
            stats.duplicates += 1;
            continue;
        }
        stats.expanded += 1;

        if node.state().satisfies(goal) {
            break PlanOutcome::Found(extract_plan(&arena, current));
        }

        let state = node.state().clone();
        let cost = node.cost() + 1.0;
        for (index, action) in problem.actions().iter().enumerate() {
            if !action.is_applicable(&state) {
                continue;
            }
            let next = action.successor(&state);
            if closed.contains(&next) {
                stats.pruned += 1;
                continue;
            }
            let h = heuristic.estimate(&next, goal);
            let child = arena.push(Node::child(next, current, index, cost, h));
            open.push(child, &arena[child]);
            stats.generated += 1;
        }
    };

    stats.elapsed = start.elapsed();
    match &outcome {
        PlanOutcome::Found(plan) => info!(
            length = plan.len(),
            expanded = stats.expanded,
            generated = stats.generated,
            "search found a plan"
        ),
        PlanOutcome::NoPlan(reason) => info!(
            %reason,
            expanded = stats.expanded,
            generated = stats.generated,
            "search found no plan"
        ),
    }

    Ok(SearchOutcome { outcome, stats })
}

/// Builds the estimator named by `heuristic` and runs [`search_plan`] with it.
///
/// # Errors
///
/// `ConfigError` if `config` is invalid.
pub fn search_plan_with(
    problem: &Problem,
    heuristic: HeuristicType,
    config: &SearchConfig,
) -> Result<SearchOutcome, ConfigError> {
    let estimator = heuristic.to_impl(problem);
    search_plan(problem, &estimator, config)
}
