#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Goal-distance estimators for forward search.
//!
//! This module provides:
//! - The `Heuristic` trait, the only thing the search engine knows about estimators.
//! - `Blind` and `GoalCount`, which look at the goal alone.
//! - `Relaxed`, which solves the delete relaxation of the problem: negative
//!   literals are dropped from preconditions, guards and goals, deletes are
//!   ignored and every conditional effect becomes an operator of its own. It
//!   aggregates the relaxed fluent costs as `h_max` (admissible), `h_add`, or
//!   the length of a relaxed plan (FF).
//! - `HeuristicType`, the user-facing selection, and `HeuristicImpls`, the
//!   concrete estimator it maps to.
//!
//! A state from which the relaxed goal is unreachable is estimated at
//! `f64::INFINITY`; such nodes sink to the bottom of the open list.

use crate::planning::condition::Condition;
use crate::planning::error::ConfigError;
use crate::planning::problem::Problem;
use crate::planning::state::{FluentId, State};
use clap::ValueEnum;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Estimates the number of actions needed to reach `goal` from `state`.
///
/// Implementations must be deterministic and never return a negative value.
pub trait Heuristic {
    fn estimate(&self, state: &State, goal: &Condition) -> f64;
}

/// `0` on goal states, `1` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blind;

impl Heuristic for Blind {
    fn estimate(&self, state: &State, goal: &Condition) -> f64 {
        if state.satisfies(goal) { 0.0 } else { 1.0 }
    }
}

/// Number of goal literals the state does not satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalCount;

impl Heuristic for GoalCount {
    #[allow(clippy::cast_precision_loss)]
    fn estimate(&self, state: &State, goal: &Condition) -> f64 {
        goal.literals()
            .filter(|&(f, value)| state.holds(f) != value)
            .count() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    Max,
    Sum,
    FastForward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RelaxedOperator {
    action: usize,
    pre: Vec<FluentId>,
    adds: Vec<FluentId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relaxed {
    relaxation: Relaxation,
    operators: Vec<RelaxedOperator>,
    num_fluents: usize,
}

impl Relaxed {
    #[must_use]
    pub fn new(problem: &Problem, relaxation: Relaxation) -> Self {
        let operators = problem
            .actions()
            .iter()
            .enumerate()
            .flat_map(|(action, a)| {
                a.effects()
                    .iter()
                    .filter(|e| !e.effect.positive().is_empty())
                    .map(move |e| RelaxedOperator {
                        action,
                        pre: a
                            .precondition()
                            .positive()
                            .iter()
                            .chain(e.guard.positive())
                            .copied()
                            .sorted_unstable()
                            .dedup()
                            .collect(),
                        adds: e.effect.positive().to_vec(),
                    })
            })
            .collect();

        Self {
            relaxation,
            operators,
            num_fluents: problem.num_fluents(),
        }
    }

    fn aggregate(&self, costs: impl Iterator<Item = f64>) -> f64 {
        match self.relaxation {
            Relaxation::Max => costs.fold(0.0, f64::max),
            Relaxation::Sum | Relaxation::FastForward => costs.sum(),
        }
    }

    /// Relaxed cost of every fluent from `state`, and the operator that last
    /// lowered it.
    fn fluent_costs(&self, state: &State) -> (Vec<f64>, Vec<Option<usize>>) {
        let mut cost = vec![f64::INFINITY; self.num_fluents];
        let mut supporter = vec![None; self.num_fluents];
        for fluent in state.true_fluents() {
            cost[fluent] = 0.0;
        }

        let mut changed = true;
        while changed {
            changed = false;
            for (index, op) in self.operators.iter().enumerate() {
                let reach = self.aggregate(op.pre.iter().map(|&f| cost[f])) + 1.0;
                if reach.is_infinite() {
                    continue;
                }
                for &fluent in &op.adds {
                    if reach < cost[fluent] {
                        cost[fluent] = reach;
                        supporter[fluent] = Some(index);
                        changed = true;
                    }
                }
            }
        }

        (cost, supporter)
    }

    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn relaxed_plan_length(&self, goal: &[FluentId], cost: &[f64], supporter: &[Option<usize>]) -> f64 {
        let mut used = vec![false; self.operators.len()];
        let mut actions = FxHashSet::default();
        let mut visited = vec![false; self.num_fluents];
        let mut open: Vec<FluentId> = goal.to_vec();

        while let Some(fluent) = open.pop() {
            if visited[fluent] || cost[fluent] == 0.0 {
                continue;
            }
            visited[fluent] = true;
            let Some(op) = supporter[fluent] else {
                return f64::INFINITY;
            };
            if !used[op] {
                used[op] = true;
                actions.insert(self.operators[op].action);
                open.extend(&self.operators[op].pre);
            }
        }

        actions.len() as f64
    }
}

impl Heuristic for Relaxed {
    fn estimate(&self, state: &State, goal: &Condition) -> f64 {
        let (cost, supporter) = self.fluent_costs(state);
        let goal = goal.positive();

        match self.relaxation {
            Relaxation::Max | Relaxation::Sum => self.aggregate(goal.iter().map(|&f| cost[f])),
            Relaxation::FastForward => {
                if goal.iter().any(|&f| cost[f].is_infinite()) {
                    return f64::INFINITY;
                }
                self.relaxed_plan_length(goal, &cost, &supporter)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum HeuristicType {
    /// 0 on goal states, 1 elsewhere
    Blind,
    /// Number of unsatisfied goal literals
    GoalCount,
    /// Delete relaxation, most expensive goal fluent (admissible)
    Max,
    /// Delete relaxation, sum over goal fluents
    Sum,
    /// Delete relaxation, length of a relaxed plan
    #[default]
    FastForward,
}

impl Display for HeuristicType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blind => write!(f, "blind"),
            Self::GoalCount => write!(f, "goal-count"),
            Self::Max => write!(f, "max"),
            Self::Sum => write!(f, "sum"),
            Self::FastForward => write!(f, "fast-forward"),
        }
    }
}

impl FromStr for HeuristicType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "blind" => Ok(Self::Blind),
            "goal-count" => Ok(Self::GoalCount),
            "max" => Ok(Self::Max),
            "sum" | "add" => Ok(Self::Sum),
            "fast-forward" | "ff" => Ok(Self::FastForward),
            _ => Err(ConfigError::UnknownHeuristic(s.to_string())),
        }
    }
}

impl HeuristicType {
    /// Builds the estimator for `problem`.
    #[must_use]
    pub fn to_impl(self, problem: &Problem) -> HeuristicImpls {
        match self {
            Self::Blind => HeuristicImpls::Blind(Blind),
            Self::GoalCount => HeuristicImpls::GoalCount(GoalCount),
            Self::Max => HeuristicImpls::Relaxed(Relaxed::new(problem, Relaxation::Max)),
            Self::Sum => HeuristicImpls::Relaxed(Relaxed::new(problem, Relaxation::Sum)),
            Self::FastForward => {
                HeuristicImpls::Relaxed(Relaxed::new(problem, Relaxation::FastForward))
            }
        }
    }

    /// Never overestimates under unit action costs.
    #[must_use]
    pub const fn is_admissible(self) -> bool {
        matches!(self, Self::Blind | Self::Max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeuristicImpls {
    Blind(Blind),
    GoalCount(GoalCount),
    Relaxed(Relaxed),
}

impl Heuristic for HeuristicImpls {
    fn estimate(&self, state: &State, goal: &Condition) -> f64 {
        match self {
            Self::Blind(h) => h.estimate(state, goal),
            Self::GoalCount(h) => h.estimate(state, goal),
            Self::Relaxed(h) => h.estimate(state, goal),
        }
    }
}
