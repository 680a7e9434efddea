#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bounded translation of a planning problem into CNF.
//!
//! For a horizon `T` there is one variable per fluent and time point `0..=T` and
//! one per action and step `0..T`. The clauses are satisfiable exactly when a
//! sequential plan of at most `T` actions exists; steps where no action is
//! selected are idle.
//!
//! Clause groups, in emission order:
//! - initial state: a unit clause for every fluent at time 0;
//! - goal: a unit clause for every goal literal at time `T`;
//! - preconditions: `¬a_t ∨ f_t` (or `¬f_t`) per precondition literal;
//! - effects: `¬a_t ∨ ¬guard_t ∨ ±f_t+1` per conditional effect literal. A delete
//!   also holds when one of the action's add-guards on the same fluent fires, so
//!   adds win over deletes exactly as in [`Action::successor`];
//! - frame axioms: a fluent changes only if an action that can change it runs,
//!   and for conditional adders and deleters only if one of their guards held;
//! - mutual exclusion: at most one action per step.
//!
//! [`Action::successor`]: crate::planning::action::Action::successor

use crate::planning::action::Action;
use crate::planning::condition::Condition;
use crate::planning::problem::Problem;
use crate::planning::state::FluentId;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::debug;

/// What a CNF variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Fluent { fluent: FluentId, time: usize },
    Action { action: usize, step: usize },
}

/// Bijection between (fluent, time) / (action, step) pairs and variables
/// `1..=num_variables` for one horizon.
///
/// Each time layer occupies `stride = num_fluents + num_actions` consecutive
/// ids, fluents first. The last layer, at time `T`, holds fluents only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableMap {
    num_fluents: usize,
    num_actions: usize,
    horizon: usize,
}

impl VariableMap {
    #[must_use]
    pub const fn new(num_fluents: usize, num_actions: usize, horizon: usize) -> Self {
        Self {
            num_fluents,
            num_actions,
            horizon,
        }
    }

    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub const fn stride(&self) -> usize {
        self.num_fluents + self.num_actions
    }

    #[must_use]
    pub const fn num_variables(&self) -> usize {
        self.horizon * self.stride() + self.num_fluents
    }

    /// Whether every id of this mapping fits the signed 32-bit literal range.
    #[must_use]
    pub const fn fits_literal_range(&self) -> bool {
        let Some(layers) = self.horizon.checked_mul(self.stride()) else {
            return false;
        };
        match layers.checked_add(self.num_fluents) {
            Some(total) => total <= i32::MAX.unsigned_abs() as usize,
            None => false,
        }
    }

    /// # Panics
    ///
    /// In debug builds, if `fluent` or `time` is out of range.
    #[must_use]
    pub fn fluent(&self, fluent: FluentId, time: usize) -> Variable {
        debug_assert!(fluent < self.num_fluents && time <= self.horizon);
        to_variable(time * self.stride() + fluent + 1)
    }

    /// # Panics
    ///
    /// In debug builds, if `action` or `step` is out of range.
    #[must_use]
    pub fn action(&self, action: usize, step: usize) -> Variable {
        debug_assert!(action < self.num_actions && step < self.horizon);
        to_variable(step * self.stride() + self.num_fluents + action + 1)
    }

    #[must_use]
    pub fn fluent_literal(&self, fluent: FluentId, time: usize, value: bool) -> Literal {
        Literal::new(self.fluent(fluent, time), value)
    }

    #[must_use]
    pub fn action_literal(&self, action: usize, step: usize, value: bool) -> Literal {
        Literal::new(self.action(action, step), value)
    }

    /// Inverse of [`fluent`](Self::fluent) and [`action`](Self::action).
    #[must_use]
    pub const fn decode(&self, variable: Variable) -> Option<VarKind> {
        let var = variable as usize;
        if var == 0 || var > self.num_variables() {
            return None;
        }
        let index = var - 1;
        let layer = index / self.stride();
        let offset = index % self.stride();
        if offset < self.num_fluents {
            Some(VarKind::Fluent {
                fluent: offset,
                time: layer,
            })
        } else {
            Some(VarKind::Action {
                action: offset - self.num_fluents,
                step: layer,
            })
        }
    }
}

fn to_variable(id: usize) -> Variable {
    Variable::try_from(id)
        .ok()
        .filter(|&v| i32::try_from(v).is_ok())
        .expect("encoding exceeds the variable range")
}

/// Number of clauses emitted per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClauseCounts {
    pub initial: usize,
    pub goal: usize,
    pub precondition: usize,
    pub effect: usize,
    pub frame: usize,
    pub mutex: usize,
}

impl ClauseCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.initial + self.goal + self.precondition + self.effect + self.frame + self.mutex
    }
}

/// The CNF of one horizon, together with the mapping needed to read models.
#[derive(Debug, Clone)]
pub struct Encoding {
    variables: VariableMap,
    cnf: Cnf,
    counts: ClauseCounts,
}

impl Encoding {
    #[must_use]
    pub const fn variables(&self) -> &VariableMap {
        &self.variables
    }

    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    #[must_use]
    pub const fn counts(&self) -> &ClauseCounts {
        &self.counts
    }
}

/// Guards under which one action adds and deletes each fluent it touches.
struct ActionSchema<'a> {
    adds: BTreeMap<FluentId, Vec<&'a Condition>>,
    deletes: BTreeMap<FluentId, Vec<&'a Condition>>,
}

impl<'a> ActionSchema<'a> {
    fn new(action: &'a Action) -> Self {
        let mut adds: BTreeMap<FluentId, Vec<&Condition>> = BTreeMap::new();
        let mut deletes: BTreeMap<FluentId, Vec<&Condition>> = BTreeMap::new();
        for effect in action.effects() {
            for &fluent in effect.effect.positive() {
                adds.entry(fluent).or_default().push(&effect.guard);
            }
            for &fluent in effect.effect.negative() {
                deletes.entry(fluent).or_default().push(&effect.guard);
            }
        }
        Self { adds, deletes }
    }

    fn add_guards(&self, fluent: FluentId) -> &[&'a Condition] {
        self.adds.get(&fluent).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Literals that are all true exactly when `condition` holds at `time`.
fn holds(map: &VariableMap, condition: &Condition, time: usize) -> Vec<Literal> {
    condition
        .literals()
        .map(|(fluent, value)| map.fluent_literal(fluent, time, value))
        .collect()
}

/// Literals whose disjunction is true exactly when `condition` fails at `time`.
fn fails(map: &VariableMap, condition: &Condition, time: usize) -> Vec<Literal> {
    condition
        .literals()
        .map(|(fluent, value)| map.fluent_literal(fluent, time, !value))
        .collect()
}

/// Clauses equivalent to `base ∨ (g_1 ∨ g_2 ∨ ...)` where each `g_i` is a
/// conjunction of literals. An empty conjunction is true, so the whole
/// disjunction is satisfied and nothing is emitted.
fn or_any_of(base: &[Literal], conjunctions: &[Vec<Literal>]) -> Vec<Vec<Literal>> {
    if conjunctions.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    if conjunctions.is_empty() {
        return vec![base.to_vec()];
    }
    conjunctions
        .iter()
        .map(|c| c.iter().copied())
        .multi_cartesian_product()
        .map(|pick| base.iter().copied().chain(pick).collect())
        .collect()
}

fn emit(cnf: &mut Cnf, counter: &mut usize, clause: Vec<Literal>) {
    cnf.add_clause(clause);
    *counter += 1;
}

/// Encodes `problem` for plans of at most `horizon` steps.
///
/// # Panics
///
/// If the encoding needs more than `i32::MAX` variables; see
/// [`VariableMap::fits_literal_range`].
#[must_use]
pub fn encode(problem: &Problem, horizon: usize) -> Encoding {
    let map = VariableMap::new(problem.num_fluents(), problem.num_actions(), horizon);
    let mut cnf = Cnf::new(map.num_variables());
    let mut counts = ClauseCounts::default();

    let init = problem.initial_state();
    for fluent in 0..problem.num_fluents() {
        let lit = map.fluent_literal(fluent, 0, init.holds(fluent));
        emit(&mut cnf, &mut counts.initial, vec![lit]);
    }

    for lit in holds(&map, problem.goal(), horizon) {
        emit(&mut cnf, &mut counts.goal, vec![lit]);
    }

    let schemas: Vec<ActionSchema<'_>> = problem.actions().iter().map(ActionSchema::new).collect();

    // adders[f] / deleters[f]: actions with at least one add / delete of f
    let mut adders = vec![Vec::new(); problem.num_fluents()];
    let mut deleters = vec![Vec::new(); problem.num_fluents()];
    for (index, schema) in schemas.iter().enumerate() {
        for &fluent in schema.adds.keys() {
            adders[fluent].push(index);
        }
        for &fluent in schema.deletes.keys() {
            deleters[fluent].push(index);
        }
    }

    for step in 0..horizon {
        let next = step + 1;

        for (index, (action, schema)) in problem.actions().iter().zip(&schemas).enumerate() {
            let not_a = map.action_literal(index, step, false);

            for lit in holds(&map, action.precondition(), step) {
                emit(&mut cnf, &mut counts.precondition, vec![not_a, lit]);
            }

            for (&fluent, guards) in &schema.adds {
                for guard in guards {
                    let mut clause = vec![not_a];
                    clause.extend(fails(&map, guard, step));
                    clause.push(map.fluent_literal(fluent, next, true));
                    emit(&mut cnf, &mut counts.effect, clause);
                }
            }

            for (&fluent, guards) in &schema.deletes {
                let add_guards: Vec<Vec<Literal>> = schema
                    .add_guards(fluent)
                    .iter()
                    .map(|g| holds(&map, g, step))
                    .collect();
                for guard in guards {
                    let mut base = vec![not_a];
                    base.extend(fails(&map, guard, step));
                    base.push(map.fluent_literal(fluent, next, false));
                    for clause in or_any_of(&base, &add_guards) {
                        emit(&mut cnf, &mut counts.effect, clause);
                    }
                }
            }

            // a change under this action needs one of its guards on that fluent
            for (&fluent, guards) in &schema.adds {
                let conjunctions: Vec<Vec<Literal>> =
                    guards.iter().map(|g| holds(&map, g, step)).collect();
                let base = [
                    not_a,
                    map.fluent_literal(fluent, step, true),
                    map.fluent_literal(fluent, next, false),
                ];
                for clause in or_any_of(&base, &conjunctions) {
                    emit(&mut cnf, &mut counts.frame, clause);
                }
            }
            for (&fluent, guards) in &schema.deletes {
                let conjunctions: Vec<Vec<Literal>> =
                    guards.iter().map(|g| holds(&map, g, step)).collect();
                let base = [
                    not_a,
                    map.fluent_literal(fluent, step, false),
                    map.fluent_literal(fluent, next, true),
                ];
                for clause in or_any_of(&base, &conjunctions) {
                    emit(&mut cnf, &mut counts.frame, clause);
                }
            }
        }

        for fluent in 0..problem.num_fluents() {
            let mut rises = vec![
                map.fluent_literal(fluent, step, true),
                map.fluent_literal(fluent, next, false),
            ];
            rises.extend(adders[fluent].iter().map(|&a| map.action_literal(a, step, true)));
            emit(&mut cnf, &mut counts.frame, rises);

            let mut falls = vec![
                map.fluent_literal(fluent, step, false),
                map.fluent_literal(fluent, next, true),
            ];
            falls.extend(deleters[fluent].iter().map(|&a| map.action_literal(a, step, true)));
            emit(&mut cnf, &mut counts.frame, falls);
        }

        for (a, b) in (0..problem.num_actions()).tuple_combinations() {
            emit(
                &mut cnf,
                &mut counts.mutex,
                vec![map.action_literal(a, step, false), map.action_literal(b, step, false)],
            );
        }
    }

    debug!(
        horizon,
        variables = map.num_variables(),
        clauses = counts.total(),
        "encoded problem"
    );

    Encoding {
        variables: map,
        cnf,
        counts,
    }
}
