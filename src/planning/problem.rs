#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::action::Action;
use crate::planning::condition::Condition;
use crate::planning::error::ProblemError;
use crate::planning::state::{FluentId, State};
use rustc_hash::FxHashMap;

/// A grounded planning problem: fluents, actions, an initial state and a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    fluents: Vec<String>,
    fluent_index: FxHashMap<String, FluentId>,
    actions: Vec<Action>,
    initial_state: State,
    goal: Condition,
}

impl Problem {
    /// Builds a problem, checking that every fluent index is in range.
    ///
    /// # Arguments
    ///
    /// * `fluents` - display names, one per fluent index.
    /// * `actions` - grounded actions, referred to by position.
    /// * `initial_state` - must have exactly one bit per fluent.
    /// * `goal` - the condition a final state has to satisfy.
    ///
    /// # Errors
    ///
    /// `ProblemError` if a condition or effect mentions a fluent beyond
    /// `fluents`, or the initial state has the wrong size.
    pub fn new(
        fluents: Vec<String>,
        actions: Vec<Action>,
        initial_state: State,
        goal: Condition,
    ) -> Result<Self, ProblemError> {
        let num_fluents = fluents.len();
        if initial_state.len() != num_fluents {
            return Err(ProblemError::InitialStateSize {
                expected: num_fluents,
                found: initial_state.len(),
            });
        }

        let check = |context: &dyn Fn() -> String, fluents: &[FluentId]| {
            fluents.iter().find(|&&f| f >= num_fluents).map_or(Ok(()), |&fluent| {
                Err(ProblemError::FluentOutOfRange {
                    context: context(),
                    fluent,
                    num_fluents,
                })
            })
        };

        check(&|| "goal".to_string(), goal.positive())?;
        check(&|| "goal".to_string(), goal.negative())?;
        for action in &actions {
            let context = || format!("action `{}`", action.name());
            check(&context, action.precondition().positive())?;
            check(&context, action.precondition().negative())?;
            for effect in action.effects() {
                check(&context, effect.guard.positive())?;
                check(&context, effect.guard.negative())?;
                check(&context, effect.effect.positive())?;
                check(&context, effect.effect.negative())?;
            }
        }

        let fluent_index = fluents
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            fluents,
            fluent_index,
            actions,
            initial_state,
            goal,
        })
    }

    #[must_use]
    pub fn num_fluents(&self) -> usize {
        self.fluents.len()
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn fluent_name(&self, fluent: FluentId) -> Option<&str> {
        self.fluents.get(fluent).map(String::as_str)
    }

    #[must_use]
    pub fn fluent_id(&self, name: &str) -> Option<FluentId> {
        self.fluent_index.get(name).copied()
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[must_use]
    pub fn action(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    #[must_use]
    pub const fn initial_state(&self) -> &State {
        &self.initial_state
    }

    #[must_use]
    pub const fn goal(&self) -> &Condition {
        &self.goal
    }
}
