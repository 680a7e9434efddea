#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::condition::{Condition, ConditionalEffect, Effect};
use crate::planning::state::State;
use smallvec::SmallVec;

/// A grounded action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    name: String,
    precondition: Condition,
    effects: Vec<ConditionalEffect>,
}

impl Action {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        precondition: Condition,
        effects: Vec<ConditionalEffect>,
    ) -> Self {
        Self {
            name: name.into(),
            precondition,
            effects,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn precondition(&self) -> &Condition {
        &self.precondition
    }

    #[must_use]
    pub fn effects(&self) -> &[ConditionalEffect] {
        &self.effects
    }

    #[must_use]
    pub fn is_applicable(&self, state: &State) -> bool {
        state.satisfies(&self.precondition)
    }

    /// The state reached by applying the action to `state`.
    ///
    /// Guards are evaluated in `state`. Deletes of all fired effects are applied
    /// before their adds, so a fluent both added and deleted ends up true and the
    /// order of the effects does not matter.
    ///
    /// Applicability is not checked.
    #[must_use]
    pub fn successor(&self, state: &State) -> State {
        let fired: SmallVec<[&Effect; 4]> = self
            .effects
            .iter()
            .filter(|e| state.satisfies(&e.guard))
            .map(|e| &e.effect)
            .collect();

        let mut next = state.clone();
        for effect in &fired {
            for &fluent in effect.negative() {
                next.set(fluent, false);
            }
        }
        for effect in &fired {
            for &fluent in effect.positive() {
                next.set(fluent, true);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle() -> Action {
        // 0 = on, 1 = off, 2 = counted
        Action::new(
            "toggle",
            Condition::default(),
            vec![
                ConditionalEffect::new(Condition::new([0], []), Effect::new([1], [0])),
                ConditionalEffect::new(Condition::new([1], []), Effect::new([0], [1])),
                ConditionalEffect::unconditional(Effect::new([2], [])),
            ],
        )
    }

    #[test]
    fn test_guards_see_the_parent_state() {
        let on = State::from_fluents(3, [0]);
        let next = toggle().successor(&on);
        assert_eq!(next, State::from_fluents(3, [1, 2]));

        let back = toggle().successor(&next);
        assert_eq!(back, State::from_fluents(3, [0, 2]));
    }

    #[test]
    fn test_add_wins_over_delete() {
        let action = Action::new(
            "both",
            Condition::default(),
            vec![
                ConditionalEffect::unconditional(Effect::new([0], [])),
                ConditionalEffect::unconditional(Effect::new([], [0])),
            ],
        );
        assert!(action.successor(&State::new(1)).holds(0));
        assert!(action.successor(&State::from_fluents(1, [0])).holds(0));
    }

    #[test]
    fn test_applicability() {
        let action = Action::new("a", Condition::new([0], [1]), vec![]);
        assert!(action.is_applicable(&State::from_fluents(2, [0])));
        assert!(!action.is_applicable(&State::from_fluents(2, [0, 1])));
        assert!(!action.is_applicable(&State::new(2)));
    }
}
