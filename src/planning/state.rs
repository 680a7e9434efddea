#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::condition::Condition;
use bit_vec::BitVec;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Index of a fluent in its problem, `0..num_fluents`.
pub type FluentId = usize;

/// A world state under the closed-world assumption: one bit per fluent, set
/// when the fluent holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct State(BitVec);

impl State {
    /// The state where no fluent holds.
    #[must_use]
    pub fn new(num_fluents: usize) -> Self {
        Self(BitVec::from_elem(num_fluents, false))
    }

    #[must_use]
    pub fn from_fluents(num_fluents: usize, fluents: impl IntoIterator<Item = FluentId>) -> Self {
        let mut state = Self::new(num_fluents);
        for fluent in fluents {
            state.set(fluent, true);
        }
        state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fluents outside the state are false.
    #[must_use]
    pub fn holds(&self, fluent: FluentId) -> bool {
        self.0.get(fluent).unwrap_or(false)
    }

    /// # Panics
    ///
    /// If `fluent` is outside the state.
    pub fn set(&mut self, fluent: FluentId, value: bool) {
        self.0.set(fluent, value);
    }

    #[must_use]
    pub fn satisfies(&self, condition: &Condition) -> bool {
        condition.positive().iter().all(|&f| self.holds(f))
            && condition.negative().iter().all(|&f| !self.holds(f))
    }

    pub fn true_fluents(&self) -> impl Iterator<Item = FluentId> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.true_fluents().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_world() {
        let state = State::from_fluents(4, [1, 3]);
        assert!(state.holds(1));
        assert!(!state.holds(0));
        assert!(!state.holds(42));
        assert_eq!(state.true_fluents().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_satisfies() {
        let state = State::from_fluents(3, [0]);
        assert!(state.satisfies(&Condition::new([0], [1])));
        assert!(!state.satisfies(&Condition::new([0, 2], [])));
        assert!(!state.satisfies(&Condition::new([], [0])));
        assert!(state.satisfies(&Condition::default()));
    }

    #[test]
    fn test_equal_states_hash_equal() {
        use rustc_hash::FxHashSet;

        let mut seen = FxHashSet::default();
        assert!(seen.insert(State::from_fluents(3, [2, 0])));
        assert!(!seen.insert(State::from_fluents(3, [0, 2])));
    }
}
