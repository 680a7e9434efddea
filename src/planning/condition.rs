#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::state::FluentId;
use itertools::Itertools;

/// A conjunction of fluent literals: every positive fluent must hold and every
/// negative fluent must not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Condition {
    positive: Vec<FluentId>,
    negative: Vec<FluentId>,
}

impl Condition {
    #[must_use]
    pub fn new(
        positive: impl IntoIterator<Item = FluentId>,
        negative: impl IntoIterator<Item = FluentId>,
    ) -> Self {
        Self {
            positive: positive.into_iter().sorted_unstable().dedup().collect(),
            negative: negative.into_iter().sorted_unstable().dedup().collect(),
        }
    }

    #[must_use]
    pub fn positive(&self) -> &[FluentId] {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &[FluentId] {
        &self.negative
    }

    /// The trivially true condition.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    /// Requires some fluent both to hold and not to hold.
    #[must_use]
    pub fn is_contradictory(&self) -> bool {
        self.positive
            .iter()
            .any(|f| self.negative.binary_search(f).is_ok())
    }

    /// Every fluent mentioned, with its required value.
    pub fn literals(&self) -> impl Iterator<Item = (FluentId, bool)> + '_ {
        self.positive
            .iter()
            .map(|&f| (f, true))
            .chain(self.negative.iter().map(|&f| (f, false)))
    }
}

/// Fluents made true and fluents made false.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Effect {
    positive: Vec<FluentId>,
    negative: Vec<FluentId>,
}

impl Effect {
    #[must_use]
    pub fn new(
        positive: impl IntoIterator<Item = FluentId>,
        negative: impl IntoIterator<Item = FluentId>,
    ) -> Self {
        Self {
            positive: positive.into_iter().sorted_unstable().dedup().collect(),
            negative: negative.into_iter().sorted_unstable().dedup().collect(),
        }
    }

    #[must_use]
    pub fn positive(&self) -> &[FluentId] {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &[FluentId] {
        &self.negative
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// An effect that fires only when its guard holds in the state the action is
/// applied to. An unconditional effect has an empty guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConditionalEffect {
    pub guard: Condition,
    pub effect: Effect,
}

impl ConditionalEffect {
    #[must_use]
    pub const fn new(guard: Condition, effect: Effect) -> Self {
        Self { guard, effect }
    }

    #[must_use]
    pub fn unconditional(effect: Effect) -> Self {
        Self::new(Condition::default(), effect)
    }

    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.guard.is_empty()
    }
}
