#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::Literal;
use core::ops::{Index, IndexMut};
use itertools::Itertools;
use smallvec::SmallVec;

pub type LiteralStorage = SmallVec<[Literal; 8]>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: LiteralStorage,
    learnt: bool,
}

impl Clause {
    #[must_use]
    pub fn new(literals: &[Literal]) -> Self {
        Self {
            literals: literals.iter().copied().collect(),
            learnt: false,
        }
    }

    #[must_use]
    pub fn learnt(literals: LiteralStorage) -> Self {
        Self {
            literals,
            learnt: true,
        }
    }

    /// Sorts the literals and drops repeated ones.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.literals.sort_unstable();
        self.literals.dedup();
        self
    }

    /// A clause containing both a literal and its negation.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .tuple_combinations()
            .any(|(a, b)| *a == b.negated())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[must_use]
    pub const fn is_learnt(&self) -> bool {
        self.learnt
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.literals.swap(i, j);
    }

    pub fn retain(&mut self, f: impl FnMut(&mut Literal) -> bool) {
        self.literals.retain(f);
    }

    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl IndexMut<usize> for Clause {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.literals[index]
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        Self {
            literals: literals.into_iter().map(Literal::from).collect(),
            learnt: false,
        }
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self {
            literals: SmallVec::from_vec(literals),
            learnt: false,
        }
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self {
            literals: iter.into_iter().collect(),
            learnt: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let clause = Clause::from(vec![1, 2, 3]);
        assert_eq!(clause.len(), 3);
        assert!(!clause.is_learnt());
    }

    #[test]
    fn test_iter() {
        let clause = Clause::from(vec![1, -2, 3]);
        let mut iter = clause.iter();
        assert_eq!(iter.next(), Some(&Literal::from(1)));
        assert_eq!(iter.next(), Some(&Literal::from(-2)));
        assert_eq!(iter.next(), Some(&Literal::from(3)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_swap() {
        let mut clause = Clause::from(vec![1, 2, 3]);
        clause.swap(0, 2);
        assert_eq!(clause[0], Literal::from(3));
        assert_eq!(clause[1], Literal::from(2));
        assert_eq!(clause[2], Literal::from(1));
    }

    #[test]
    fn test_normalised_drops_repeats() {
        let clause = Clause::from(vec![3, 1, 3, -2]).normalised();
        assert_eq!(clause.literals(), &[Literal::from(-2), Literal::from(1), Literal::from(3)]);
    }

    #[test]
    fn test_tautology() {
        assert!(Clause::from(vec![1, 4, -1]).is_tautology());
        assert!(!Clause::from(vec![1, 4, -2]).is_tautology());
        assert!(!Clause::from(Vec::<i32>::new()).is_tautology());
    }
}
