#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

pub type WatchList = SmallVec<[usize; 6]>;

/// For every literal, the indices of the clauses watching it. A clause watches
/// the literals at its positions 0 and 1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchedLiterals(Vec<WatchList>);

impl WatchedLiterals {
    pub fn grow(&mut self, num_vars: usize) {
        let len = 2 * (num_vars + 1);
        if self.0.len() < len {
            self.0.resize(len, WatchList::new());
        }
    }

    pub fn add_clause(&mut self, clause: &Clause, idx: usize) {
        debug_assert!(clause.len() > 1);
        debug_assert_ne!(clause[0], clause[1]);

        self[clause[0]].push(idx);
        self[clause[1]].push(idx);
    }

    /// Moves the watch list of `lit` out, leaving it empty.
    pub fn take(&mut self, lit: Literal) -> WatchList {
        std::mem::take(&mut self[lit])
    }
}

impl Index<Literal> for WatchedLiterals {
    type Output = WatchList;

    fn index(&self, index: Literal) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl IndexMut<Literal> for WatchedLiterals {
    fn index_mut(&mut self, index: Literal) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}
