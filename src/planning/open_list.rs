#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Frontier and visited-state bookkeeping for best-first search.

use crate::planning::node::{Node, NodeId};
use crate::planning::state::State;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    f: OrderedFloat<f64>,
    h: OrderedFloat<f64>,
    seq: u64,
    node: NodeId,
}

impl Ord for Entry {
    /// Reversed so that the max-heap pops the smallest `(f, h, seq)` first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f, other.h, other.seq).cmp(&(self.f, self.h, self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nodes waiting for expansion, ordered by `f = weight * h + g`.
///
/// Ties on `f` go to the lower `h`, then to the node pushed first, so the
/// order is total and runs are reproducible.
#[derive(Debug, Clone)]
pub struct OpenList {
    heap: BinaryHeap<Entry>,
    weight: f64,
    next_seq: u64,
}

impl OpenList {
    #[must_use]
    pub fn new(weight: f64) -> Self {
        Self {
            heap: BinaryHeap::new(),
            weight,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, id: NodeId, node: &Node) {
        self.heap.push(Entry {
            f: OrderedFloat(node.f_value(self.weight)),
            h: OrderedFloat(node.heuristic()),
            seq: self.next_seq,
            node: id,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// States that have been expanded.
#[derive(Debug, Clone, Default)]
pub struct ClosedSet(FxHashSet<State>);

impl ClosedSet {
    /// Returns `false` if the state was already closed.
    pub fn insert(&mut self, state: State) -> bool {
        self.0.insert(state)
    }

    #[must_use]
    pub fn contains(&self, state: &State) -> bool {
        self.0.contains(state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::node::NodeArena;

    fn arena_with(nodes: &[(f64, f64)]) -> (NodeArena, Vec<NodeId>) {
        let mut arena = NodeArena::default();
        let ids = nodes
            .iter()
            .map(|&(g, h)| {
                let root = Node::root(State::new(0), h);
                if g == 0.0 {
                    arena.push(root)
                } else {
                    let parent = arena.push(root.clone());
                    arena.push(Node::child(State::new(0), parent, 0, g, h))
                }
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn test_pops_lowest_f() {
        let (arena, ids) = arena_with(&[(0.0, 5.0), (0.0, 1.0), (0.0, 3.0)]);
        let mut open = OpenList::new(1.0);
        for &id in &ids {
            open.push(id, &arena[id]);
        }
        assert_eq!(open.pop(), Some(ids[1]));
        assert_eq!(open.pop(), Some(ids[2]));
        assert_eq!(open.pop(), Some(ids[0]));
        assert!(open.is_empty());
    }

    #[test]
    fn test_ties_prefer_lower_h_then_fifo() {
        // all f = 4
        let (arena, ids) = arena_with(&[(2.0, 2.0), (3.0, 1.0), (2.0, 2.0)]);
        let mut open = OpenList::new(1.0);
        for &id in &ids {
            open.push(id, &arena[id]);
        }
        assert_eq!(open.pop(), Some(ids[1]));
        assert_eq!(open.pop(), Some(ids[0]));
        assert_eq!(open.pop(), Some(ids[2]));
    }

    #[test]
    fn test_weight_scales_h() {
        let (arena, ids) = arena_with(&[(0.0, 2.0), (3.0, 0.0)]);
        let mut open = OpenList::new(2.0);
        for &id in &ids {
            open.push(id, &arena[id]);
        }
        // 2 * 2 + 0 = 4 against 2 * 0 + 3 = 3
        assert_eq!(open.pop(), Some(ids[1]));
    }

    #[test]
    fn test_closed_set() {
        let mut closed = ClosedSet::default();
        assert!(closed.insert(State::from_fluents(2, [1])));
        assert!(!closed.insert(State::from_fluents(2, [1])));
        assert!(closed.contains(&State::from_fluents(2, [1])));
        assert!(!closed.contains(&State::new(2)));
        assert_eq!(closed.len(), 1);
    }
}
