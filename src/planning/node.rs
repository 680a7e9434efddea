#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::state::State;
use std::ops::Index;

/// Handle of a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A search-tree record. Nodes are never changed once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    state: State,
    parent: Option<NodeId>,
    action: Option<usize>,
    cost: f64,
    heuristic: f64,
}

impl Node {
    #[must_use]
    pub const fn root(state: State, heuristic: f64) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            cost: 0.0,
            heuristic,
        }
    }

    #[must_use]
    pub const fn child(state: State, parent: NodeId, action: usize, cost: f64, heuristic: f64) -> Self {
        Self {
            state,
            parent: Some(parent),
            action: Some(action),
            cost,
            heuristic,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Index of the action that produced this node, `None` for the root.
    #[must_use]
    pub const fn action(&self) -> Option<usize> {
        self.action
    }

    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    #[must_use]
    pub const fn heuristic(&self) -> f64 {
        self.heuristic
    }

    /// `weight * h + g`.
    #[must_use]
    pub fn f_value(&self, weight: f64) -> f64 {
        weight.mul_add(self.heuristic, self.cost)
    }
}

/// Owns every node created during one search; parents are referred to by id.
#[derive(Debug, Clone, Default)]
pub struct NodeArena(Vec<Node>);

impl NodeArena {
    pub fn push(&mut self, node: Node) -> NodeId {
        self.0.push(node);
        NodeId(self.0.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.0.get(id.0)
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

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.0[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_links() {
        let mut arena = NodeArena::default();
        let root = arena.push(Node::root(State::new(1), 2.0));
        let child = arena.push(Node::child(State::from_fluents(1, [0]), root, 0, 1.0, 0.0));

        assert_eq!(arena[child].parent(), Some(root));
        assert_eq!(arena[child].action(), Some(0));
        assert_eq!(arena[root].parent(), None);
        assert_eq!(arena.len(), 2);
        assert!((arena[root].f_value(1.5) - 3.0).abs() < f64::EPSILON);
    }
}
