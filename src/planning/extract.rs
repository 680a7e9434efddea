#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::planning::node::{NodeArena, NodeId};
use crate::planning::plan::Plan;

/// Rebuilds the plan leading to `goal` by following parent links to the root.
#[must_use]
pub fn extract_plan(arena: &NodeArena, goal: NodeId) -> Plan {
    let mut actions = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = &arena[id];
        let Some(action) = node.action() else {
            break;
        };
        actions.push(action);
        current = node.parent();
    }
    actions.reverse();
    Plan::new(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::node::Node;
    use crate::planning::state::State;

    #[test]
    fn test_walks_to_root() {
        let mut arena = NodeArena::default();
        let root = arena.push(Node::root(State::new(0), 0.0));
        let a = arena.push(Node::child(State::new(0), root, 4, 1.0, 0.0));
        let _sibling = arena.push(Node::child(State::new(0), root, 9, 1.0, 0.0));
        let b = arena.push(Node::child(State::new(0), a, 2, 2.0, 0.0));

        assert_eq!(extract_plan(&arena, b), Plan::new(vec![4, 2]));
        assert_eq!(extract_plan(&arena, root), Plan::default());
    }
}
