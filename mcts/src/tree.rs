//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous `Vec` and referenced by `NodeId`
//! indices; each node is reachable only through its parent, so the structure
//! is a strict tree. The tree is built fresh for every decision and
//! discarded afterwards.

use crate::node::{NodeId, SearchNode};
use game_core::{Action, GameSnapshot};

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl SearchTree {
    /// Create a new tree whose root holds `snapshot` with the given untried
    /// legal actions.
    pub fn new(snapshot: GameSnapshot, untried: Vec<Action>) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(snapshot, untried)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a child of `parent_id` reached via `action`.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action: Action,
        snapshot: GameSnapshot,
        untried: Vec<Action>,
    ) -> NodeId {
        let child = SearchNode::new_child(parent_id, action, snapshot, untried);
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Select the child of `node_id` with the highest UCB1 score. Returns
    /// None if the node has no children.
    pub fn select_best_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.visits;

        node.children
            .iter()
            .max_by(|&&a, &&b| {
                let score_a = self.get(a).ucb1(parent_visits, exploration);
                let score_b = self.get(b).ucb1(parent_visits, exploration);
                score_a
                    .partial_cmp(&score_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }

    /// Select the child of `node_id` with the most visits. Used for the
    /// final decision rather than UCB1, so the answer carries no exploration
    /// noise.
    pub fn select_most_visited_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.get(node_id)
            .children
            .iter()
            .max_by_key(|&&id| self.get(id).visits)
            .copied()
    }

    /// Backpropagate `reward` from `node_id` to the root.
    ///
    /// `reward` is from `evaluating_player`'s perspective. At every step the
    /// node whose statistics are updated accumulates the reward as seen by
    /// the player who chose the action leading to it — its parent's
    /// player-to-move — so the reward is inverted (`1 - reward`) whenever
    /// that player is the opponent. The root has no parent and accumulates
    /// the evaluating player's reward directly. Visits always increment.
    pub fn backpropagate(
        &mut self,
        node_id: NodeId,
        reward: f64,
        evaluating_player: game_core::PlayerId,
    ) {
        let mut current = node_id;
        while current.is_some() {
            let parent = self.get(current).parent;
            let credited = if parent.is_none() {
                reward
            } else if self.get(parent).player == evaluating_player {
                reward
            } else {
                1.0 - reward
            };

            let node = self.get_mut(current);
            node.visits += 1;
            node.reward += credited;
            current = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Action, PlayerId};
    use games_duel::fixtures;

    fn tree_with_children() -> (SearchTree, NodeId, NodeId) {
        let mut tree = SearchTree::new(fixtures::midgame(), vec![Action::PassPriority]);
        let a = tree.add_child(
            tree.root(),
            Action::PassPriority,
            fixtures::midgame(),
            Vec::new(),
        );
        let b = tree.add_child(
            tree.root(),
            Action::PassPriority,
            fixtures::midgame(),
            Vec::new(),
        );
        (tree, a, b)
    }

    #[test]
    fn test_add_child_links_parent() {
        let (tree, a, _) = tree_with_children();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(a).parent, tree.root());
        assert_eq!(tree.get(tree.root()).children.len(), 2);
    }

    #[test]
    fn test_select_best_child_prefers_unvisited() {
        let (mut tree, a, b) = tree_with_children();
        // Give one child strong statistics; the other is unvisited.
        tree.get_mut(a).visits = 10;
        tree.get_mut(a).reward = 9.0;
        tree.get_mut(tree.root()).visits = 10;

        // Unvisited child must be selected first regardless of exploration.
        for exploration in [0.0, 1.41] {
            assert_eq!(tree.select_best_child(tree.root(), exploration), Some(b));
        }
    }

    #[test]
    fn test_select_most_visited_ignores_reward() {
        let (mut tree, a, b) = tree_with_children();
        tree.get_mut(a).visits = 30;
        tree.get_mut(a).reward = 3.0; // poor win rate, many visits
        tree.get_mut(b).visits = 10;
        tree.get_mut(b).reward = 9.0; // great win rate, few visits

        assert_eq!(tree.select_most_visited_child(tree.root()), Some(a));
    }

    #[test]
    fn test_select_on_childless_node_returns_none() {
        let tree = SearchTree::new(fixtures::midgame(), Vec::new());
        assert_eq!(tree.select_best_child(tree.root(), 1.41), None);
        assert_eq!(tree.select_most_visited_child(tree.root()), None);
    }

    #[test]
    fn test_backpropagate_increments_path_only() {
        let (mut tree, a, b) = tree_with_children();
        let grandchild = tree.add_child(a, Action::PassPriority, fixtures::midgame(), Vec::new());

        tree.backpropagate(grandchild, 1.0, PlayerId::ONE);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(a).visits, 1);
        assert_eq!(tree.get(tree.root()).visits, 1);
        // Sibling branch untouched.
        assert_eq!(tree.get(b).visits, 0);
        assert_eq!(tree.get(b).reward, 0.0);
    }

    #[test]
    fn test_backpropagate_inverts_for_opponent_choices() {
        // Root is player one's decision; the child snapshot hands priority
        // to player two, so the grandchild was chosen by player two and must
        // accumulate the inverted reward.
        let mut tree = SearchTree::new(fixtures::midgame(), vec![Action::PassPriority]);

        let mut opp_turn = fixtures::midgame();
        opp_turn.priority_player = PlayerId::TWO;
        let child = tree.add_child(tree.root(), Action::PassPriority, opp_turn, Vec::new());
        let grandchild =
            tree.add_child(child, Action::PassPriority, fixtures::midgame(), Vec::new());

        tree.backpropagate(grandchild, 1.0, PlayerId::ONE);

        // Grandchild's parent (child) is player two's node: inverted.
        assert_eq!(tree.get(grandchild).reward, 0.0);
        // Child's parent (root) is player one's node: direct.
        assert_eq!(tree.get(child).reward, 1.0);
        // Root always accumulates the evaluating player's reward.
        assert_eq!(tree.get(tree.root()).reward, 1.0);
    }
}
