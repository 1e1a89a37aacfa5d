//! Search tree node representation.
//!
//! Each node represents one (snapshot, path-from-root) pair. Nodes own their
//! snapshot outright — the arena in `tree.rs` is the only place nodes live,
//! and nothing else holds a reference into them, so no two branches can ever
//! alias each other's state.

use game_core::{Action, GameSnapshot, PlayerId};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (NONE for root).
    pub parent: NodeId,

    /// Action that led to this node from the parent (None at root).
    pub action: Option<Action>,

    /// Owned game state at this node.
    pub snapshot: GameSnapshot,

    /// The player holding priority in this snapshot.
    pub player: PlayerId,

    /// Number of times this node has been visited.
    pub visits: u32,

    /// Accumulated reward. Stored from the perspective of the player who
    /// chose the action leading here, so the parent maximizes it directly.
    pub reward: f64,

    /// Legal actions not yet expanded into children.
    pub untried: Vec<Action>,

    /// Child node indices. A node is fully expanded once `untried` is empty.
    pub children: Vec<NodeId>,
}

impl SearchNode {
    /// Create the root node. Zero visits, zero reward.
    pub fn new_root(snapshot: GameSnapshot, untried: Vec<Action>) -> Self {
        let player = snapshot.priority_player;
        Self {
            parent: NodeId::NONE,
            action: None,
            snapshot,
            player,
            visits: 0,
            reward: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    /// Create a child node reached via `action`.
    pub fn new_child(
        parent: NodeId,
        action: Action,
        snapshot: GameSnapshot,
        untried: Vec<Action>,
    ) -> Self {
        let player = snapshot.priority_player;
        Self {
            parent,
            action: Some(action),
            snapshot,
            player,
            visits: 0,
            reward: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    /// A node is fully expanded once every legal action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// A node is terminal when its snapshot reports the game over.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.snapshot.is_over()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Mean reward per visit; 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }

    /// UCB1 score for selection.
    ///
    /// Unvisited nodes score +∞ so every child is explored once before any
    /// exploitation. The root has no parent and scores its plain win rate.
    pub fn ucb1(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        if self.is_root() {
            return self.win_rate();
        }
        let bonus = exploration * ((parent_visits.max(1) as f64).ln() / self.visits as f64).sqrt();
        self.win_rate() + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_duel::fixtures;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root_starts_empty() {
        let node = SearchNode::new_root(fixtures::midgame(), vec![game_core::Action::PassPriority]);
        assert!(node.parent.is_none());
        assert_eq!(node.visits, 0);
        assert_eq!(node.reward, 0.0);
        assert!(!node.is_fully_expanded());
        assert!(!node.is_terminal());
        assert_eq!(node.player, game_core::PlayerId::ONE);
    }

    #[test]
    fn test_terminal_detection() {
        let node = SearchNode::new_root(fixtures::won_by(game_core::PlayerId::ONE), Vec::new());
        assert!(node.is_terminal());
        assert!(node.is_fully_expanded());
    }

    #[test]
    fn test_unvisited_ucb1_is_infinite() {
        let mut node = SearchNode::new_child(
            NodeId(0),
            game_core::Action::PassPriority,
            fixtures::midgame(),
            Vec::new(),
        );
        assert_eq!(node.ucb1(100, 1.41), f64::INFINITY);

        // Any visited node scores finitely, for any exploration constant.
        node.visits = 1;
        node.reward = 1.0;
        for exploration in [0.0, 0.5, 1.41, 10.0] {
            assert!(node.ucb1(100, exploration).is_finite());
        }
    }

    #[test]
    fn test_ucb1_formula() {
        let mut node = SearchNode::new_child(
            NodeId(0),
            game_core::Action::PassPriority,
            fixtures::midgame(),
            Vec::new(),
        );
        node.visits = 10;
        node.reward = 6.0;

        let exploration = 1.41;
        let expected = 0.6 + exploration * ((100.0f64).ln() / 10.0).sqrt();
        assert!((node.ucb1(100, exploration) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_root_ucb1_is_plain_win_rate() {
        let mut root = SearchNode::new_root(fixtures::midgame(), Vec::new());
        root.visits = 10;
        root.reward = 7.0;
        assert!((root.ucb1(0, 5.0) - 0.7).abs() < 1e-9);
    }
}
