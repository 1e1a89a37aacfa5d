//! Single-tree Monte Carlo Tree Search.
//!
//! One call to [`MctsSearch::run`] builds a fresh tree over one fully
//! determinized world and returns the action of the root's most-visited
//! child. The information-set layer in `ismcts.rs` runs several of these
//! over different worlds and folds the results.

use std::time::{Duration, Instant};

use game_core::{Action, GameSnapshot, PlayerId, RulesEngine};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::determinize::determinize;
use crate::eval::{evaluate, terminal_reward, EvalWeights};
use crate::node::NodeId;
use crate::rollout::RolloutPolicy;
use crate::transposition::{compute_hash, TranspositionTable};
use crate::tree::SearchTree;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no legal actions for player {player:?}")]
    NoLegalActions { player: PlayerId },
}

/// Counters accumulated over one search, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes in the final tree.
    pub nodes: usize,
    /// Expansions whose action failed to apply.
    pub failed_expansions: u32,
    /// Rollouts cut short because the policy found no action.
    pub rollout_stops: u32,
    /// Fresh nodes seeded from the transposition table.
    pub tt_seeds: u32,
}

/// Outcome of one search.
#[derive(Debug)]
pub struct SearchResult {
    /// The recommended action.
    pub action: Action,
    /// Iterations actually executed.
    pub iterations: u32,
    pub time_spent: Duration,
    /// Win rate of the chosen child, in [0, 1].
    pub win_rate: f64,
    /// The full tree, kept so callers can read per-child statistics.
    pub tree: SearchTree,
    pub stats: SearchStats,
}

/// A configured search over one root snapshot.
pub struct MctsSearch<'a, R, P> {
    rules: &'a R,
    root_snapshot: &'a GameSnapshot,
    player: PlayerId,
    policy: &'a mut P,
    config: MctsConfig,
    weights: EvalWeights,
    table: Option<&'a mut TranspositionTable>,
}

impl<'a, R: RulesEngine, P: RolloutPolicy> MctsSearch<'a, R, P> {
    pub fn new(
        rules: &'a R,
        root_snapshot: &'a GameSnapshot,
        player: PlayerId,
        policy: &'a mut P,
        config: MctsConfig,
        weights: EvalWeights,
    ) -> Self {
        Self {
            rules,
            root_snapshot,
            player,
            policy,
            config,
            weights,
            table: None,
        }
    }

    /// Attach a transposition table. Fresh children are seeded from it and
    /// the expanded path is written back after each iteration.
    pub fn with_table(mut self, table: &'a mut TranspositionTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Run the search to completion.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let start = Instant::now();

        let root_snapshot = if self.config.determinize {
            determinize(self.root_snapshot, self.player, rng)
        } else {
            self.root_snapshot.clone()
        };

        let legal = self.rules.legal_actions(&root_snapshot, self.player);
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions {
                player: self.player,
            });
        }
        // A forced move needs no search.
        if legal.len() == 1 {
            let action = legal.into_iter().next().unwrap_or(Action::PassPriority);
            return Ok(SearchResult {
                action,
                iterations: 0,
                time_spent: start.elapsed(),
                win_rate: 0.5,
                tree: SearchTree::new(root_snapshot, Vec::new()),
                stats: SearchStats::default(),
            });
        }

        let fallback = legal[0].clone();
        let mut tree = SearchTree::new(root_snapshot, legal);
        let mut stats = SearchStats::default();
        let mut iterations = 0;

        while iterations < self.config.iterations {
            if !self.config.time_limit.is_zero() && start.elapsed() >= self.config.time_limit {
                debug!(iterations, "search stopped on time limit");
                break;
            }
            self.iterate(&mut tree, &mut stats, rng);
            iterations += 1;
        }

        stats.nodes = tree.len();
        let root = tree.root();
        let (action, win_rate) = match tree.select_most_visited_child(root) {
            Some(best) => {
                let node = tree.get(best);
                let action = node.action.clone().unwrap_or(Action::PassPriority);
                (action, node.win_rate())
            }
            // Every expansion failed; fall back to the first legal action.
            None => (fallback, 0.5),
        };

        trace!(iterations, nodes = stats.nodes, win_rate, "search complete");

        Ok(SearchResult {
            action,
            iterations,
            time_spent: start.elapsed(),
            win_rate,
            tree,
            stats,
        })
    }

    /// One selection / expansion / simulation / backpropagation pass.
    fn iterate(&mut self, tree: &mut SearchTree, stats: &mut SearchStats, rng: &mut ChaCha20Rng) {
        // Selection: descend through fully expanded interior nodes.
        let mut current = tree.root();
        while tree.get(current).is_fully_expanded() && !tree.get(current).is_terminal() {
            match tree.select_best_child(current, self.config.exploration) {
                Some(child) => current = child,
                None => break,
            }
        }

        if tree.get(current).is_terminal() {
            let reward = terminal_reward(&tree.get(current).snapshot, self.player);
            tree.backpropagate(current, reward, self.player);
            return;
        }

        // Expansion.
        let Some(child) = self.expand(tree, current, stats, rng) else {
            return;
        };

        // Simulation.
        let reward = self.simulate(tree.get(child).snapshot.clone(), stats, rng);
        tree.backpropagate(child, reward, self.player);

        self.store_path(tree, child);
    }

    /// Pop one untried action from `node_id` and grow a child for it.
    fn expand(
        &mut self,
        tree: &mut SearchTree,
        node_id: NodeId,
        stats: &mut SearchStats,
        rng: &mut ChaCha20Rng,
    ) -> Option<NodeId> {
        let index = self.pick_untried(tree, node_id, rng)?;
        let action = tree.get_mut(node_id).untried.swap_remove(index);

        let snapshot = match self.rules.apply(&tree.get(node_id).snapshot, &action) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                trace!(%error, "expansion action failed to apply");
                stats.failed_expansions += 1;
                return None;
            }
        };

        let mut untried = if snapshot.is_over() {
            Vec::new()
        } else {
            self.rules
                .legal_actions(&snapshot, snapshot.priority_player)
        };
        // Re-activating the ability that just resolved invites ping-pong
        // lines the evaluation cannot tell apart; drop it from the child's
        // candidates.
        if let Some(ability) = action.ability_id() {
            untried.retain(|a| a.ability_id() != Some(ability));
        }

        let child = tree.add_child(node_id, action, snapshot, untried);

        if let Some(table) = self.table.as_mut() {
            let hash = compute_hash(&tree.get(child).snapshot, self.player);
            if let Some(entry) = table.lookup(&hash) {
                let node = tree.get_mut(child);
                node.visits = entry.visits;
                node.reward = entry.reward;
                stats.tt_seeds += 1;
            }
        }

        Some(child)
    }

    /// Pick the index of the untried action to expand next. Uniform by
    /// default; with move ordering, a weighted draw favoring high-impact
    /// categories (weight doubles per priority step).
    fn pick_untried(
        &self,
        tree: &SearchTree,
        node_id: NodeId,
        rng: &mut ChaCha20Rng,
    ) -> Option<usize> {
        let untried = &tree.get(node_id).untried;
        if untried.is_empty() {
            return None;
        }
        if !self.config.move_ordering {
            return Some(rng.gen_range(0..untried.len()));
        }

        let weights: Vec<u32> = untried
            .iter()
            .map(|a| 1u32 << a.category().expansion_priority())
            .collect();
        match WeightedIndex::new(&weights) {
            Ok(dist) => Some(dist.sample(rng)),
            Err(_) => Some(rng.gen_range(0..untried.len())),
        }
    }

    /// Play the rollout policy forward up to `rollout_depth` steps and score
    /// the end state.
    fn simulate(
        &mut self,
        mut snapshot: GameSnapshot,
        stats: &mut SearchStats,
        rng: &mut ChaCha20Rng,
    ) -> f64 {
        self.policy.reset();

        for _ in 0..self.config.rollout_depth {
            if snapshot.is_over() {
                return terminal_reward(&snapshot, self.player);
            }
            let to_move = snapshot.priority_player;
            let action = match self.policy.choose(self.rules, &snapshot, to_move, rng) {
                Ok(action) => action,
                Err(_) => {
                    stats.rollout_stops += 1;
                    break;
                }
            };
            snapshot = match self.rules.apply(&snapshot, &action) {
                Ok(next) => next,
                Err(_) => {
                    stats.rollout_stops += 1;
                    break;
                }
            };
        }

        if snapshot.is_over() {
            terminal_reward(&snapshot, self.player)
        } else {
            evaluate(&snapshot, self.player, &self.weights)
        }
    }

    /// Write the just-expanded path back to the transposition table. The
    /// root is skipped: its statistics are aggregates over the whole search,
    /// not a reusable position value.
    fn store_path(&mut self, tree: &SearchTree, leaf: NodeId) {
        let Some(table) = self.table.as_mut() else {
            return;
        };

        let mut depth = 0;
        let mut current = leaf;
        while !tree.get(current).is_root() {
            depth += 1;
            current = tree.get(current).parent;
        }

        let mut current = leaf;
        while !tree.get(current).is_root() {
            let node = tree.get(current);
            let hash = compute_hash(&node.snapshot, self.player);
            table.store(hash, node.visits, node.reward, depth);
            depth -= 1;
            current = node.parent;
        }
    }
}

/// Convenience wrapper over [`MctsSearch`] for callers with no table.
pub fn run_mcts<R: RulesEngine, P: RolloutPolicy>(
    rules: &R,
    snapshot: &GameSnapshot,
    player: PlayerId,
    policy: &mut P,
    config: MctsConfig,
    weights: EvalWeights,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    MctsSearch::new(rules, snapshot, player, policy, config, weights).run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::{GreedyPolicy, RandomPolicy};
    use crate::transposition::{TranspositionConfig, TranspositionTable};
    use games_duel::{fixtures, DuelRules};
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(seed)
    }

    fn search_config() -> MctsConfig {
        // Fixtures carry full hidden state, no reshuffle needed.
        MctsConfig::for_testing().with_determinize(false)
    }

    #[test]
    fn test_root_visits_match_iterations() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = RandomPolicy;
        let config = search_config().with_iterations(100);

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            config,
            EvalWeights::default(),
            &mut rng(1),
        )
        .unwrap();

        assert_eq!(result.iterations, 100);
        let root = result.tree.root();
        assert_eq!(result.tree.get(root).visits, 100);
        assert!(result.stats.nodes > 1);
        assert!((0.0..=1.0).contains(&result.win_rate));
    }

    #[test]
    fn test_returns_legal_action() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = GreedyPolicy::default();

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config(),
            EvalWeights::default(),
            &mut rng(2),
        )
        .unwrap();

        let legal = rules.legal_actions(&snapshot, PlayerId::ONE);
        assert!(legal.contains(&result.action));
    }

    #[test]
    fn test_forced_move_short_circuits() {
        let rules = DuelRules;
        let snapshot = fixtures::forced_pass();
        let mut policy = RandomPolicy;

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config().with_iterations(1000),
            EvalWeights::default(),
            &mut rng(3),
        )
        .unwrap();

        assert_eq!(result.action, Action::PassPriority);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.win_rate, 0.5);
    }

    #[test]
    fn test_no_legal_actions_is_an_error() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = RandomPolicy;
        // The non-priority player cannot act.
        let idle = snapshot.priority_player.opponent();

        let err = run_mcts(
            &rules,
            &snapshot,
            idle,
            &mut policy,
            search_config(),
            EvalWeights::default(),
            &mut rng(4),
        );
        assert!(matches!(err, Err(SearchError::NoLegalActions { player }) if player == idle));
    }

    #[test]
    fn test_seed_reproducibility() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let config = search_config().with_iterations(80);

        let mut run = |seed| {
            let mut policy = RandomPolicy;
            run_mcts(
                &rules,
                &snapshot,
                PlayerId::ONE,
                &mut policy,
                config.clone(),
                EvalWeights::default(),
                &mut rng(seed),
            )
            .unwrap()
        };

        let a = run(42);
        let b = run(42);
        assert_eq!(a.action, b.action);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_finds_winning_attack() {
        // Player one has lethal on board if the creatures attack. The
        // search should prefer attacking over passing the turn away.
        let rules = DuelRules;
        let mut snapshot = fixtures::midgame();
        snapshot.player_mut(PlayerId::TWO).life = 1;
        snapshot.phase = game_core::Phase::Attackers;

        let mut policy = GreedyPolicy::default();
        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config().with_iterations(400),
            EvalWeights::default(),
            &mut rng(5),
        )
        .unwrap();

        assert!(
            matches!(result.action, Action::DeclareAttackers { ref attackers } if !attackers.is_empty()),
            "expected an attack, got {:?}",
            result.action
        );
        assert!(result.win_rate > 0.5);
    }

    #[test]
    fn test_zero_rollout_depth_evaluates_directly() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = RandomPolicy;
        let config = search_config().with_iterations(50).with_rollout_depth(0);

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            config,
            EvalWeights::default(),
            &mut rng(10),
        )
        .unwrap();

        assert_eq!(result.iterations, 50);
        assert!((0.0..=1.0).contains(&result.win_rate));
        let legal = rules.legal_actions(&snapshot, PlayerId::ONE);
        assert!(legal.contains(&result.action));
        // With no rollout steps the policy is never consulted.
        assert_eq!(result.stats.rollout_stops, 0);
    }

    #[test]
    fn test_time_limit_stops_early() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = RandomPolicy;
        let config = search_config()
            .with_iterations(u32::MAX)
            .with_time_limit(Duration::from_millis(20));

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            config,
            EvalWeights::default(),
            &mut rng(6),
        )
        .unwrap();

        assert!(result.iterations < u32::MAX);
        assert!(result.time_spent >= Duration::from_millis(20));
    }

    #[test]
    fn test_table_populated_and_reused() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut table = TranspositionTable::new(TranspositionConfig::default());

        let mut policy = RandomPolicy;
        let first = MctsSearch::new(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config().with_iterations(100),
            EvalWeights::default(),
        )
        .with_table(&mut table)
        .run(&mut rng(7))
        .unwrap();
        assert!(first.stats.nodes > 1);
        assert!(!table.is_empty());

        // A second search over the same position sees familiar children.
        let mut policy = RandomPolicy;
        let second = MctsSearch::new(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config().with_iterations(100),
            EvalWeights::default(),
        )
        .with_table(&mut table)
        .run(&mut rng(8))
        .unwrap();
        assert!(second.stats.tt_seeds > 0);
    }

    #[test]
    fn test_move_ordering_still_legal() {
        let rules = DuelRules;
        let snapshot = fixtures::midgame();
        let mut policy = RandomPolicy;

        let result = run_mcts(
            &rules,
            &snapshot,
            PlayerId::ONE,
            &mut policy,
            search_config().with_move_ordering(true),
            EvalWeights::default(),
            &mut rng(9),
        )
        .unwrap();

        let legal = rules.legal_actions(&snapshot, PlayerId::ONE);
        assert!(legal.contains(&result.action));
    }
}
