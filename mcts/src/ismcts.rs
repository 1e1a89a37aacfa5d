//! Information-set search over determinized worlds.
//!
//! Hidden information makes a single tree unsound: the searcher would peek
//! at cards it cannot see. Instead the iteration budget is split across
//! several determinized worlds, a plain search runs in each, and the root
//! statistics are folded per canonical action key. Strategically identical
//! actions from different worlds (the same card cast from a different hand
//! slot, the same attack declared in a different order) merge into one
//! candidate.

use std::time::{Duration, Instant};

use game_core::{Action, ActionKey, GameSnapshot, PlayerId, RulesEngine};
use rand_chacha::ChaCha20Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::{Aggregation, IsmctsConfig, MctsConfig};
use crate::eval::EvalWeights;
use crate::rollout::RolloutPolicy;
use crate::search::{MctsSearch, SearchError};
use crate::transposition::TranspositionTable;

/// Folded statistics for one candidate action.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub action: Action,
    /// Visits summed across worlds.
    pub visits: u32,
    /// Mean reward over those visits.
    pub avg_reward: f64,
    /// Number of worlds in which this action was explored.
    pub worlds: u32,
}

/// Outcome of an information-set search.
#[derive(Debug)]
pub struct IsmctsResult {
    pub action: Action,
    /// Worlds actually searched (may fall short of the configured count
    /// under a time limit).
    pub determinizations: u32,
    /// Iterations summed over all worlds.
    pub total_iterations: u32,
    pub time_spent: Duration,
    /// Mean reward of the chosen action across worlds, in [0, 1].
    pub win_rate: f64,
    /// The strongest candidates by total visits, best first. At most five.
    pub top_actions: Vec<ActionReport>,
}

#[derive(Default)]
struct KeyStats {
    visits: u32,
    reward: f64,
    worlds: u32,
}

/// A configured information-set search.
pub struct IsmctsSearch<'a, R, P> {
    rules: &'a R,
    snapshot: &'a GameSnapshot,
    player: PlayerId,
    policy: &'a mut P,
    config: IsmctsConfig,
    weights: EvalWeights,
    table: Option<&'a mut TranspositionTable>,
}

impl<'a, R: RulesEngine, P: RolloutPolicy> IsmctsSearch<'a, R, P> {
    pub fn new(
        rules: &'a R,
        snapshot: &'a GameSnapshot,
        player: PlayerId,
        policy: &'a mut P,
        config: IsmctsConfig,
        weights: EvalWeights,
    ) -> Self {
        Self {
            rules,
            snapshot,
            player,
            policy,
            config,
            weights,
            table: None,
        }
    }

    pub fn with_table(mut self, table: &'a mut TranspositionTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<IsmctsResult, SearchError> {
        let start = Instant::now();

        // Legality is judged against the true snapshot; worlds only reorder
        // hidden cards and can never change what the searcher may do now.
        let legal = self.rules.legal_actions(self.snapshot, self.player);
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions {
                player: self.player,
            });
        }
        if legal.len() == 1 {
            let action = legal.into_iter().next().unwrap_or(Action::PassPriority);
            return Ok(IsmctsResult {
                action: action.clone(),
                determinizations: 0,
                total_iterations: 0,
                time_spent: start.elapsed(),
                win_rate: 0.5,
                top_actions: vec![ActionReport {
                    action,
                    visits: 0,
                    avg_reward: 0.5,
                    worlds: 0,
                }],
            });
        }

        let mut key_to_action: FxHashMap<ActionKey, Action> = FxHashMap::default();
        for action in &legal {
            key_to_action
                .entry(action.canonical_key())
                .or_insert_with(|| action.clone());
        }

        let per_world = self.config.iterations_per_determinization();
        let world_config = MctsConfig {
            iterations: per_world,
            time_limit: Duration::ZERO,
            exploration: self.config.exploration,
            rollout_depth: self.config.rollout_depth,
            determinize: true,
            move_ordering: self.config.move_ordering,
        };

        let mut folded: FxHashMap<ActionKey, KeyStats> = FxHashMap::default();
        let mut determinizations = 0;
        let mut total_iterations = 0;

        for world in 0..self.config.determinizations {
            if !self.config.time_limit.is_zero() && start.elapsed() >= self.config.time_limit {
                debug!(world, "information-set search stopped on time limit");
                break;
            }

            let mut search = MctsSearch::new(
                self.rules,
                self.snapshot,
                self.player,
                &mut *self.policy,
                world_config.clone(),
                self.weights.clone(),
            );
            if let Some(table) = self.table.as_deref_mut() {
                search = search.with_table(table);
            }
            let result = search.run(rng)?;

            determinizations += 1;
            total_iterations += result.iterations;

            let root = result.tree.root();
            for &child_id in &result.tree.get(root).children {
                let child = result.tree.get(child_id);
                if child.visits == 0 {
                    continue;
                }
                let Some(action) = &child.action else {
                    continue;
                };
                let key = action.canonical_key();
                // Worlds can surface actions the true snapshot forbids
                // (a determinized hand holds a different spell); only
                // actions legal right now may gather statistics.
                if !key_to_action.contains_key(&key) {
                    trace!(?key, "discarding world-only action");
                    continue;
                }
                let stats = folded.entry(key).or_default();
                stats.visits += child.visits;
                stats.reward += child.reward;
                stats.worlds += 1;
            }
        }

        let mut reports: Vec<ActionReport> = folded
            .into_iter()
            .map(|(key, stats)| ActionReport {
                action: key_to_action[&key].clone(),
                visits: stats.visits,
                avg_reward: if stats.visits == 0 {
                    0.0
                } else {
                    stats.reward / stats.visits as f64
                },
                worlds: stats.worlds,
            })
            .collect();
        reports.sort_by(|a, b| b.visits.cmp(&a.visits));

        let chosen = match self.config.aggregation {
            Aggregation::Sum => reports.first().cloned(),
            Aggregation::Average => reports
                .iter()
                .max_by(|a, b| {
                    a.avg_reward
                        .partial_cmp(&b.avg_reward)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned(),
        };

        // No world produced statistics (all budget spent on failed
        // expansions): fall back to the first legal action.
        let (action, win_rate) = match chosen {
            Some(report) => (report.action.clone(), report.avg_reward),
            None => (key_to_action[&legal[0].canonical_key()].clone(), 0.5),
        };

        reports.truncate(5);

        debug!(
            determinizations,
            total_iterations,
            win_rate,
            candidates = reports.len(),
            "information-set search complete"
        );

        Ok(IsmctsResult {
            action,
            determinizations,
            total_iterations,
            time_spent: start.elapsed(),
            win_rate,
            top_actions: reports,
        })
    }
}

/// Convenience wrapper over [`IsmctsSearch`] for callers with no table.
pub fn run_ismcts<R: RulesEngine, P: RolloutPolicy>(
    rules: &R,
    snapshot: &GameSnapshot,
    player: PlayerId,
    policy: &mut P,
    config: IsmctsConfig,
    weights: EvalWeights,
    rng: &mut ChaCha20Rng,
) -> Result<IsmctsResult, SearchError> {
    IsmctsSearch::new(rules, snapshot, player, policy, config, weights).run(rng)
}
