//! Rollout policies for the simulation phase.
//!
//! A rollout plays a game forward from a leaf snapshot without growing the
//! tree. The policy decides how each step is chosen; the search only needs
//! one action per step and tolerates policy failure by cutting the rollout
//! short.

use game_core::{Action, ActionKey, GameSnapshot, PlayerId, RulesEngine};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::eval::{quick_evaluate, QuickEvalCoeffs};

#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("no legal actions for player {player:?}")]
    NoLegalActions { player: PlayerId },
}

/// Chooses one action per rollout step.
///
/// Policies may keep state across steps within a single rollout (the greedy
/// policy tracks the previous choice to discourage loops), so they take
/// `&mut self`. Call [`RolloutPolicy::reset`] before starting a new rollout.
pub trait RolloutPolicy {
    fn choose<R: RulesEngine>(
        &mut self,
        rules: &R,
        snapshot: &GameSnapshot,
        player: PlayerId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Action, RolloutError>;

    /// Clear any per-rollout state. Default is a no-op.
    fn reset(&mut self) {}
}

/// Uniform random over legal actions.
#[derive(Debug, Default, Clone)]
pub struct RandomPolicy;

impl RolloutPolicy for RandomPolicy {
    fn choose<R: RulesEngine>(
        &mut self,
        rules: &R,
        snapshot: &GameSnapshot,
        player: PlayerId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Action, RolloutError> {
        let actions = rules.legal_actions(snapshot, player);
        actions
            .choose(rng)
            .cloned()
            .ok_or(RolloutError::NoLegalActions { player })
    }
}

/// One-ply lookahead: applies each candidate and scores the result with the
/// fast unbounded evaluation.
///
/// Scoring every legal action is too slow in board states with wide combat
/// choices, so at most `max_evaluated` candidates are scored, sampled by
/// descending category priority. Repeating the previous action and using
/// activated abilities are both penalized to keep free, repeatable effects
/// from dominating the rollout.
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    coeffs: QuickEvalCoeffs,
    max_evaluated: usize,
    repeat_penalty: f64,
    ability_penalty: f64,
    last_key: Option<ActionKey>,
}

impl GreedyPolicy {
    pub fn new(coeffs: QuickEvalCoeffs) -> Self {
        Self {
            coeffs,
            max_evaluated: 30,
            repeat_penalty: 100.0,
            ability_penalty: 10.0,
            last_key: None,
        }
    }

    /// Sample up to `max_evaluated` candidates, taking higher-priority
    /// categories first. Within the category that overflows the budget the
    /// pick is random, so wide combats still get varied coverage.
    fn candidates(&self, actions: &[Action], rng: &mut ChaCha20Rng) -> Vec<Action> {
        if actions.len() <= self.max_evaluated {
            return actions.to_vec();
        }

        let mut by_priority: Vec<&Action> = actions.iter().collect();
        by_priority.sort_by_key(|a| std::cmp::Reverse(a.category().expansion_priority()));

        let mut picked = Vec::with_capacity(self.max_evaluated);
        let mut i = 0;
        while picked.len() < self.max_evaluated && i < by_priority.len() {
            let priority = by_priority[i].category().expansion_priority();
            let mut stratum_end = i;
            while stratum_end < by_priority.len()
                && by_priority[stratum_end].category().expansion_priority() == priority
            {
                stratum_end += 1;
            }
            let room = self.max_evaluated - picked.len();
            let stratum = &mut by_priority[i..stratum_end];
            if stratum.len() > room {
                stratum.shuffle(rng);
            }
            picked.extend(stratum.iter().take(room).map(|a| (*a).clone()));
            i = stratum_end;
        }
        picked
    }

    fn score(&self, snapshot: &GameSnapshot, player: PlayerId, action: &Action) -> f64 {
        let mut score = quick_evaluate(snapshot, player, &self.coeffs);
        if self.last_key.as_ref() == Some(&action.canonical_key()) {
            score -= self.repeat_penalty;
        }
        if matches!(action, Action::ActivateAbility { .. }) {
            score -= self.ability_penalty;
        }
        score
    }
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self::new(QuickEvalCoeffs::default())
    }
}

impl RolloutPolicy for GreedyPolicy {
    fn choose<R: RulesEngine>(
        &mut self,
        rules: &R,
        snapshot: &GameSnapshot,
        player: PlayerId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Action, RolloutError> {
        let actions = rules.legal_actions(snapshot, player);
        if actions.is_empty() {
            return Err(RolloutError::NoLegalActions { player });
        }

        let mut best: Option<(Action, f64)> = None;
        for action in self.candidates(&actions, rng) {
            // Actions that fail to apply are simply skipped.
            let Ok(next) = rules.apply(snapshot, &action) else {
                continue;
            };
            let score = self.score(&next, player, &action);
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((action, score));
            }
        }

        // If every candidate failed to apply, fall back to the first legal
        // action rather than aborting the rollout.
        let chosen = best.map(|(a, _)| a).unwrap_or_else(|| actions[0].clone());
        self.last_key = Some(chosen.canonical_key());
        Ok(chosen)
    }

    fn reset(&mut self) {
        self.last_key = None;
    }
}

/// With probability `epsilon` play uniformly at random, otherwise greedily.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyPolicy {
    epsilon: f64,
    random: RandomPolicy,
    greedy: GreedyPolicy,
}

impl EpsilonGreedyPolicy {
    pub fn new(epsilon: f64, coeffs: QuickEvalCoeffs) -> Self {
        Self {
            epsilon: epsilon.clamp(0.0, 1.0),
            random: RandomPolicy,
            greedy: GreedyPolicy::new(coeffs),
        }
    }
}

impl Default for EpsilonGreedyPolicy {
    fn default() -> Self {
        Self::new(0.1, QuickEvalCoeffs::default())
    }
}

impl RolloutPolicy for EpsilonGreedyPolicy {
    fn choose<R: RulesEngine>(
        &mut self,
        rules: &R,
        snapshot: &GameSnapshot,
        player: PlayerId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Action, RolloutError> {
        use rand::Rng;
        if rng.gen::<f64>() < self.epsilon {
            self.random.choose(rules, snapshot, player, rng)
        } else {
            self.greedy.choose(rules, snapshot, player, rng)
        }
    }

    fn reset(&mut self) {
        self.greedy.reset();
    }
}
