//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default
//! values, plus conversions into the `mcts` runtime types.

use std::time::Duration;

use crate::defaults;
use mcts::{
    Aggregation, EvalWeights, EvictionPolicy, IsmctsConfig, MctsConfig, QuickEvalCoeffs,
    TranspositionConfig,
};
use serde::Deserialize;
use tracing::warn;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_search_iterations() -> u32 {
    defaults::search_iterations()
}
fn d_search_time_limit_ms() -> u64 {
    defaults::search_time_limit_ms()
}
fn d_search_exploration() -> f64 {
    defaults::search_exploration()
}
fn d_search_rollout_depth() -> u32 {
    defaults::search_rollout_depth()
}
fn d_search_move_ordering() -> bool {
    defaults::search_move_ordering()
}
fn d_ismcts_determinizations() -> u32 {
    defaults::ismcts_determinizations()
}
fn d_ismcts_iterations() -> u32 {
    defaults::ismcts_iterations()
}
fn d_ismcts_time_limit_ms() -> u64 {
    defaults::ismcts_time_limit_ms()
}
fn d_ismcts_move_ordering() -> bool {
    defaults::ismcts_move_ordering()
}
fn d_ismcts_aggregation() -> String {
    defaults::ismcts_aggregation().into()
}
fn d_rollout_policy() -> String {
    defaults::rollout_policy().into()
}
fn d_rollout_epsilon() -> f64 {
    defaults::rollout_epsilon()
}
fn d_life_weight() -> f64 {
    defaults::eval_life_weight()
}
fn d_board_weight() -> f64 {
    defaults::eval_board_weight()
}
fn d_hand_weight() -> f64 {
    defaults::eval_hand_weight()
}
fn d_lands_weight() -> f64 {
    defaults::eval_lands_weight()
}
fn d_tempo_weight() -> f64 {
    defaults::eval_tempo_weight()
}
fn d_life_scale() -> f64 {
    defaults::eval_life_scale()
}
fn d_board_scale() -> f64 {
    defaults::eval_board_scale()
}
fn d_hand_scale() -> f64 {
    defaults::eval_hand_scale()
}
fn d_land_scale() -> f64 {
    defaults::eval_land_scale()
}
fn d_tempo_scale() -> f64 {
    defaults::eval_tempo_scale()
}
fn d_low_life_threshold() -> i32 {
    defaults::eval_low_life_threshold()
}
fn d_low_life_penalty() -> f64 {
    defaults::eval_low_life_penalty()
}
fn d_attacker_bonus() -> f64 {
    defaults::eval_attacker_bonus()
}
fn d_untapped_bonus() -> f64 {
    defaults::eval_untapped_bonus()
}
fn d_quick_life() -> f64 {
    defaults::quick_eval_life()
}
fn d_quick_board() -> f64 {
    defaults::quick_eval_board()
}
fn d_quick_hand() -> f64 {
    defaults::quick_eval_hand()
}
fn d_quick_lands() -> f64 {
    defaults::quick_eval_lands()
}
fn d_quick_stack_power() -> f64 {
    defaults::quick_eval_stack_power()
}
fn d_tt_enabled() -> bool {
    defaults::transposition_enabled()
}
fn d_tt_max_entries() -> usize {
    defaults::transposition_max_entries()
}
fn d_tt_evict_fraction() -> f64 {
    defaults::transposition_evict_fraction()
}
fn d_tt_policy() -> String {
    defaults::transposition_policy().into()
}

// ============================================================================
// Config structs
// ============================================================================

/// Central configuration shared by every consumer of the engine.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ismcts: IsmctsSection,
    #[serde(default)]
    pub rollout: RolloutConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub quick_eval: QuickEvalConfig,
    #[serde(default)]
    pub transposition: TranspositionSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: d_log_level(),
        }
    }
}

/// Single-tree search settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "d_search_iterations")]
    pub iterations: u32,
    /// 0 means no time limit.
    #[serde(default = "d_search_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "d_search_exploration")]
    pub exploration: f64,
    #[serde(default = "d_search_rollout_depth")]
    pub rollout_depth: u32,
    #[serde(default = "d_search_move_ordering")]
    pub move_ordering: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: d_search_iterations(),
            time_limit_ms: d_search_time_limit_ms(),
            exploration: d_search_exploration(),
            rollout_depth: d_search_rollout_depth(),
            move_ordering: d_search_move_ordering(),
        }
    }
}

impl SearchConfig {
    pub fn to_mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_iterations(self.iterations)
            .with_time_limit(Duration::from_millis(self.time_limit_ms))
            .with_exploration(self.exploration)
            .with_rollout_depth(self.rollout_depth)
            .with_move_ordering(self.move_ordering)
    }
}

/// Information-set search settings.
#[derive(Debug, Clone, Deserialize)]
pub struct IsmctsSection {
    #[serde(default = "d_ismcts_determinizations")]
    pub determinizations: u32,
    #[serde(default = "d_ismcts_iterations")]
    pub iterations: u32,
    /// 0 means no time limit.
    #[serde(default = "d_ismcts_time_limit_ms")]
    pub time_limit_ms: u64,
    #[serde(default = "d_ismcts_move_ordering")]
    pub move_ordering: bool,
    /// "sum" or "average".
    #[serde(default = "d_ismcts_aggregation")]
    pub aggregation: String,
}

impl Default for IsmctsSection {
    fn default() -> Self {
        Self {
            determinizations: d_ismcts_determinizations(),
            iterations: d_ismcts_iterations(),
            time_limit_ms: d_ismcts_time_limit_ms(),
            move_ordering: d_ismcts_move_ordering(),
            aggregation: d_ismcts_aggregation(),
        }
    }
}

impl IsmctsSection {
    pub fn aggregation(&self) -> Aggregation {
        match self.aggregation.as_str() {
            "sum" => Aggregation::Sum,
            "average" => Aggregation::Average,
            other => {
                warn!(aggregation = other, "unknown aggregation, using sum");
                Aggregation::Sum
            }
        }
    }

    pub fn to_ismcts_config(&self, search: &SearchConfig) -> IsmctsConfig {
        IsmctsConfig {
            determinizations: self.determinizations.max(1),
            iterations: self.iterations,
            time_limit: Duration::from_millis(self.time_limit_ms),
            exploration: search.exploration,
            rollout_depth: search.rollout_depth,
            move_ordering: self.move_ordering,
            aggregation: self.aggregation(),
        }
    }
}

/// Which rollout policy the search simulates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutKind {
    Random,
    Greedy,
    EpsilonGreedy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RolloutConfig {
    /// "random", "greedy", or "epsilon_greedy".
    #[serde(default = "d_rollout_policy")]
    pub policy: String,
    #[serde(default = "d_rollout_epsilon")]
    pub epsilon: f64,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            policy: d_rollout_policy(),
            epsilon: d_rollout_epsilon(),
        }
    }
}

impl RolloutConfig {
    pub fn kind(&self) -> RolloutKind {
        match self.policy.as_str() {
            "random" => RolloutKind::Random,
            "greedy" => RolloutKind::Greedy,
            "epsilon_greedy" => RolloutKind::EpsilonGreedy,
            other => {
                warn!(policy = other, "unknown rollout policy, using greedy");
                RolloutKind::Greedy
            }
        }
    }
}

/// Weights for the bounded evaluation function.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "d_life_weight")]
    pub life_weight: f64,
    #[serde(default = "d_board_weight")]
    pub board_weight: f64,
    #[serde(default = "d_hand_weight")]
    pub hand_weight: f64,
    #[serde(default = "d_lands_weight")]
    pub lands_weight: f64,
    #[serde(default = "d_tempo_weight")]
    pub tempo_weight: f64,
    #[serde(default = "d_life_scale")]
    pub life_scale: f64,
    #[serde(default = "d_board_scale")]
    pub board_scale: f64,
    #[serde(default = "d_hand_scale")]
    pub hand_scale: f64,
    #[serde(default = "d_land_scale")]
    pub land_scale: f64,
    #[serde(default = "d_tempo_scale")]
    pub tempo_scale: f64,
    #[serde(default = "d_low_life_threshold")]
    pub low_life_threshold: i32,
    #[serde(default = "d_low_life_penalty")]
    pub low_life_penalty: f64,
    #[serde(default = "d_attacker_bonus")]
    pub attacker_bonus: f64,
    #[serde(default = "d_untapped_bonus")]
    pub untapped_bonus: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            life_weight: d_life_weight(),
            board_weight: d_board_weight(),
            hand_weight: d_hand_weight(),
            lands_weight: d_lands_weight(),
            tempo_weight: d_tempo_weight(),
            life_scale: d_life_scale(),
            board_scale: d_board_scale(),
            hand_scale: d_hand_scale(),
            land_scale: d_land_scale(),
            tempo_scale: d_tempo_scale(),
            low_life_threshold: d_low_life_threshold(),
            low_life_penalty: d_low_life_penalty(),
            attacker_bonus: d_attacker_bonus(),
            untapped_bonus: d_untapped_bonus(),
        }
    }
}

impl EvalConfig {
    pub fn to_weights(&self) -> EvalWeights {
        EvalWeights {
            life: self.life_weight,
            board: self.board_weight,
            hand: self.hand_weight,
            lands: self.lands_weight,
            tempo: self.tempo_weight,
            life_scale: self.life_scale,
            board_scale: self.board_scale,
            hand_scale: self.hand_scale,
            land_scale: self.land_scale,
            tempo_scale: self.tempo_scale,
            low_life_threshold: self.low_life_threshold,
            low_life_penalty: self.low_life_penalty,
            attacker_bonus: self.attacker_bonus,
            untapped_bonus: self.untapped_bonus,
        }
    }
}

/// Coefficients for the fast rollout evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickEvalConfig {
    #[serde(default = "d_quick_life")]
    pub life: f64,
    #[serde(default = "d_quick_board")]
    pub board: f64,
    #[serde(default = "d_quick_hand")]
    pub hand: f64,
    #[serde(default = "d_quick_lands")]
    pub lands: f64,
    #[serde(default = "d_quick_stack_power")]
    pub stack_power: f64,
}

impl Default for QuickEvalConfig {
    fn default() -> Self {
        Self {
            life: d_quick_life(),
            board: d_quick_board(),
            hand: d_quick_hand(),
            lands: d_quick_lands(),
            stack_power: d_quick_stack_power(),
        }
    }
}

impl QuickEvalConfig {
    pub fn to_coeffs(&self) -> QuickEvalCoeffs {
        QuickEvalCoeffs {
            life: self.life,
            board: self.board,
            hand: self.hand,
            lands: self.lands,
            stack_power: self.stack_power,
        }
    }
}

/// Transposition table settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranspositionSection {
    #[serde(default = "d_tt_enabled")]
    pub enabled: bool,
    #[serde(default = "d_tt_max_entries")]
    pub max_entries: usize,
    #[serde(default = "d_tt_evict_fraction")]
    pub evict_fraction: f64,
    /// "lru" or "deepest".
    #[serde(default = "d_tt_policy")]
    pub policy: String,
}

impl Default for TranspositionSection {
    fn default() -> Self {
        Self {
            enabled: d_tt_enabled(),
            max_entries: d_tt_max_entries(),
            evict_fraction: d_tt_evict_fraction(),
            policy: d_tt_policy(),
        }
    }
}

impl TranspositionSection {
    pub fn eviction_policy(&self) -> EvictionPolicy {
        match self.policy.as_str() {
            "lru" => EvictionPolicy::LeastRecentlyUsed,
            "deepest" => EvictionPolicy::Deepest,
            other => {
                warn!(policy = other, "unknown eviction policy, using lru");
                EvictionPolicy::LeastRecentlyUsed
            }
        }
    }

    pub fn to_table_config(&self) -> TranspositionConfig {
        TranspositionConfig {
            max_entries: self.max_entries,
            evict_fraction: self.evict_fraction,
            policy: self.eviction_policy(),
        }
    }
}
