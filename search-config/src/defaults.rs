//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the file stays the single source of truth for default values.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    ismcts: IsmctsDefaults,
    rollout: RolloutDefaults,
    eval: EvalDefaults,
    quick_eval: QuickEvalDefaults,
    transposition: TranspositionDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    iterations: u32,
    time_limit_ms: u64,
    exploration: f64,
    rollout_depth: u32,
    move_ordering: bool,
}

#[derive(Debug, Deserialize)]
struct IsmctsDefaults {
    determinizations: u32,
    iterations: u32,
    time_limit_ms: u64,
    move_ordering: bool,
    aggregation: String,
}

#[derive(Debug, Deserialize)]
struct RolloutDefaults {
    policy: String,
    epsilon: f64,
}

#[derive(Debug, Deserialize)]
struct EvalDefaults {
    life_weight: f64,
    board_weight: f64,
    hand_weight: f64,
    lands_weight: f64,
    tempo_weight: f64,
    life_scale: f64,
    board_scale: f64,
    hand_scale: f64,
    land_scale: f64,
    tempo_scale: f64,
    low_life_threshold: i32,
    low_life_penalty: f64,
    attacker_bonus: f64,
    untapped_bonus: f64,
}

#[derive(Debug, Deserialize)]
struct QuickEvalDefaults {
    life: f64,
    board: f64,
    hand: f64,
    lands: f64,
    stack_power: f64,
}

#[derive(Debug, Deserialize)]
struct TranspositionDefaults {
    enabled: bool,
    max_entries: usize,
    evict_fraction: f64,
    policy: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn search_iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn search_time_limit_ms() -> u64 {
    DEFAULTS.search.time_limit_ms
}
pub fn search_exploration() -> f64 {
    DEFAULTS.search.exploration
}
pub fn search_rollout_depth() -> u32 {
    DEFAULTS.search.rollout_depth
}
pub fn search_move_ordering() -> bool {
    DEFAULTS.search.move_ordering
}

// Ismcts
pub fn ismcts_determinizations() -> u32 {
    DEFAULTS.ismcts.determinizations
}
pub fn ismcts_iterations() -> u32 {
    DEFAULTS.ismcts.iterations
}
pub fn ismcts_time_limit_ms() -> u64 {
    DEFAULTS.ismcts.time_limit_ms
}
pub fn ismcts_move_ordering() -> bool {
    DEFAULTS.ismcts.move_ordering
}
pub fn ismcts_aggregation() -> &'static str {
    &DEFAULTS.ismcts.aggregation
}

// Rollout
pub fn rollout_policy() -> &'static str {
    &DEFAULTS.rollout.policy
}
pub fn rollout_epsilon() -> f64 {
    DEFAULTS.rollout.epsilon
}

// Eval
pub fn eval_life_weight() -> f64 {
    DEFAULTS.eval.life_weight
}
pub fn eval_board_weight() -> f64 {
    DEFAULTS.eval.board_weight
}
pub fn eval_hand_weight() -> f64 {
    DEFAULTS.eval.hand_weight
}
pub fn eval_lands_weight() -> f64 {
    DEFAULTS.eval.lands_weight
}
pub fn eval_tempo_weight() -> f64 {
    DEFAULTS.eval.tempo_weight
}
pub fn eval_life_scale() -> f64 {
    DEFAULTS.eval.life_scale
}
pub fn eval_board_scale() -> f64 {
    DEFAULTS.eval.board_scale
}
pub fn eval_hand_scale() -> f64 {
    DEFAULTS.eval.hand_scale
}
pub fn eval_land_scale() -> f64 {
    DEFAULTS.eval.land_scale
}
pub fn eval_tempo_scale() -> f64 {
    DEFAULTS.eval.tempo_scale
}
pub fn eval_low_life_threshold() -> i32 {
    DEFAULTS.eval.low_life_threshold
}
pub fn eval_low_life_penalty() -> f64 {
    DEFAULTS.eval.low_life_penalty
}
pub fn eval_attacker_bonus() -> f64 {
    DEFAULTS.eval.attacker_bonus
}
pub fn eval_untapped_bonus() -> f64 {
    DEFAULTS.eval.untapped_bonus
}

// Quick eval
pub fn quick_eval_life() -> f64 {
    DEFAULTS.quick_eval.life
}
pub fn quick_eval_board() -> f64 {
    DEFAULTS.quick_eval.board
}
pub fn quick_eval_hand() -> f64 {
    DEFAULTS.quick_eval.hand
}
pub fn quick_eval_lands() -> f64 {
    DEFAULTS.quick_eval.lands
}
pub fn quick_eval_stack_power() -> f64 {
    DEFAULTS.quick_eval.stack_power
}

// Transposition
pub fn transposition_enabled() -> bool {
    DEFAULTS.transposition.enabled
}
pub fn transposition_max_entries() -> usize {
    DEFAULTS.transposition.max_entries
}
pub fn transposition_evict_fraction() -> f64 {
    DEFAULTS.transposition.evict_fraction
}
pub fn transposition_policy() -> &'static str {
    &DEFAULTS.transposition.policy
}
