//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by DUELBOT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var("DUELBOT_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from DUELBOT_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "DUELBOT_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &PathBuf) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: DUELBOT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "DUELBOT_COMMON_LOG_LEVEL");

    // Search
    env_override!(
        config,
        search.iterations,
        "DUELBOT_SEARCH_ITERATIONS",
        parse
    );
    env_override!(
        config,
        search.time_limit_ms,
        "DUELBOT_SEARCH_TIME_LIMIT_MS",
        parse
    );
    env_override!(
        config,
        search.exploration,
        "DUELBOT_SEARCH_EXPLORATION",
        parse
    );
    env_override!(
        config,
        search.rollout_depth,
        "DUELBOT_SEARCH_ROLLOUT_DEPTH",
        parse
    );
    env_override!(
        config,
        search.move_ordering,
        "DUELBOT_SEARCH_MOVE_ORDERING",
        parse
    );

    // Ismcts
    env_override!(
        config,
        ismcts.determinizations,
        "DUELBOT_ISMCTS_DETERMINIZATIONS",
        parse
    );
    env_override!(
        config,
        ismcts.iterations,
        "DUELBOT_ISMCTS_ITERATIONS",
        parse
    );
    env_override!(
        config,
        ismcts.time_limit_ms,
        "DUELBOT_ISMCTS_TIME_LIMIT_MS",
        parse
    );
    env_override!(
        config,
        ismcts.move_ordering,
        "DUELBOT_ISMCTS_MOVE_ORDERING",
        parse
    );
    env_override!(config, ismcts.aggregation, "DUELBOT_ISMCTS_AGGREGATION");

    // Rollout
    env_override!(config, rollout.policy, "DUELBOT_ROLLOUT_POLICY");
    env_override!(config, rollout.epsilon, "DUELBOT_ROLLOUT_EPSILON", parse);

    // Eval
    env_override!(config, eval.life_weight, "DUELBOT_EVAL_LIFE_WEIGHT", parse);
    env_override!(
        config,
        eval.board_weight,
        "DUELBOT_EVAL_BOARD_WEIGHT",
        parse
    );
    env_override!(config, eval.hand_weight, "DUELBOT_EVAL_HAND_WEIGHT", parse);
    env_override!(
        config,
        eval.lands_weight,
        "DUELBOT_EVAL_LANDS_WEIGHT",
        parse
    );
    env_override!(
        config,
        eval.tempo_weight,
        "DUELBOT_EVAL_TEMPO_WEIGHT",
        parse
    );
    env_override!(
        config,
        eval.low_life_threshold,
        "DUELBOT_EVAL_LOW_LIFE_THRESHOLD",
        parse
    );
    env_override!(
        config,
        eval.low_life_penalty,
        "DUELBOT_EVAL_LOW_LIFE_PENALTY",
        parse
    );
    env_override!(
        config,
        eval.attacker_bonus,
        "DUELBOT_EVAL_ATTACKER_BONUS",
        parse
    );
    env_override!(
        config,
        eval.untapped_bonus,
        "DUELBOT_EVAL_UNTAPPED_BONUS",
        parse
    );

    // Quick eval
    env_override!(config, quick_eval.life, "DUELBOT_QUICK_EVAL_LIFE", parse);
    env_override!(config, quick_eval.board, "DUELBOT_QUICK_EVAL_BOARD", parse);
    env_override!(
        config,
        quick_eval.stack_power,
        "DUELBOT_QUICK_EVAL_STACK_POWER",
        parse
    );

    // Transposition
    env_override!(
        config,
        transposition.enabled,
        "DUELBOT_TRANSPOSITION_ENABLED",
        parse
    );
    env_override!(
        config,
        transposition.max_entries,
        "DUELBOT_TRANSPOSITION_MAX_ENTRIES",
        parse
    );
    env_override!(
        config,
        transposition.evict_fraction,
        "DUELBOT_TRANSPOSITION_EVICT_FRACTION",
        parse
    );
    env_override!(config, transposition.policy, "DUELBOT_TRANSPOSITION_POLICY");

    config
}
