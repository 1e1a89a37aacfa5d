//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared by
//! every consumer of the search engine, plus conversions into the `mcts`
//! crate's runtime config types.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`DUELBOT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (embedded config.defaults.toml)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! DUELBOT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     DUELBOT_COMMON_LOG_LEVEL=debug
//!     DUELBOT_SEARCH_ITERATIONS=2000
//!     DUELBOT_ISMCTS_DETERMINIZATIONS=16
//!     DUELBOT_ROLLOUT_POLICY=random
//!     DUELBOT_TRANSPOSITION_MAX_ENTRIES=50000
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
