//! Monte Carlo Tree Search for adversarial card games with hidden
//! information.
//!
//! This crate provides a game-agnostic decision engine over any rules
//! implementation of the `game-core` [`RulesEngine`] trait. Two search
//! entry points are exposed:
//!
//! - [`run_mcts`] / [`MctsSearch`]: a single-tree search over one fully
//!   determinized world, with UCB1 selection, policy-driven rollouts, and a
//!   bounded-depth heuristic evaluation at the rollout horizon.
//! - [`run_ismcts`] / [`IsmctsSearch`]: an information-set search that
//!   splits the budget across several determinized worlds and folds the
//!   per-world root statistics by canonical action key.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcts::{run_ismcts, EvalWeights, GreedyPolicy, IsmctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let rules = games_duel::DuelRules;
//! let mut policy = GreedyPolicy::default();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_ismcts(
//!     &rules,
//!     &snapshot,
//!     player,
//!     &mut policy,
//!     IsmctsConfig::default(),
//!     EvalWeights::default(),
//!     &mut rng,
//! )?;
//! println!("chosen: {:?} ({:.0}%)", result.action, result.win_rate * 100.0);
//! ```
//!
//! # Determinism
//!
//! Every randomized step draws from a caller-supplied `ChaCha20Rng`, so a
//! fixed seed reproduces the whole search exactly.

pub mod config;
pub mod determinize;
pub mod eval;
pub mod ismcts;
pub mod node;
pub mod rollout;
pub mod search;
pub mod transposition;
pub mod tree;

pub use config::{Aggregation, IsmctsConfig, MctsConfig, MIN_ITERATIONS_PER_DETERMINIZATION};
pub use determinize::determinize;
pub use eval::{evaluate, quick_evaluate, terminal_reward, EvalWeights, QuickEvalCoeffs};
pub use ismcts::{run_ismcts, ActionReport, IsmctsResult, IsmctsSearch};
pub use node::{NodeId, SearchNode};
pub use rollout::{EpsilonGreedyPolicy, GreedyPolicy, RandomPolicy, RolloutError, RolloutPolicy};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use transposition::{
    compute_hash, EvictionPolicy, TranspositionConfig, TranspositionEntry, TranspositionStats,
    TranspositionTable,
};
pub use tree::SearchTree;
