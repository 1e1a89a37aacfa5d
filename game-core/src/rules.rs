//! The boundary between the search core and a concrete game.

use crate::action::Action;
use crate::snapshot::{CardId, GameSnapshot, PlayerId};
use thiserror::Error;

/// Errors a rules engine can report when applying an action.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("illegal action: {reason}")]
    IllegalAction { reason: String },

    #[error("game is already over")]
    GameOver,

    #[error("card {0:?} not found in the expected zone")]
    MissingCard(CardId),
}

/// A game's rules: legal-action enumeration and state transition.
///
/// Implementations must be deterministic for a given snapshot and player,
/// and `apply` must never mutate its input; every transition produces a new
/// snapshot. The search core catches `apply` failures per iteration, so an
/// engine may reject actions it handed out earlier only if the snapshot has
/// since changed underneath it — for a fixed snapshot, every action returned
/// by `legal_actions` must apply cleanly.
pub trait RulesEngine {
    /// All legal actions for `player` at `snapshot`. Empty only when the
    /// game has genuinely reached a state with no valid actions for that
    /// player.
    fn legal_actions(&self, snapshot: &GameSnapshot, player: PlayerId) -> Vec<Action>;

    /// Apply `action` to `snapshot`, producing the successor snapshot.
    fn apply(&self, snapshot: &GameSnapshot, action: &Action) -> Result<GameSnapshot, RulesError>;
}
