//! Game state model and rules-engine boundary.
//!
//! This crate defines the value types the search core operates on: the
//! immutable-by-convention [`GameSnapshot`], the tagged [`Action`] union with
//! its derived canonical key, and the [`RulesEngine`] trait that a concrete
//! game implements to provide legal actions and state transitions.
//!
//! Everything here is a plain owned value type. Cloning a snapshot produces a
//! structurally independent copy, so no two search branches can ever observe
//! each other's mutations.

pub mod action;
pub mod rules;
pub mod snapshot;

pub use action::{Action, ActionCategory, ActionKey};
pub use rules::{RulesEngine, RulesError};
pub use snapshot::{
    AbilityId, CardId, CardInstance, CardKind, GameSnapshot, ManaPool, Phase, PlayerId,
    PlayerState, StackEntry, Zone,
};
