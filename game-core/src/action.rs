//! Actions and their canonical keys.
//!
//! Actions are rich structures, not simple enums of indices, so "is this the
//! same action in two different possible worlds" cannot be answered by
//! structural equality alone: attacker lists may be declared in a different
//! order, blocker pairs may arrive permuted. [`Action::canonical_key`]
//! derives a normalized [`ActionKey`] that merges strategically identical
//! actions across determinizations.

use crate::snapshot::{AbilityId, CardId};

/// A move one player can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Cast a spell from hand.
    CastSpell { card: CardId },
    /// Activate an ability of a permanent on the battlefield.
    ActivateAbility { source: CardId, ability: AbilityId },
    /// Play a land from hand.
    PlayLand { card: CardId },
    /// Declare the given creatures as attackers.
    DeclareAttackers { attackers: Vec<CardId> },
    /// Declare blocks as (attacker, blocker) pairs.
    DeclareBlockers { blocks: Vec<(CardId, CardId)> },
    /// Pass priority (resolve the stack / advance the phase).
    PassPriority,
}

/// Coarse action category, used for move ordering and rollout stratification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    Spell,
    Ability,
    Attack,
    Block,
    Land,
    Pass,
}

impl ActionCategory {
    /// Expansion priority: higher categories are more likely to be tried
    /// first when move ordering is enabled. Spells > abilities > attacks >
    /// blocks > lands > pass.
    pub fn expansion_priority(self) -> u32 {
        match self {
            ActionCategory::Spell => 5,
            ActionCategory::Ability => 4,
            ActionCategory::Attack => 3,
            ActionCategory::Block => 2,
            ActionCategory::Land => 1,
            ActionCategory::Pass => 0,
        }
    }
}

/// Canonical identity of an action, stable across determinized worlds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Cast(CardId),
    Ability(AbilityId),
    Land(CardId),
    /// Sorted attacker set.
    Attack(Vec<CardId>),
    /// Sorted (attacker, blocker) pairs.
    Block(Vec<(CardId, CardId)>),
    Pass,
}

impl Action {
    /// Derive the canonical key for this action.
    ///
    /// Attacker and blocker declarations are sorted so that the same set of
    /// creatures declared in a different order maps to the same key.
    pub fn canonical_key(&self) -> ActionKey {
        match self {
            Action::CastSpell { card } => ActionKey::Cast(*card),
            Action::ActivateAbility { ability, .. } => ActionKey::Ability(*ability),
            Action::PlayLand { card } => ActionKey::Land(*card),
            Action::DeclareAttackers { attackers } => {
                let mut sorted = attackers.clone();
                sorted.sort_unstable();
                ActionKey::Attack(sorted)
            }
            Action::DeclareBlockers { blocks } => {
                let mut sorted = blocks.clone();
                sorted.sort_unstable();
                ActionKey::Block(sorted)
            }
            Action::PassPriority => ActionKey::Pass,
        }
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            Action::CastSpell { .. } => ActionCategory::Spell,
            Action::ActivateAbility { .. } => ActionCategory::Ability,
            Action::DeclareAttackers { .. } => ActionCategory::Attack,
            Action::DeclareBlockers { .. } => ActionCategory::Block,
            Action::PlayLand { .. } => ActionCategory::Land,
            Action::PassPriority => ActionCategory::Pass,
        }
    }

    /// The ability this action activates, if it is an ability activation.
    pub fn ability_id(&self) -> Option<AbilityId> {
        match self {
            Action::ActivateAbility { ability, .. } => Some(*ability),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attacker_order_does_not_change_key() {
        let a = Action::DeclareAttackers {
            attackers: vec![CardId(3), CardId(1), CardId(2)],
        };
        let b = Action::DeclareAttackers {
            attackers: vec![CardId(1), CardId(2), CardId(3)],
        };
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn block_pairs_are_sorted() {
        let a = Action::DeclareBlockers {
            blocks: vec![(CardId(5), CardId(9)), (CardId(2), CardId(7))],
        };
        let b = Action::DeclareBlockers {
            blocks: vec![(CardId(2), CardId(7)), (CardId(5), CardId(9))],
        };
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn ability_key_ignores_source_instance() {
        // Two copies of the same card share an ability id; activating either
        // copy's ability is strategically the same move.
        let a = Action::ActivateAbility {
            source: CardId(10),
            ability: AbilityId(4),
        };
        let b = Action::ActivateAbility {
            source: CardId(11),
            ability: AbilityId(4),
        };
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn categories_rank_spells_highest() {
        assert!(
            ActionCategory::Spell.expansion_priority()
                > ActionCategory::Ability.expansion_priority()
        );
        assert!(
            ActionCategory::Ability.expansion_priority()
                > ActionCategory::Attack.expansion_priority()
        );
        assert_eq!(ActionCategory::Pass.expansion_priority(), 0);
    }
}
