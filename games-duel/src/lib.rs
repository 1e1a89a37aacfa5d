//! Reference two-player creature duel.
//!
//! This crate provides a complete, deliberately small card game implementing
//! the `game-core` [`RulesEngine`] boundary. It is the reference game used by
//! the search crate's tests and benches, in the same role TicTacToe plays for
//! a board-game engine: every feature the search core consumes is present —
//! hidden hands and libraries, a stack with pending spells, combat, a free
//! repeatable pump ability, and lethal / deck-out / turn-limit termination.
//!
//! # Rules summary
//!
//! - Turn structure: Main1 → Attackers → Blockers → Main2 → next turn.
//! - One land per turn; creatures cost that many untapped lands to cast.
//! - Casting puts the spell on the stack and passes priority to the
//!   opponent, who must pass for it to resolve (no responses in this game,
//!   but the stack window exists so searches see pending spells).
//! - Combat: unblocked attackers hit the defender's life total; a creature
//!   dies when opposing combat power meets its toughness.
//! - Some creatures have a free, repeatable "+1/+0 until end of turn" pump
//!   ability — the degenerate zero-cost loop the search core's anti-loop
//!   heuristics exist for.
//! - A player at zero life or drawing from an empty library loses; turn 60
//!   without a winner is a draw.

use game_core::{
    Action, CardId, CardInstance, CardKind, GameSnapshot, Phase, PlayerId, RulesEngine, RulesError,
    StackEntry, Zone,
};

pub mod fixtures;


/// Turn number at which an unfinished game is declared drawn.
pub const TURN_LIMIT: u32 = 60;

/// The duel rules engine. Stateless; all game state lives in the snapshot.
#[derive(Debug, Default)]
pub struct DuelRules;

impl DuelRules {
    pub fn new() -> Self {
        Self
    }

    fn main_phase_actions(&self, snapshot: &GameSnapshot, player: PlayerId) -> Vec<Action> {
        let me = snapshot.player(player);
        let mut actions = Vec::new();

        for card in &me.hand {
            match card.kind {
                CardKind::Land if me.lands_played == 0 => {
                    actions.push(Action::PlayLand { card: card.id });
                }
                CardKind::Creature { cost, .. } if cost as usize <= me.untapped_lands() => {
                    actions.push(Action::CastSpell { card: card.id });
                }
                _ => {}
            }
        }

        for card in me.creatures() {
            if let CardKind::Creature {
                pump: Some(ability),
                ..
            } = card.kind
            {
                actions.push(Action::ActivateAbility {
                    source: card.id,
                    ability,
                });
            }
        }

        actions.push(Action::PassPriority);
        actions
    }

    fn attacker_actions(&self, snapshot: &GameSnapshot, player: PlayerId) -> Vec<Action> {
        let eligible: Vec<CardId> = snapshot
            .player(player)
            .creatures()
            .filter(|c| !c.tapped && !c.summoning_sick)
            .map(|c| c.id)
            .collect();

        let mut actions = Vec::new();
        for &id in &eligible {
            actions.push(Action::DeclareAttackers {
                attackers: vec![id],
            });
        }
        if eligible.len() > 1 {
            actions.push(Action::DeclareAttackers {
                attackers: eligible,
            });
        }
        actions.push(Action::PassPriority);
        actions
    }

    fn blocker_actions(&self, snapshot: &GameSnapshot, player: PlayerId) -> Vec<Action> {
        let attackers: Vec<CardId> = snapshot
            .player(player.opponent())
            .creatures()
            .filter(|c| c.attacking)
            .map(|c| c.id)
            .collect();
        let blockers: Vec<CardId> = snapshot
            .player(player)
            .creatures()
            .filter(|c| !c.tapped)
            .map(|c| c.id)
            .collect();

        let mut actions = Vec::new();
        for &attacker in &attackers {
            for &blocker in &blockers {
                actions.push(Action::DeclareBlockers {
                    blocks: vec![(attacker, blocker)],
                });
            }
        }
        // Full trade: pair attackers and blockers off in order.
        let paired: Vec<(CardId, CardId)> = attackers
            .iter()
            .zip(blockers.iter())
            .map(|(&a, &b)| (a, b))
            .collect();
        if paired.len() > 1 {
            actions.push(Action::DeclareBlockers { blocks: paired });
        }
        actions.push(Action::PassPriority);
        actions
    }

    fn require_main_phase(snapshot: &GameSnapshot) -> Result<(), RulesError> {
        if !matches!(snapshot.phase, Phase::Main1 | Phase::Main2)
            || snapshot.priority_player != snapshot.active_player
        {
            return Err(RulesError::IllegalAction {
                reason: "only allowed in a main phase".into(),
            });
        }
        Ok(())
    }

    fn apply_cast(snapshot: &mut GameSnapshot, card_id: CardId) -> Result<(), RulesError> {
        let player = snapshot.priority_player;
        Self::require_main_phase(snapshot)?;
        if !snapshot.stack.is_empty() {
            return Err(RulesError::IllegalAction {
                reason: "cannot cast with a spell pending".into(),
            });
        }

        let me = snapshot.player_mut(player);
        let idx = me
            .hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(RulesError::MissingCard(card_id))?;

        let cost = match me.hand[idx].kind {
            CardKind::Creature { cost, .. } => cost as usize,
            CardKind::Land => {
                return Err(RulesError::IllegalAction {
                    reason: "lands are played, not cast".into(),
                })
            }
        };
        if me.untapped_lands() < cost {
            return Err(RulesError::IllegalAction {
                reason: "not enough untapped lands".into(),
            });
        }

        let mut remaining = cost;
        for card in me.battlefield.iter_mut() {
            if remaining == 0 {
                break;
            }
            if card.is_land() && !card.tapped {
                card.tapped = true;
                remaining -= 1;
            }
        }

        let mut card = me.hand.remove(idx);
        card.zone = Zone::Stack;
        snapshot.stack.push(StackEntry {
            controller: player,
            card,
            resolved: false,
            countered: false,
        });
        snapshot.priority_player = player.opponent();
        Ok(())
    }

    fn apply_play_land(snapshot: &mut GameSnapshot, card_id: CardId) -> Result<(), RulesError> {
        let player = snapshot.priority_player;
        Self::require_main_phase(snapshot)?;
        let me = snapshot.player_mut(player);
        if me.lands_played > 0 {
            return Err(RulesError::IllegalAction {
                reason: "already played a land this turn".into(),
            });
        }
        let idx = me
            .hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(RulesError::MissingCard(card_id))?;
        if !me.hand[idx].is_land() {
            return Err(RulesError::IllegalAction {
                reason: "card is not a land".into(),
            });
        }

        let mut card = me.hand.remove(idx);
        card.zone = Zone::Battlefield;
        card.tapped = false;
        me.battlefield.push(card);
        me.lands_played = 1;
        Ok(())
    }

    fn apply_ability(snapshot: &mut GameSnapshot, source: CardId) -> Result<(), RulesError> {
        let player = snapshot.priority_player;
        Self::require_main_phase(snapshot)?;
        let me = snapshot.player_mut(player);
        let card = me
            .battlefield
            .iter_mut()
            .find(|c| c.id == source)
            .ok_or(RulesError::MissingCard(source))?;
        match card.kind {
            CardKind::Creature { pump: Some(_), .. } => {
                card.temp_power += 1;
                Ok(())
            }
            _ => Err(RulesError::IllegalAction {
                reason: "card has no activatable ability".into(),
            }),
        }
    }

    fn apply_attackers(snapshot: &mut GameSnapshot, attackers: &[CardId]) -> Result<(), RulesError> {
        let player = snapshot.priority_player;
        if snapshot.phase != Phase::Attackers || player != snapshot.active_player {
            return Err(RulesError::IllegalAction {
                reason: "not the attacker declaration step".into(),
            });
        }
        if attackers.is_empty() {
            return Err(RulesError::IllegalAction {
                reason: "declare at least one attacker or pass".into(),
            });
        }

        let me = snapshot.player_mut(player);
        for &id in attackers {
            let card = me
                .battlefield
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(RulesError::MissingCard(id))?;
            if !card.is_creature() || card.tapped || card.summoning_sick {
                return Err(RulesError::IllegalAction {
                    reason: "creature cannot attack".into(),
                });
            }
            card.attacking = true;
            card.tapped = true;
        }
        snapshot.phase = Phase::Blockers;
        snapshot.priority_player = player.opponent();
        Ok(())
    }

    fn apply_blockers(
        snapshot: &mut GameSnapshot,
        blocks: &[(CardId, CardId)],
    ) -> Result<(), RulesError> {
        let player = snapshot.priority_player;
        if snapshot.phase != Phase::Blockers || player == snapshot.active_player {
            return Err(RulesError::IllegalAction {
                reason: "not the blocker declaration step".into(),
            });
        }

        for &(attacker, blocker) in blocks {
            let attacking = snapshot
                .player(player.opponent())
                .battlefield_card(attacker)
                .map(|c| c.attacking)
                .unwrap_or(false);
            if !attacking {
                return Err(RulesError::IllegalAction {
                    reason: "blocked card is not attacking".into(),
                });
            }
            let me = snapshot.player_mut(player);
            let card = me
                .battlefield
                .iter_mut()
                .find(|c| c.id == blocker)
                .ok_or(RulesError::MissingCard(blocker))?;
            if !card.is_creature() || card.tapped || card.blocking.is_some() {
                return Err(RulesError::IllegalAction {
                    reason: "creature cannot block".into(),
                });
            }
            card.blocking = Some(attacker);
        }

        Self::resolve_combat(snapshot);
        snapshot.phase = Phase::Main2;
        snapshot.priority_player = snapshot.active_player;
        Ok(())
    }

    fn apply_pass(snapshot: &mut GameSnapshot) {
        if let Some(entry) = snapshot.stack.pop() {
            // The responder passed: the pending spell resolves.
            let mut card = entry.card;
            card.zone = Zone::Battlefield;
            card.summoning_sick = true;
            snapshot.player_mut(entry.controller).battlefield.push(card);
            snapshot.priority_player = snapshot.active_player;
            return;
        }

        match snapshot.phase {
            Phase::Main1 => {
                snapshot.phase = Phase::Attackers;
            }
            Phase::Attackers => {
                // No attack this turn.
                snapshot.phase = Phase::Main2;
            }
            Phase::Blockers => {
                // Defender declines to block.
                Self::resolve_combat(snapshot);
                snapshot.phase = Phase::Main2;
                snapshot.priority_player = snapshot.active_player;
            }
            Phase::Main2 => {
                Self::end_turn(snapshot);
            }
        }
    }

    /// Deal combat damage, remove the dead, and check for lethal.
    fn resolve_combat(snapshot: &mut GameSnapshot) {
        let attacker_side = snapshot.active_player;
        let defender_side = attacker_side.opponent();

        let attacks: Vec<(CardId, i32, i32)> = snapshot
            .player(attacker_side)
            .creatures()
            .filter(|c| c.attacking)
            .map(|c| (c.id, c.power(), c.toughness()))
            .collect();

        let mut defender_life_loss = 0;
        let mut dead_attackers: Vec<CardId> = Vec::new();
        let mut dead_blockers: Vec<CardId> = Vec::new();

        for (attacker_id, power, toughness) in attacks {
            let blockers: Vec<(CardId, i32, i32)> = snapshot
                .player(defender_side)
                .creatures()
                .filter(|c| c.blocking == Some(attacker_id))
                .map(|c| (c.id, c.power(), c.toughness()))
                .collect();

            if blockers.is_empty() {
                defender_life_loss += power.max(0);
                continue;
            }

            // Attacker damage goes to the first blocker; all blockers hit back.
            let blocker_power: i32 = blockers.iter().map(|&(_, p, _)| p.max(0)).sum();
            if blocker_power >= toughness {
                dead_attackers.push(attacker_id);
            }
            let (first_blocker, _, first_toughness) = blockers[0];
            if power >= first_toughness {
                dead_blockers.push(first_blocker);
            }
        }

        Self::bury(snapshot, attacker_side, &dead_attackers);
        Self::bury(snapshot, defender_side, &dead_blockers);

        for card in snapshot.player_mut(attacker_side).battlefield.iter_mut() {
            card.attacking = false;
        }
        for card in snapshot.player_mut(defender_side).battlefield.iter_mut() {
            card.blocking = None;
        }

        let defender = snapshot.player_mut(defender_side);
        defender.life -= defender_life_loss;
        if defender.life <= 0 {
            snapshot.game_over = true;
            snapshot.winner = Some(attacker_side);
        }
    }

    fn bury(snapshot: &mut GameSnapshot, side: PlayerId, dead: &[CardId]) {
        let player = snapshot.player_mut(side);
        for &id in dead {
            if let Some(idx) = player.battlefield.iter().position(|c| c.id == id) {
                let mut card = player.battlefield.remove(idx);
                card.zone = Zone::Graveyard;
                card.tapped = false;
                card.attacking = false;
                card.blocking = None;
                card.temp_power = 0;
                card.temp_toughness = 0;
                player.graveyard.push(card);
            }
        }
    }

    fn end_turn(snapshot: &mut GameSnapshot) {
        // Temporary pump effects wear off for both players.
        for player in snapshot.players.iter_mut() {
            for card in player.battlefield.iter_mut() {
                card.temp_power = 0;
                card.temp_toughness = 0;
            }
        }

        snapshot.turn += 1;
        if snapshot.turn > TURN_LIMIT {
            snapshot.game_over = true;
            snapshot.winner = None;
            return;
        }

        let next = snapshot.active_player.opponent();
        snapshot.active_player = next;
        snapshot.priority_player = next;
        snapshot.phase = Phase::Main1;

        let player = snapshot.player_mut(next);
        player.lands_played = 0;
        for card in player.battlefield.iter_mut() {
            card.tapped = false;
            card.summoning_sick = false;
        }

        if player.library.is_empty() {
            // Deck-out: drawing from an empty library loses the game.
            snapshot.game_over = true;
            snapshot.winner = Some(next.opponent());
            return;
        }
        let mut card = player.library.remove(0);
        card.zone = Zone::Hand;
        player.hand.push(card);
    }
}

impl RulesEngine for DuelRules {
    fn legal_actions(&self, snapshot: &GameSnapshot, player: PlayerId) -> Vec<Action> {
        if snapshot.game_over || player != snapshot.priority_player {
            return Vec::new();
        }
        if !snapshot.stack.is_empty() {
            // The responder's only move in this game is to let it resolve.
            return vec![Action::PassPriority];
        }
        match snapshot.phase {
            Phase::Main1 | Phase::Main2 => self.main_phase_actions(snapshot, player),
            Phase::Attackers => self.attacker_actions(snapshot, player),
            Phase::Blockers => self.blocker_actions(snapshot, player),
        }
    }

    fn apply(&self, snapshot: &GameSnapshot, action: &Action) -> Result<GameSnapshot, RulesError> {
        if snapshot.game_over {
            return Err(RulesError::GameOver);
        }

        let mut next = snapshot.clone();
        match action {
            Action::CastSpell { card } => Self::apply_cast(&mut next, *card)?,
            Action::PlayLand { card } => Self::apply_play_land(&mut next, *card)?,
            Action::ActivateAbility { source, .. } => Self::apply_ability(&mut next, *source)?,
            Action::DeclareAttackers { attackers } => Self::apply_attackers(&mut next, attackers)?,
            Action::DeclareBlockers { blocks } => Self::apply_blockers(&mut next, blocks)?,
            Action::PassPriority => Self::apply_pass(&mut next),
        }
        Ok(next)
    }
}
