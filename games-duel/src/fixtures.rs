//! Snapshot fixtures for search tests and benches.
//!
//! Instance ids are assigned in disjoint ranges per fixture so tests can
//! reference cards directly: player one owns ids below 100, player two ids
//! from 100 up.

use game_core::{
    AbilityId, CardId, CardInstance, CardKind, GameSnapshot, Phase, PlayerId, StackEntry, Zone,
};

/// Printed-card id of the vanilla 2/2 creature.
pub const BEAR: u32 = 1;
/// Printed-card id of the 1/1 with a free +1/+0 pump ability.
pub const PUMPER: u32 = 2;
/// Printed-card id of the basic land.
pub const FOREST: u32 = 3;
/// The pump ability shared by all `PUMPER` copies.
pub const PUMP: AbilityId = AbilityId(20);

pub fn creature(id: u32, card_id: u32, power: i32, toughness: i32, cost: u8) -> CardInstance {
    CardInstance {
        id: CardId(id),
        card_id,
        kind: CardKind::Creature {
            power,
            toughness,
            cost,
            pump: None,
        },
        zone: Zone::Hand,
        tapped: false,
        summoning_sick: false,
        counters: 0,
        temp_power: 0,
        temp_toughness: 0,
        attacking: false,
        blocking: None,
    }
}

pub fn bear(id: u32) -> CardInstance {
    creature(id, BEAR, 2, 2, 2)
}

pub fn pumper(id: u32) -> CardInstance {
    let mut c = creature(id, PUMPER, 1, 1, 1);
    c.kind = CardKind::Creature {
        power: 1,
        toughness: 1,
        cost: 1,
        pump: Some(PUMP),
    };
    c
}

pub fn land(id: u32) -> CardInstance {
    CardInstance {
        id: CardId(id),
        card_id: FOREST,
        kind: CardKind::Land,
        zone: Zone::Hand,
        tapped: false,
        summoning_sick: false,
        counters: 0,
        temp_power: 0,
        temp_toughness: 0,
        attacking: false,
        blocking: None,
    }
}

fn on_battlefield(mut card: CardInstance) -> CardInstance {
    card.zone = Zone::Battlefield;
    card
}

fn in_library(mut card: CardInstance) -> CardInstance {
    card.zone = Zone::Library;
    card
}

/// Turn one: both players at 20 with a hand of lands and creatures and a
/// stocked library. Player one holds priority in Main1.
pub fn opening() -> GameSnapshot {
    let mut snapshot = GameSnapshot::new(20);

    let p1 = &mut snapshot.players[0];
    p1.hand = vec![land(1), land(2), bear(3), pumper(4)];
    p1.library = (10..20)
        .map(|i| {
            if i % 2 == 0 {
                in_library(land(i))
            } else {
                in_library(bear(i))
            }
        })
        .collect();

    let p2 = &mut snapshot.players[1];
    p2.hand = vec![land(101), land(102), bear(103), bear(104)];
    p2.library = (110..120)
        .map(|i| {
            if i % 2 == 0 {
                in_library(land(i))
            } else {
                in_library(bear(i))
            }
        })
        .collect();

    snapshot
}

/// A developed midgame board: creatures and lands on both sides, cards in
/// hand, player one at priority in Main1 of their turn.
pub fn midgame() -> GameSnapshot {
    let mut snapshot = opening();
    snapshot.turn = 5;

    let p1 = &mut snapshot.players[0];
    p1.battlefield = vec![
        on_battlefield(land(30)),
        on_battlefield(land(31)),
        on_battlefield(land(32)),
        on_battlefield(bear(33)),
        on_battlefield(pumper(34)),
    ];

    let p2 = &mut snapshot.players[1];
    p2.battlefield = vec![
        on_battlefield(land(130)),
        on_battlefield(land(131)),
        on_battlefield(bear(132)),
    ];
    p2.life = 15;

    snapshot
}

/// A snapshot with exactly one legal action: player two cast a spell and
/// player one, holding priority, can only pass to let it resolve.
pub fn forced_pass() -> GameSnapshot {
    let mut snapshot = midgame();
    snapshot.active_player = PlayerId::TWO;
    snapshot.priority_player = PlayerId::ONE;
    snapshot.phase = Phase::Main1;

    let mut spell = bear(140);
    spell.zone = Zone::Stack;
    snapshot.stack.push(StackEntry {
        controller: PlayerId::TWO,
        card: spell,
        resolved: false,
        countered: false,
    });
    snapshot
}

/// Terminal snapshot won by `winner`.
pub fn won_by(winner: PlayerId) -> GameSnapshot {
    let mut snapshot = midgame();
    snapshot.game_over = true;
    snapshot.winner = Some(winner);
    snapshot.players[winner.opponent().index()].life = 0;
    snapshot
}

/// Terminal snapshot with no winner (turn-limit draw).
pub fn drawn() -> GameSnapshot {
    let mut snapshot = midgame();
    snapshot.turn = 61;
    snapshot.game_over = true;
    snapshot.winner = None;
    snapshot
}
