//! Snapshot of a duel in progress.
//!
//! A [`GameSnapshot`] is the full game state, including both players' hidden
//! zones. The search core never mutates a snapshot in place; the rules engine
//! produces a new snapshot for every transition.

/// Identifies one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(0);
    pub const TWO: PlayerId = PlayerId(1);

    /// The other player.
    #[inline]
    pub fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0)
    }

    /// Index into per-player arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unique identity of one physical card in a game (instance id).
///
/// Two copies of the same printed card have distinct `CardId`s but share a
/// `card_id` on their [`CardInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardId(pub u32);

/// Identity of an activated ability (shared by all instances of a card).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbilityId(pub u32);

/// The zone a card currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Hand,
    Library,
    Battlefield,
    Stack,
    Graveyard,
}

/// What a card is, with its static characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Creature {
        power: i32,
        toughness: i32,
        /// Casting cost in untapped lands.
        cost: u8,
        /// Repeatable activated ability, if any.
        pump: Option<AbilityId>,
    },
    Land,
}

/// One physical card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInstance {
    /// Instance identity, unique within a game.
    pub id: CardId,
    /// Printed-card identity, shared by all copies.
    pub card_id: u32,
    pub kind: CardKind,
    pub zone: Zone,
    pub tapped: bool,
    pub summoning_sick: bool,
    /// Net +1/+1 counters (may be negative for -1/-1 counters).
    pub counters: i32,
    /// Temporary power modification, cleared at end of turn.
    pub temp_power: i32,
    /// Temporary toughness modification, cleared at end of turn.
    pub temp_toughness: i32,
    /// Currently declared as an attacker.
    pub attacking: bool,
    /// Attacker this card is blocking, if any.
    pub blocking: Option<CardId>,
}

impl CardInstance {
    /// Current power including counters and temporary modifications.
    /// Zero for non-creatures.
    pub fn power(&self) -> i32 {
        match self.kind {
            CardKind::Creature { power, .. } => power + self.counters + self.temp_power,
            CardKind::Land => 0,
        }
    }

    /// Current toughness including counters and temporary modifications.
    /// Zero for non-creatures.
    pub fn toughness(&self) -> i32 {
        match self.kind {
            CardKind::Creature { toughness, .. } => toughness + self.counters + self.temp_toughness,
            CardKind::Land => 0,
        }
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.kind, CardKind::Creature { .. })
    }

    pub fn is_land(&self) -> bool {
        matches!(self.kind, CardKind::Land)
    }

    /// Net temporary power/toughness modification, used by the transposition
    /// hash to distinguish pumped boards from unpumped ones.
    pub fn net_temp_modification(&self) -> i32 {
        self.temp_power + self.temp_toughness
    }
}

/// Floating mana, tracked by color plus generic.
///
/// The exact breakdown is deliberately ignored by the transposition hash;
/// only what the mana can pay for matters strategically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManaPool {
    pub generic: u8,
    /// White, blue, black, red, green.
    pub colors: [u8; 5],
}

impl ManaPool {
    pub fn total(&self) -> u32 {
        self.generic as u32 + self.colors.iter().map(|&c| c as u32).sum::<u32>()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Everything owned by one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub life: i32,
    pub hand: Vec<CardInstance>,
    pub library: Vec<CardInstance>,
    pub battlefield: Vec<CardInstance>,
    pub graveyard: Vec<CardInstance>,
    pub mana: ManaPool,
    /// Lands played this turn (one allowed).
    pub lands_played: u8,
}

impl PlayerState {
    pub fn new(life: i32) -> Self {
        Self {
            life,
            hand: Vec::new(),
            library: Vec::new(),
            battlefield: Vec::new(),
            graveyard: Vec::new(),
            mana: ManaPool::default(),
            lands_played: 0,
        }
    }

    /// Untapped lands on the battlefield (the player's available mana).
    pub fn untapped_lands(&self) -> usize {
        self.battlefield
            .iter()
            .filter(|c| c.is_land() && !c.tapped)
            .count()
    }

    pub fn creatures(&self) -> impl Iterator<Item = &CardInstance> {
        self.battlefield.iter().filter(|c| c.is_creature())
    }

    /// Find a battlefield card by instance id.
    pub fn battlefield_card(&self, id: CardId) -> Option<&CardInstance> {
        self.battlefield.iter().find(|c| c.id == id)
    }
}

/// A spell waiting to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub controller: PlayerId,
    pub card: CardInstance,
    pub resolved: bool,
    pub countered: bool,
}

/// Phase of the turn. Combat is split into its two declaration steps; damage
/// resolution happens when the blocker declaration is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Main1,
    Attackers,
    Blockers,
    Main2,
}

impl Phase {
    /// Stable discriminant for hashing.
    pub fn as_u8(self) -> u8 {
        match self {
            Phase::Main1 => 0,
            Phase::Attackers => 1,
            Phase::Blockers => 2,
            Phase::Main2 => 3,
        }
    }
}

/// The complete state of a duel, including hidden zones for both players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub turn: u32,
    pub active_player: PlayerId,
    /// The player who currently holds priority (whose actions are queried).
    pub priority_player: PlayerId,
    pub phase: Phase,
    pub players: [PlayerState; 2],
    pub stack: Vec<StackEntry>,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
}

impl GameSnapshot {
    /// A fresh game: both players at `life`, player one active in Main1.
    pub fn new(life: i32) -> Self {
        Self {
            turn: 1,
            active_player: PlayerId::ONE,
            priority_player: PlayerId::ONE,
            phase: Phase::Main1,
            players: [PlayerState::new(life), PlayerState::new(life)],
            stack: Vec::new(),
            game_over: false,
            winner: None,
        }
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_flips_between_players() {
        assert_eq!(PlayerId::ONE.opponent(), PlayerId::TWO);
        assert_eq!(PlayerId::TWO.opponent(), PlayerId::ONE);
    }

    fn creature(id: u32) -> CardInstance {
        CardInstance {
            id: CardId(id),
            card_id: 100,
            kind: CardKind::Creature {
                power: 2,
                toughness: 3,
                cost: 2,
                pump: None,
            },
            zone: Zone::Battlefield,
            tapped: false,
            summoning_sick: false,
            counters: 0,
            temp_power: 0,
            temp_toughness: 0,
            attacking: false,
            blocking: None,
        }
    }

    #[test]
    fn power_includes_counters_and_temp() {
        let mut c = creature(1);
        assert_eq!(c.power(), 2);
        assert_eq!(c.toughness(), 3);

        c.counters = 1;
        c.temp_power = 2;
        assert_eq!(c.power(), 5);
        assert_eq!(c.toughness(), 4);
    }

    #[test]
    fn snapshot_clone_is_independent() {
        let mut a = GameSnapshot::new(20);
        a.players[0].hand.push(creature(1));

        let b = a.clone();
        a.players[0].hand[0].tapped = true;
        a.players[0].life = 3;

        assert!(!b.players[0].hand[0].tapped);
        assert_eq!(b.players[0].life, 20);
    }

    #[test]
    fn mana_pool_total_sums_all_colors() {
        let pool = ManaPool {
            generic: 2,
            colors: [1, 0, 0, 3, 0],
        };
        assert_eq!(pool.total(), 6);
        assert!(!pool.is_empty());
        assert!(ManaPool::default().is_empty());
    }
}
