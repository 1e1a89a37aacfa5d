//! Transposition table for cross-search statistic reuse.
//!
//! Distinct action sequences frequently converge on strategically identical
//! board states. The table keys aggregated node statistics by a canonical
//! hash of the snapshot, so a later search can seed fresh nodes with what an
//! earlier search already learned about the same position.

use game_core::{GameSnapshot, PlayerId};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Which entries go first when the table is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Evict the entries touched longest ago.
    #[default]
    LeastRecentlyUsed,
    /// Evict the entries deepest in their search trees. Deep positions are
    /// the least likely to recur at a future decision point.
    Deepest,
}

#[derive(Debug, Clone)]
pub struct TranspositionConfig {
    /// Maximum number of entries before eviction kicks in.
    pub max_entries: usize,

    /// Fraction of the table evicted in one pass.
    pub evict_fraction: f64,

    pub policy: EvictionPolicy,
}

impl Default for TranspositionConfig {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
            evict_fraction: 0.1,
            policy: EvictionPolicy::default(),
        }
    }
}

/// Aggregated statistics for one canonical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranspositionEntry {
    pub visits: u32,
    pub reward: f64,
    /// Distance from the root of the search tree that stored this entry.
    pub depth: u32,
    /// Logical access tick, not wall clock. Monotonic per table.
    last_access: u64,
}

/// Running counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranspositionStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl TranspositionStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug)]
pub struct TranspositionTable {
    entries: FxHashMap<String, TranspositionEntry>,
    config: TranspositionConfig,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl TranspositionTable {
    pub fn new(config: TranspositionConfig) -> Self {
        Self {
            entries: FxHashMap::default(),
            config,
            tick: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a position, bumping its recency on hit.
    pub fn lookup(&mut self, hash: &str) -> Option<TranspositionEntry> {
        self.tick += 1;
        match self.entries.get_mut(hash) {
            Some(entry) => {
                entry.last_access = self.tick;
                self.hits += 1;
                Some(*entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store statistics for a position.
    ///
    /// An existing entry is merged conservatively: visits and reward take
    /// the maximum of old and new (the better-explored figure), depth takes
    /// the minimum (positions matter most near the root). New keys trigger
    /// bulk eviction when the table is at capacity.
    pub fn store(&mut self, hash: String, visits: u32, reward: f64, depth: u32) {
        self.tick += 1;

        if let Some(entry) = self.entries.get_mut(&hash) {
            entry.visits = entry.visits.max(visits);
            entry.reward = entry.reward.max(reward);
            entry.depth = entry.depth.min(depth);
            entry.last_access = self.tick;
            return;
        }

        if self.entries.len() >= self.config.max_entries {
            self.evict();
        }

        self.entries.insert(
            hash,
            TranspositionEntry {
                visits,
                reward,
                depth,
                last_access: self.tick,
            },
        );
    }

    /// Remove an `evict_fraction` share of the table under the configured
    /// policy. Always removes at least one entry.
    fn evict(&mut self) {
        let count = ((self.entries.len() as f64 * self.config.evict_fraction).ceil() as usize)
            .clamp(1, self.entries.len());

        let mut ranked: Vec<(String, u64, u32)> = self
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.last_access, e.depth))
            .collect();
        match self.config.policy {
            EvictionPolicy::LeastRecentlyUsed => ranked.sort_by_key(|&(_, access, _)| access),
            EvictionPolicy::Deepest => {
                ranked.sort_by_key(|&(_, _, depth)| std::cmp::Reverse(depth))
            }
        }

        for (key, _, _) in ranked.into_iter().take(count) {
            self.entries.remove(&key);
        }
        self.evictions += count as u64;
        debug!(evicted = count, remaining = self.entries.len(), "transposition eviction");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.tick = 0;
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TranspositionStats {
        TranspositionStats {
            size: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(TranspositionConfig::default())
    }
}

/// Canonical position hash from `player`'s perspective.
///
/// Two snapshots that differ only in strategically irrelevant detail must
/// hash identically, so the hash covers the observable strategic state and
/// nothing else. Included: the querying player, the turn bucketed by five,
/// phase, active player, exact life totals, hand sizes, stack height, and
/// each battlefield sorted by printed card id with tap/sickness, counters
/// and net temporary modification. Excluded: instance ids, library order,
/// and the mana-pool breakdown.
pub fn compute_hash(snapshot: &GameSnapshot, player: PlayerId) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(128);
    let _ = write!(
        out,
        "p{}|t{}|ph{}|a{}",
        player.0,
        snapshot.turn / 5,
        snapshot.phase.as_u8(),
        snapshot.active_player.0,
    );

    for side in [player, player.opponent()] {
        let state = snapshot.player(side);
        let _ = write!(out, "|l{}h{}", state.life, state.hand.len());

        let mut permanents: Vec<String> = state
            .battlefield
            .iter()
            .map(|card| {
                format!(
                    "{}:{}{}c{}m{}",
                    card.card_id,
                    u8::from(card.tapped),
                    u8::from(card.summoning_sick),
                    card.counters,
                    card.net_temp_modification(),
                )
            })
            .collect();
        permanents.sort_unstable();
        let _ = write!(out, "b[{}]", permanents.join(","));
    }

    let _ = write!(out, "|s{}", snapshot.stack.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_duel::fixtures;

    fn small_table(policy: EvictionPolicy) -> TranspositionTable {
        TranspositionTable::new(TranspositionConfig {
            max_entries: 10,
            evict_fraction: 0.2,
            policy,
        })
    }

    #[test]
    fn test_store_lookup_round_trip() {
        let mut table = TranspositionTable::default();
        table.store("k".into(), 5, 3.5, 2);

        let entry = table.lookup("k").unwrap();
        assert_eq!(entry.visits, 5);
        assert_eq!(entry.reward, 3.5);
        assert_eq!(entry.depth, 2);
        assert!(table.lookup("missing").is_none());

        let stats = table.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_store_merges_by_max_and_min_depth() {
        let mut table = TranspositionTable::default();
        table.store("k".into(), 5, 3.0, 4);
        table.store("k".into(), 3, 7.0, 2);

        let entry = table.lookup("k").unwrap();
        assert_eq!(entry.visits, 5); // max
        assert_eq!(entry.reward, 7.0); // max
        assert_eq!(entry.depth, 2); // min
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut table = small_table(EvictionPolicy::LeastRecentlyUsed);
        for i in 0..50 {
            table.store(format!("k{i}"), 1, 0.5, 1);
            assert!(table.len() <= 10);
        }
        assert!(table.stats().evictions > 0);
    }

    #[test]
    fn test_lru_eviction_keeps_recent() {
        let mut table = small_table(EvictionPolicy::LeastRecentlyUsed);
        for i in 0..10 {
            table.store(format!("k{i}"), 1, 0.5, 1);
        }
        // Touch k0 so it is no longer the oldest.
        table.lookup("k0");
        table.store("new".into(), 1, 0.5, 1);

        assert!(table.lookup("k0").is_some());
        assert!(table.lookup("k1").is_none()); // oldest untouched entry went
    }

    #[test]
    fn test_deepest_eviction_keeps_shallow() {
        let mut table = small_table(EvictionPolicy::Deepest);
        for i in 0..10 {
            table.store(format!("k{i}"), 1, 0.5, i);
        }
        table.store("new".into(), 1, 0.5, 0);

        assert!(table.lookup("k0").is_some()); // depth 0 survives
        assert!(table.lookup("k9").is_none()); // deepest went
    }

    #[test]
    fn test_clear_resets_stats() {
        let mut table = TranspositionTable::default();
        table.store("k".into(), 1, 0.5, 1);
        table.lookup("k");
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.stats(), TranspositionStats::default());
    }

    #[test]
    fn test_hash_ignores_library_order() {
        let snapshot = fixtures::opening();
        let mut reordered = snapshot.clone();
        reordered.player_mut(game_core::PlayerId::ONE).library.reverse();
        assert_eq!(
            compute_hash(&snapshot, game_core::PlayerId::ONE),
            compute_hash(&reordered, game_core::PlayerId::ONE),
        );
    }

    #[test]
    fn test_hash_ignores_battlefield_instance_order() {
        let snapshot = fixtures::midgame();
        let mut reordered = snapshot.clone();
        reordered
            .player_mut(game_core::PlayerId::ONE)
            .battlefield
            .reverse();
        assert_eq!(
            compute_hash(&snapshot, game_core::PlayerId::ONE),
            compute_hash(&reordered, game_core::PlayerId::ONE),
        );
    }

    #[test]
    fn test_hash_distinguishes_strategic_changes() {
        let snapshot = fixtures::midgame();
        let base = compute_hash(&snapshot, game_core::PlayerId::ONE);

        let mut hurt = snapshot.clone();
        hurt.player_mut(game_core::PlayerId::ONE).life -= 1;
        assert_ne!(base, compute_hash(&hurt, game_core::PlayerId::ONE));

        let mut tapped = snapshot.clone();
        tapped.player_mut(game_core::PlayerId::ONE).battlefield[0].tapped = true;
        assert_ne!(base, compute_hash(&tapped, game_core::PlayerId::ONE));

        // Perspective is part of the key.
        assert_ne!(base, compute_hash(&snapshot, game_core::PlayerId::TWO));
    }

    #[test]
    fn test_hash_buckets_turns() {
        let snapshot = fixtures::midgame(); // turn 5
        let mut later = snapshot.clone();
        later.turn = 9; // same bucket (5..9 -> 1)
        assert_eq!(
            compute_hash(&snapshot, game_core::PlayerId::ONE),
            compute_hash(&later, game_core::PlayerId::ONE),
        );
        later.turn = 10; // next bucket
        assert_ne!(
            compute_hash(&snapshot, game_core::PlayerId::ONE),
            compute_hash(&later, game_core::PlayerId::ONE),
        );
    }
}
