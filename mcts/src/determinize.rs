//! Determinization of hidden information.
//!
//! From the observing player's point of view the opponent's hand and both
//! libraries are hidden. A determinization produces one fully-observable
//! world consistent with everything the observer can see: the opponent's
//! hidden cards are pooled and redealt at random, keeping the hand exactly
//! its observed size.

use game_core::{GameSnapshot, PlayerId, Zone};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Produce a random world consistent with what `observer` can see.
///
/// The observer's own zones and all public zones are copied untouched. The
/// opponent's hand and library are pooled, shuffled, and resplit so the hand
/// keeps its original size.
pub fn determinize(
    snapshot: &GameSnapshot,
    observer: PlayerId,
    rng: &mut ChaCha20Rng,
) -> GameSnapshot {
    let mut world = snapshot.clone();

    let opponent = world.player_mut(observer.opponent());
    let hand_size = opponent.hand.len();

    let mut pool = Vec::with_capacity(hand_size + opponent.library.len());
    pool.append(&mut opponent.hand);
    pool.append(&mut opponent.library);
    pool.shuffle(rng);

    for (i, mut card) in pool.into_iter().enumerate() {
        if i < hand_size {
            card.zone = Zone::Hand;
            opponent.hand.push(card);
        } else {
            card.zone = Zone::Library;
            opponent.library.push(card);
        }
    }

    world
}
