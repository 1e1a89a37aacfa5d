//! Board-state evaluation.
//!
//! Two evaluation contracts back the search:
//!
//! - [`evaluate`] scores a snapshot for one player in `[0, 1]` and is what
//!   backpropagation consumes. It combines a handful of normalized
//!   differentials (life, board presence, hand size, lands, tempo), each
//!   clamped to `[-1, 1]`, into a weighted sum mapped affinely to `[0, 1]`.
//! - [`quick_evaluate`] returns an unbounded raw score for cheap greedy
//!   comparisons during rollouts. It uses the same signals un-normalized and
//!   adds the power of creatures still on the stack: a spell about to
//!   resolve is worth nearly its battlefield value, and ignoring it makes a
//!   one-ply lookahead systematically undervalue casting.
//!
//! Both functions are pure and allocation-free; they run on every simulated
//! node. The precise scale constants are tuned configuration, not contract —
//! only the signal set and signs are load-bearing.

use game_core::{GameSnapshot, PlayerId, PlayerState};

/// Weights and scales for [`evaluate`].
///
/// The five weights are expected to sum to 1.0; each signal is divided by
/// its scale ("max expected" magnitude) and clamped before weighting.
#[derive(Debug, Clone)]
pub struct EvalWeights {
    pub life: f64,
    pub board: f64,
    pub hand: f64,
    pub lands: f64,
    pub tempo: f64,

    /// Divisor normalizing the life differential.
    pub life_scale: f64,
    /// Divisor normalizing total board power+toughness.
    pub board_scale: f64,
    pub hand_scale: f64,
    pub land_scale: f64,
    pub tempo_scale: f64,

    /// Life total below which the quadratic low-life penalty kicks in.
    pub low_life_threshold: i32,
    /// Multiplier on the squared shortfall below the threshold.
    pub low_life_penalty: f64,
    /// Extra board value credited to each attacking creature.
    pub attacker_bonus: f64,
    /// Small board bonus for each untapped creature.
    pub untapped_bonus: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            life: 0.30,
            board: 0.30,
            hand: 0.15,
            lands: 0.15,
            tempo: 0.10,
            life_scale: 20.0,
            board_scale: 30.0,
            hand_scale: 7.0,
            land_scale: 8.0,
            tempo_scale: 12.0,
            low_life_threshold: 5,
            low_life_penalty: 1.0,
            attacker_bonus: 2.0,
            untapped_bonus: 0.5,
        }
    }
}

/// Coefficients for [`quick_evaluate`].
#[derive(Debug, Clone)]
pub struct QuickEvalCoeffs {
    pub life: f64,
    pub board: f64,
    pub hand: f64,
    pub lands: f64,
    /// Weight on power+toughness of creatures pending on the stack. Must be
    /// heavy relative to `board` or a one-ply greedy never casts anything.
    pub stack_power: f64,
}

impl Default for QuickEvalCoeffs {
    fn default() -> Self {
        Self {
            life: 2.0,
            board: 1.0,
            hand: 0.5,
            lands: 0.5,
            stack_power: 3.0,
        }
    }
}

/// Reward for a terminal snapshot from `player`'s perspective: 1.0 win,
/// 0.5 draw, 0.0 loss.
pub fn terminal_reward(snapshot: &GameSnapshot, player: PlayerId) -> f64 {
    match snapshot.winner {
        Some(winner) if winner == player => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

fn adjusted_life(life: i32, weights: &EvalWeights) -> f64 {
    let mut value = life as f64;
    if life < weights.low_life_threshold {
        let shortfall = (weights.low_life_threshold - life) as f64;
        value -= weights.low_life_penalty * shortfall * shortfall;
    }
    value
}

fn board_presence(player: &PlayerState, weights: &EvalWeights) -> f64 {
    let mut total = 0.0;
    for creature in player.creatures() {
        total += (creature.power() + creature.toughness()) as f64;
        if creature.attacking {
            total += weights.attacker_bonus;
        }
        if !creature.tapped {
            total += weights.untapped_bonus;
        }
    }
    total
}

fn land_count(player: &PlayerState) -> f64 {
    player.battlefield.iter().filter(|c| c.is_land()).count() as f64
}

fn untapped_permanents(player: &PlayerState) -> f64 {
    player.battlefield.iter().filter(|c| !c.tapped).count() as f64
}

fn stack_power(snapshot: &GameSnapshot, player: PlayerId) -> f64 {
    snapshot
        .stack
        .iter()
        .filter(|e| e.controller == player && !e.countered && !e.resolved)
        .filter(|e| e.card.is_creature())
        .map(|e| (e.card.power() + e.card.toughness()) as f64)
        .sum()
}

#[inline]
fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Score `snapshot` for `player` in `[0, 1]`.
pub fn evaluate(snapshot: &GameSnapshot, player: PlayerId, weights: &EvalWeights) -> f64 {
    if snapshot.game_over {
        return terminal_reward(snapshot, player);
    }

    let me = snapshot.player(player);
    let opp = snapshot.player(player.opponent());

    let life = clamp_unit(
        (adjusted_life(me.life, weights) - adjusted_life(opp.life, weights)) / weights.life_scale,
    );
    let board = clamp_unit(
        (board_presence(me, weights) - board_presence(opp, weights)) / weights.board_scale,
    );
    let hand = clamp_unit((me.hand.len() as f64 - opp.hand.len() as f64) / weights.hand_scale);
    let lands = clamp_unit((land_count(me) - land_count(opp)) / weights.land_scale);
    let tempo =
        clamp_unit((untapped_permanents(me) - untapped_permanents(opp)) / weights.tempo_scale);

    let combined = weights.life * life
        + weights.board * board
        + weights.hand * hand
        + weights.lands * lands
        + weights.tempo * tempo;

    // [-1, 1] -> [0, 1]
    (combined + 1.0) / 2.0
}

/// Unbounded raw score of `snapshot` for `player`, for greedy comparisons.
pub fn quick_evaluate(snapshot: &GameSnapshot, player: PlayerId, coeffs: &QuickEvalCoeffs) -> f64 {
    if snapshot.game_over {
        return match snapshot.winner {
            Some(winner) if winner == player => 1000.0,
            Some(_) => -1000.0,
            None => 0.0,
        };
    }

    let me = snapshot.player(player);
    let opp = snapshot.player(player.opponent());
    let flat = EvalWeights::default();

    let life = me.life as f64 - opp.life as f64;
    let board = board_presence(me, &flat) - board_presence(opp, &flat);
    let hand = me.hand.len() as f64 - opp.hand.len() as f64;
    let lands = land_count(me) - land_count(opp);
    let stack = stack_power(snapshot, player) - stack_power(snapshot, player.opponent());

    coeffs.life * life
        + coeffs.board * board
        + coeffs.hand * hand
        + coeffs.lands * lands
        + coeffs.stack_power * stack
}
