//! Random playout evaluation
//!
//! Plays uniformly random legal moves from the leaf until the game is decided
//! or a ply cap is hit, and reports the result for the side to move at the
//! leaf.
//!
//! ## Stopping Rules
//!
//! - no legal move: mate is a loss for the side that cannot move, stalemate
//!   a draw
//! - the same Zobrist key seen three times since the last capture or pawn
//!   move: draw by repetition
//! - 100 plies without a capture or pawn move: draw (fifty-move rule)
//! - bare kings or a single minor piece left: draw
//! - ply cap reached: the material heuristic scores the final position
//!
//! The generator is seeded from the evaluator seed XOR the leaf's Zobrist
//! key, so the same leaf always produces the same playout and workers share
//! no mutable state.

use super::material::material_win_probability;
use super::{Evaluator, EvaluatorError};
use crate::bitset::bit;
use crate::board::Position;
use crate::constants::{DEFAULT_ROLLOUT_PLIES, FIFTY_MOVE_PLIES};
use crate::moves::Move;
use crate::tablebase::is_insufficient_material;
use crate::types::{Outcome, PieceKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug)]
pub struct RolloutEvaluator {
    max_plies: u32,
    seed: u64,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        RolloutEvaluator {
            max_plies: DEFAULT_ROLLOUT_PLIES,
            seed: 0,
        }
    }
}

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Win probability of the leaf's side to move from one playout
    pub fn rollout(&self, leaf: &Position) -> Result<f64, EvaluatorError> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ leaf.zobrist());
        let mut position = *leaf;
        let mut history = vec![position.zobrist()];
        let mut quiet_plies = 0u32;
        // outcome for the side to move in `position`
        let mut decided = None;

        for _ in 0..self.max_plies {
            if is_insufficient_material(&position) {
                decided = Some(Outcome::Draw);
                break;
            }
            let Some((mv, next)) = random_legal_child(&position, &mut rng)? else {
                decided = Some(position.outcome_without_moves());
                break;
            };

            let mover = position.side_to_move();
            let pawn_move = position.pieces(PieceKind::Pawn, mover) & bit(mv.from()) != 0;
            let capture = next.piece_count() < position.piece_count();
            position = next;

            if pawn_move || capture {
                history.clear();
                quiet_plies = 0;
            } else {
                quiet_plies += 1;
            }
            let key = position.zobrist();
            history.push(key);

            if history.iter().filter(|&&seen| seen == key).count() >= 3
                || quiet_plies >= FIFTY_MOVE_PLIES
            {
                decided = Some(Outcome::Draw);
                break;
            }
        }

        let value = match decided {
            Some(outcome) => outcome.value(),
            None => material_win_probability(&position),
        };
        Ok(if position.side_to_move() == leaf.side_to_move() {
            value
        } else {
            1.0 - value
        })
    }
}

/// Pick a uniformly random legal move by rejection over the pseudo-moves
fn random_legal_child(
    position: &Position,
    rng: &mut StdRng,
) -> Result<Option<(Move, Position)>, EvaluatorError> {
    let mut candidates = position.pseudo_moves();
    while !candidates.is_empty() {
        let mv = candidates.swap_remove(rng.random_range(0..candidates.len()));
        match position.apply(mv) {
            Ok(next) => return Ok(Some((mv, next))),
            Err(err) if err.is_illegal_move() => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(None)
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        positions.iter().map(|position| self.rollout(position)).collect()
    }

    fn name(&self) -> &'static str {
        "rollout"
    }
}
