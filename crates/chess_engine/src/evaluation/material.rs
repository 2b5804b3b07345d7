//! Material evaluation
//!
//! Evaluates a position by counting piece values (pawn 1, knight 3, bishop 3,
//! rook 5, queen 9) from the side to move's point of view, then squashes the
//! difference into a win probability with `sigmoid(diff / 5)`. An even
//! position maps to exactly 0.5; a queen up is about 0.86.

use super::{Evaluator, EvaluatorError};
use crate::board::Position;
use crate::constants::*;
use crate::types::{Color, PieceKind};

const WEIGHTS: [(PieceKind, f64); 5] = [
    (PieceKind::Queen, QUEEN_VALUE),
    (PieceKind::Rook, ROOK_VALUE),
    (PieceKind::Bishop, BISHOP_VALUE),
    (PieceKind::Knight, KNIGHT_VALUE),
    (PieceKind::Pawn, PAWN_VALUE),
];

/// Material of `color` minus material of its opponent, in pawns
pub fn material_balance(position: &Position, color: Color) -> f64 {
    WEIGHTS
        .iter()
        .map(|&(kind, value)| {
            let own = position.pieces(kind, color).count_ones() as f64;
            let theirs = position.pieces(kind, !color).count_ones() as f64;
            (own - theirs) * value
        })
        .sum()
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Win probability of the side to move from material alone
pub fn material_win_probability(position: &Position) -> f64 {
    sigmoid(material_balance(position, position.side_to_move()) / MATERIAL_SCALE)
}

/// Static heuristic evaluator; also the search's fallback
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        Ok(positions.iter().map(material_win_probability).collect())
    }

    fn name(&self) -> &'static str {
        "material"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_material_balance() {
        let start = Position::startpos();
        assert_eq!(material_balance(&start, Color::White), 0.0);
        assert_eq!(material_win_probability(&start), 0.5);
    }

    #[test]
    fn test_white_up_queen() {
        let mut position = Position::startpos();
        position.clear_square(D8);
        assert_eq!(material_balance(&position, Color::White), QUEEN_VALUE);
        let p = material_win_probability(&position);
        assert!(p > 0.85 && p < 0.87, "queen up should be ~0.86, got {p}");
    }

    #[test]
    fn test_value_is_relative_to_side_to_move() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let values = MaterialEvaluator.evaluate(&[white, black]).unwrap();
        assert!(values[0] > 0.5, "white to move and up a rook");
        assert!((values[0] + values[1] - 1.0).abs() < 1e-12, "perspectives mirror");
    }

    #[test]
    fn test_empty_board_is_even() {
        assert_eq!(material_balance(&Position::empty(), Color::Black), 0.0);
    }
}
