//! Pawn move generation
//!
//! Handles pawn-specific move generation including:
//! - Single pushes onto empty squares
//! - Double pushes from the home row when the single step is free
//! - Diagonal captures, including onto the en-passant target
//! - Promotion, expanded into one move per promotion piece
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: never captures, so the target must be empty
//! - **Double push**: flagged so that `apply` records the skipped square
//! - **Captures**: only onto enemy pieces or the recorded en-passant square
//! - **Promotion**: any move landing on the far rank

use super::tables;
use crate::bitset::{bit, BitSet};
use crate::board::Position;
use crate::moves::{lookup, Move, MoveFlag};
use crate::types::{PieceKind, Promotion, Square};

pub(super) fn generate_pawn_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move();
    let side = us.index();
    let t = tables();
    let empty = !position.all();
    let ep = position.en_passant().map_or(0, bit);
    let enemies = position.occupancy(!us) | ep;

    for from in BitSet(position.pieces(PieceKind::Pawn, us)) {
        let s = from as usize;
        let quiet = t.pawn_quiet[side][s] & empty;
        let captures = t.pawn_capture[side][s] & enemies;

        for to in BitSet(quiet | captures) {
            push_pawn_move(from, to, t.promotion_row[side][to as usize], moves);
        }

        if quiet != 0 && t.start_row[side][s] {
            for to in BitSet(t.pawn_double[side][s] & empty) {
                moves.push(Move::with_flag(from, to, MoveFlag::DoubleStart));
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promotes: bool, moves: &mut Vec<Move>) {
    if promotes {
        moves.extend(Promotion::ALL.iter().map(|&piece| Move::promotion(from, to, piece)));
    } else {
        moves.push(lookup(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn_moves(fen: &str) -> Vec<String> {
        let mut moves = Vec::new();
        generate_pawn_moves(&Position::from_fen(fen).unwrap(), &mut moves);
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_promotion_yields_four_moves() {
        let moves = pawn_moves("3r3k/4P3/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(
            moves,
            vec!["e7d8n", "e7d8b", "e7d8r", "e7d8q", "e7e8n", "e7e8b", "e7e8r", "e7e8q"]
        );
    }

    #[test]
    fn test_double_step_needs_free_path() {
        assert!(pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").is_empty());
        let free = pawn_moves("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(free, vec!["e2e3"], "e4 is occupied so only the single step remains");
    }

    #[test]
    fn test_black_pawns_move_down() {
        let moves = pawn_moves("4k3/3p4/2P5/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(moves, vec!["d7c6", "d7d6", "d7d5"]);
    }

    #[test]
    fn test_en_passant_target_is_capturable() {
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1")
            .unwrap()
            .with_en_passant(Some(43));
        let mut moves = Vec::new();
        generate_pawn_moves(&position, &mut moves);
        assert!(moves.iter().any(|m| m.to_string() == "e5d6"));
    }
}
