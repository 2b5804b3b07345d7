//! King move generation
//!
//! Ordinary king steps come from the adjacency table. Castling adds one move
//! per side when:
//! - the matching right flag is still set
//! - king and rook stand on their home squares
//! - every square between them is empty
//!
//! Attacked squares are not looked at here. [`Position::apply`] rejects a
//! castle out of check or across an attacked square, and the general
//! king-safety test covers the destination.

use super::{push_targets, tables};
use crate::bitset::bit;
use crate::board::Position;
use crate::constants::CASTLE_PATHS;
use crate::moves::{Move, MoveFlag};
use crate::types::PieceKind;

pub(super) fn generate_king_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move();
    let Some(from) = position.king_square(us) else {
        return;
    };
    let not_own = !position.occupancy(us);
    push_targets(from, tables().king[from as usize] & not_own, moves);

    let rooks = position.pieces(PieceKind::Rook, us);
    for path in CASTLE_PATHS.iter().filter(|path| path.color == us) {
        if position.castling().contains(path.right)
            && from == path.king_from
            && rooks & bit(path.rook_from) != 0
            && position.all() & path.interior == 0
        {
            moves.push(Move::with_flag(path.king_from, path.king_to, MoveFlag::Castle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn king_moves(fen: &str) -> Vec<String> {
        let mut moves = Vec::new();
        generate_king_moves(&Position::from_fen(fen).unwrap(), &mut moves);
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_castles_need_empty_interior() {
        let moves = king_moves("r3k2r/8/8/8/8/8/8/R3K1NR w KQkq - 0 1");
        assert!(moves.contains(&"e1c1".to_string()), "queenside is open");
        assert!(!moves.contains(&"e1g1".to_string()), "g1 knight blocks kingside");
    }

    #[test]
    fn test_castles_need_rights_and_rook() {
        assert!(!king_moves("4k3/8/8/8/8/8/8/4K2R w - - 0 1").contains(&"e1g1".to_string()));
        assert!(!king_moves("4k3/8/8/8/8/8/8/4K3 w K - 0 1").contains(&"e1g1".to_string()));
        assert!(king_moves("r3k3/8/8/8/8/8/8/4K3 b q - 0 1").contains(&"e8c8".to_string()));
    }

    #[test]
    fn test_castle_moves_carry_flag() {
        let mut moves = Vec::new();
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        generate_king_moves(&position, &mut moves);
        let castle = moves.iter().find(|m| m.to() == 6).copied();
        assert_eq!(castle.map(|m| m.flag()), Some(MoveFlag::Castle));
    }
}
