//! Attack detection and check testing
//!
//! To decide whether a square is attacked, a virtual piece of each kind is
//! placed on it and its attack pattern is intersected with the real enemy
//! board of that kind. A knight on the king square that "sees" an enemy knight
//! means the enemy knight sees the king, and so on for every kind. Pawns use
//! the capture pattern of the *defending* color, which points toward the
//! squares an attacking pawn would stand on.
//!
//! ## Performance
//!
//! Five table lookups and two slider calls, no iteration over pieces.

use super::{bishop_attacks, rook_attacks, tables};
use crate::board::Position;
use crate::types::{Color, PieceKind, Square};

impl Position {
    /// Check if a square is attacked by pieces of `by`
    ///
    /// # Arguments
    ///
    /// * `square` - Target square index (0-63)
    /// * `by` - Color of the attacking pieces
    ///
    /// # Returns
    ///
    /// `true` if any piece of `by` attacks the square
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // is f1 covered by black before castling kingside?
    /// let unsafe_transit = position.is_square_attacked(F1, Color::Black);
    /// ```
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let t = tables();
        let s = square as usize;
        let occupancy = self.all();
        let queens = self.pieces(PieceKind::Queen, by);

        t.knight[s] & self.pieces(PieceKind::Knight, by) != 0
            || bishop_attacks(square, occupancy) & (self.pieces(PieceKind::Bishop, by) | queens) != 0
            || rook_attacks(square, occupancy) & (self.pieces(PieceKind::Rook, by) | queens) != 0
            || t.pawn_capture[(!by).index()][s] & self.pieces(PieceKind::Pawn, by) != 0
            || t.king[s] & self.pieces(PieceKind::King, by) != 0
    }

    /// Is the king of `color` attacked?
    ///
    /// A missing king counts as being in check, so a position without one is
    /// never accepted as legal.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_square_attacked(king, !color),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_position_has_no_check() {
        let start = Position::startpos();
        assert!(!start.is_in_check(Color::White));
        assert!(!start.is_in_check(Color::Black));
    }

    #[test]
    fn test_each_attacker_kind() {
        let cases = [
            ("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1", true, "knight f3"),
            ("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1", true, "pawn d2"),
            ("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1", false, "pawn e2 only pushes"),
            ("4k3/8/8/b7/8/8/8/4K3 w - - 0 1", true, "bishop a5"),
            ("4k3/8/8/b7/8/2P5/8/4K3 w - - 0 1", false, "bishop blocked by c3 pawn"),
            ("4k3/4r3/8/8/8/8/8/4K3 w - - 0 1", true, "rook e7"),
            ("4k3/8/8/8/8/8/8/q3K3 w - - 0 1", true, "queen a1"),
            ("8/8/8/8/8/8/3k4/4K3 w - - 0 1", true, "adjacent king"),
        ];
        for (fen, expected, label) in cases {
            assert_eq!(position(fen).is_in_check(Color::White), expected, "{label}");
        }
    }

    #[test]
    fn test_black_king_attacked_by_white_pawn() {
        assert!(position("4k3/3P4/8/8/8/8/8/4K3 b - - 0 1").is_in_check(Color::Black));
        assert!(!position("4k3/4P3/8/8/8/8/8/4K3 b - - 0 1").is_in_check(Color::Black));
    }

    #[test]
    fn test_missing_king_counts_as_check() {
        assert!(position("8/8/8/8/8/8/8/4K3 w - - 0 1").is_in_check(Color::Black));
    }

    #[test]
    fn test_square_attack_for_castling_transit() {
        let p = position("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(!p.is_square_attacked(5, Color::Black));
        let p = position("4kr2/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(p.is_square_attacked(5, Color::Black), "f8 rook covers f1");
    }
}
