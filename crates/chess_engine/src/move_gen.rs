//! Pseudo-legal move generation from precomputed tables
//!
//! Every piece board of the side to move is walked square by square; the
//! matching table pattern is masked with "not own occupancy" and each target
//! becomes a move. Sliding pieces route through [`sliding::slide_attacks`].
//!
//! Nothing here checks king safety. The single legality gate is
//! [`Position::apply`], which rejects any move that leaves the mover's king
//! attacked.
//!
//! ## Module Organization
//!
//! - `tables` - jump, pawn and ray tables (lazy, process-wide)
//! - `sliding` - ray/blocker subtraction for rooks, bishops and queens
//! - `knight`, `king`, `pawn` - per-kind generators
//! - `attack` - square attack and check detection

pub mod attack;
mod king;
mod knight;
mod pawn;
pub mod sliding;
pub mod tables;

pub use sliding::{bishop_attacks, queen_attacks, rook_attacks, slide_attacks};
pub use tables::{init_tables, tables, AttackTables};

use crate::bitset::BitSet;
use crate::board::Position;
use crate::moves::{lookup, Move};
use crate::types::{PieceKind, Square};

/// Typical upper bound of pseudo-moves in a middlegame position
const MOVE_CAPACITY: usize = 64;

impl Position {
    /// All pseudo-legal moves of the side to move
    ///
    /// # Returns
    ///
    /// Moves in generation order: knights, bishops, rooks, queens, king
    /// (castles last), pawns. Some of them may leave the king in check.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let legal: Vec<Move> = position
    ///     .pseudo_moves()
    ///     .into_iter()
    ///     .filter(|&mv| position.apply(mv).is_ok())
    ///     .collect();
    /// ```
    pub fn pseudo_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MOVE_CAPACITY);
        let us = self.side_to_move;
        let not_own = !self.occupancy(us);
        let occupancy = self.all();
        let t = tables();

        knight::generate_knight_moves(self, &mut moves);

        let sliders = [
            (PieceKind::Bishop, &t.bishop_rays),
            (PieceKind::Rook, &t.rook_rays),
            (PieceKind::Queen, &t.queen_rays),
        ];
        for (kind, rays) in sliders {
            for from in BitSet(self.pieces(kind, us)) {
                push_targets(from, slide_attacks(from, occupancy, rays) & not_own, &mut moves);
            }
        }

        king::generate_king_moves(self, &mut moves);
        pawn::generate_pawn_moves(self, &mut moves);
        moves
    }
}

/// One plain move per target square
#[inline]
pub(crate) fn push_targets(from: Square, targets: u64, moves: &mut Vec<Move>) {
    moves.extend(BitSet(targets).map(|to| lookup(from, to)));
}
