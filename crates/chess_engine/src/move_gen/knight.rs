//! Knight move generation
//!
//! Knights jump, so the precomputed pattern only needs the own-occupancy mask.

use super::{push_targets, tables};
use crate::bitset::BitSet;
use crate::board::Position;
use crate::moves::Move;
use crate::types::PieceKind;

pub(super) fn generate_knight_moves(position: &Position, moves: &mut Vec<Move>) {
    let us = position.side_to_move();
    let not_own = !position.occupancy(us);
    let t = tables();
    for from in BitSet(position.pieces(PieceKind::Knight, us)) {
        push_targets(from, t.knight[from as usize] & not_own, moves);
    }
}
