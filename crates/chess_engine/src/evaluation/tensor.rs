//! Network input encoding
//!
//! A position becomes 13 planes of 8×8 `f32`, laid out plane-major:
//! planes 0-11 are the piece boards in board index order (white king, black
//! king, white queens, ...), plane 12 is filled with 1.0 when white is to
//! move and 0.0 otherwise. Within a plane, element `rank * 8 + file` is the
//! square with the same index.

use crate::bitset::BitSet;
use crate::board::Position;
use crate::constants::{PIECE_BOARDS, TENSOR_PLANES};
use crate::types::Color;

/// Elements per encoded position
pub const PLANE_SIZE: usize = TENSOR_PLANES * 64;

/// Encode one position into `out`, which must hold [`PLANE_SIZE`] values
pub fn encode_into(position: &Position, out: &mut [f32]) {
    debug_assert_eq!(out.len(), PLANE_SIZE);
    out.fill(0.0);
    for plane in 0..PIECE_BOARDS {
        let base = plane * 64;
        for square in BitSet(position.board(plane)) {
            out[base + square as usize] = 1.0;
        }
    }
    if position.side_to_move() == Color::White {
        out[PIECE_BOARDS * 64..].fill(1.0);
    }
}

pub fn encode_planes(position: &Position) -> Vec<f32> {
    let mut out = vec![0.0; PLANE_SIZE];
    encode_into(position, &mut out);
    out
}

/// Encode a batch as one contiguous `[batch, 13, 8, 8]` buffer
pub fn encode_batch(positions: &[Position]) -> Vec<f32> {
    let mut out = vec![0.0; positions.len() * PLANE_SIZE];
    for (position, chunk) in positions.iter().zip(out.chunks_exact_mut(PLANE_SIZE)) {
        encode_into(position, chunk);
    }
    out
}
