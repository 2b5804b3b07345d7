//! Zobrist hashing
//!
//! One random 64-bit key per (piece board, square), plus keys for the side to
//! move, each castling-rights combination and each en-passant file. A
//! position's hash is the XOR of the keys of everything present. The keys come
//! from a fixed seed so hashes are stable across runs, which keeps seeded
//! rollouts reproducible.
//!
//! Used for repetition detection inside rollouts and for deriving a
//! per-position rollout seed.

use crate::bitset::BitSet;
use crate::board::{file_of, Position};
use crate::constants::PIECE_BOARDS;
use crate::types::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::LazyLock;

const ZOBRIST_SEED: u64 = 0x5441_5253_2d5a_4f42;

struct ZobristKeys {
    pieces: [[u64; 64]; PIECE_BOARDS],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static KEYS: LazyLock<ZobristKeys> = LazyLock::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut keys = ZobristKeys {
        pieces: [[0; 64]; PIECE_BOARDS],
        black_to_move: rng.random(),
        castling: [0; 16],
        en_passant_file: [0; 8],
    };
    for board in keys.pieces.iter_mut() {
        for key in board.iter_mut() {
            *key = rng.random();
        }
    }
    for key in keys.castling.iter_mut().skip(1) {
        *key = rng.random();
    }
    for key in keys.en_passant_file.iter_mut() {
        *key = rng.random();
    }
    keys
});

impl Position {
    /// Zobrist key of this position (engine color is not part of it)
    pub fn zobrist(&self) -> u64 {
        let keys = &*KEYS;
        let mut hash = 0u64;
        for (index, board_keys) in keys.pieces.iter().enumerate() {
            for square in BitSet(self.boards[index]) {
                hash ^= board_keys[square as usize];
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= keys.black_to_move;
        }
        hash ^= keys.castling[self.castling.bits() as usize];
        if let Some(square) = self.en_passant {
            hash ^= keys.en_passant_file[file_of(square) as usize];
        }
        hash
    }
}
