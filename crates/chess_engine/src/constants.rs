//! # Engine Constants - Board Layout, Castling Geometry & Search Defaults
//!
//! ## Board Indices
//!
//! A [`Position`](crate::board::Position) stores fifteen 64-bit boards. The
//! twelve piece boards are interleaved by color so that
//! `index = piece_kind * 2 + color`:
//!
//! | Index | Board          | Index | Board          |
//! |-------|----------------|-------|----------------|
//! | 0     | white king     | 1     | black king     |
//! | 2     | white queens   | 3     | black queens   |
//! | 4     | white rooks    | 5     | black rooks    |
//! | 6     | white bishops  | 7     | black bishops  |
//! | 8     | white knights  | 9     | black knights  |
//! | 10    | white pawns    | 11    | black pawns    |
//!
//! followed by the white aggregate (12), black aggregate (13) and the
//! all-occupancy board (14). The same order is used for the network tensor
//! planes, so it must not change once a model has been trained against it.
//!
//! ## Square Numbering
//!
//! Squares run `a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63`, so white
//! pawns advance by `+8` and black pawns by `-8`.

use crate::types::{CastlingRights, Color, Square};

pub const WHITE_KING: usize = 0;
pub const BLACK_KING: usize = 1;
pub const WHITE_QUEENS: usize = 2;
pub const BLACK_QUEENS: usize = 3;
pub const WHITE_ROOKS: usize = 4;
pub const BLACK_ROOKS: usize = 5;
pub const WHITE_BISHOPS: usize = 6;
pub const BLACK_BISHOPS: usize = 7;
pub const WHITE_KNIGHTS: usize = 8;
pub const BLACK_KNIGHTS: usize = 9;
pub const WHITE_PAWNS: usize = 10;
pub const BLACK_PAWNS: usize = 11;
pub const WHITE_PIECES: usize = 12;
pub const BLACK_PIECES: usize = 13;
pub const ALL_PIECES: usize = 14;

/// Number of piece boards (6 kinds × 2 colors)
pub const PIECE_BOARDS: usize = 12;
/// Piece boards plus the three aggregates
pub const BOARD_COUNT: usize = 15;

// Named squares used by castling and tests
pub const A1: Square = 0;
pub const B1: Square = 1;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const B8: Square = 57;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Boards of the standard initial position, in board index order
pub const START_BOARDS: [u64; BOARD_COUNT] = [
    0x0000_0000_0000_0010, // white king e1
    0x1000_0000_0000_0000, // black king e8
    0x0000_0000_0000_0008, // white queen d1
    0x0800_0000_0000_0000, // black queen d8
    0x0000_0000_0000_0081, // white rooks a1 h1
    0x8100_0000_0000_0000, // black rooks a8 h8
    0x0000_0000_0000_0024, // white bishops c1 f1
    0x2400_0000_0000_0000, // black bishops c8 f8
    0x0000_0000_0000_0042, // white knights b1 g1
    0x4200_0000_0000_0000, // black knights b8 g8
    0x0000_0000_0000_FF00, // white pawns
    0x00FF_0000_0000_0000, // black pawns
    0x0000_0000_0000_FFFF,
    0xFFFF_0000_0000_0000,
    0xFFFF_0000_0000_FFFF,
];

/// Geometry of one castling move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlePath {
    /// Right flag that must be held
    pub right: CastlingRights,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Square the king crosses; it may not be attacked
    pub transit: Square,
    /// Squares between king and rook; all must be empty
    pub interior: u64,
}

pub const CASTLE_PATHS: [CastlePath; 4] = [
    CastlePath {
        right: CastlingRights::WHITE_KINGSIDE,
        color: Color::White,
        king_from: E1,
        king_to: G1,
        rook_from: H1,
        rook_to: F1,
        transit: F1,
        interior: (1 << F1) | (1 << G1),
    },
    CastlePath {
        right: CastlingRights::WHITE_QUEENSIDE,
        color: Color::White,
        king_from: E1,
        king_to: C1,
        rook_from: A1,
        rook_to: D1,
        transit: D1,
        interior: (1 << B1) | (1 << C1) | (1 << D1),
    },
    CastlePath {
        right: CastlingRights::BLACK_KINGSIDE,
        color: Color::Black,
        king_from: E8,
        king_to: G8,
        rook_from: H8,
        rook_to: F8,
        transit: F8,
        interior: (1 << F8) | (1 << G8),
    },
    CastlePath {
        right: CastlingRights::BLACK_QUEENSIDE,
        color: Color::Black,
        king_from: E8,
        king_to: C8,
        rook_from: A8,
        rook_to: D8,
        transit: D8,
        interior: (1 << B8) | (1 << C8) | (1 << D8),
    },
];

/// Find the castle path a king move with the castle flag belongs to
pub fn castle_path(color: Color, king_to: Square) -> Option<&'static CastlePath> {
    CASTLE_PATHS
        .iter()
        .find(|path| path.color == color && path.king_to == king_to)
}

// Material weights in pawns, used by the static heuristic
pub const PAWN_VALUE: f64 = 1.0;
pub const KNIGHT_VALUE: f64 = 3.0;
pub const BISHOP_VALUE: f64 = 3.0;
pub const ROOK_VALUE: f64 = 5.0;
pub const QUEEN_VALUE: f64 = 9.0;
/// Divisor applied to the material difference before the sigmoid
pub const MATERIAL_SCALE: f64 = 5.0;

/// Default UCB1 exploration constant
pub const DEFAULT_EXPLORATION: f64 = 0.8;
/// Piece count at or below which the endgame oracle is consulted
pub const DEFAULT_ORACLE_PIECE_LIMIT: u32 = 6;
/// Search workers allowed per hardware thread
pub const WORKERS_PER_CORE: usize = 4;
/// Score of a child that has never been visited; dominates every UCB1 value
pub const UNVISITED_SCORE: f64 = 1000.0;

/// Ply cap for a single random rollout
pub const DEFAULT_ROLLOUT_PLIES: u32 = 200;
/// Plies without capture or pawn move before a rollout is scored as a draw
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Planes in the network input tensor: 12 piece planes + side to move
pub const TENSOR_PLANES: usize = 13;
/// Default network batch size
pub const DEFAULT_BATCH_SIZE: usize = 32;
