//! Board state and square helpers
//!
//! [`Position`] is the bitboard board: twelve piece boards, three aggregates
//! and the small amount of scalar state the rules need. It is `Copy`; every
//! rule that changes the board returns a new value (see
//! [`Position::apply`]).

use crate::bitset::{bit, BitSet};
use crate::constants::*;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::{CastlingRights, Color, PieceKind, Square};
use std::fmt;

/// Convert file and rank (0-7) to a square index
#[inline]
pub const fn square_at(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// File of a square (0 = a)
#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

/// Rank of a square (0 = rank 1)
#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

/// Parse a square name such as `e4`
pub fn parse_square(text: &str) -> ChessEngineResult<Square> {
    let invalid = || ChessEngineError::InvalidSquare {
        text: text.to_string(),
    };
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(invalid());
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return Err(invalid());
    }
    Ok(square_at(file, rank))
}

/// Write a square name such as `e4`
pub fn write_square(f: &mut impl fmt::Write, square: Square) -> fmt::Result {
    f.write_char((b'a' + file_of(square)) as char)?;
    f.write_char((b'1' + rank_of(square)) as char)
}

pub fn square_name(square: Square) -> String {
    let mut name = String::with_capacity(2);
    // writing to a String cannot fail
    let _ = write_square(&mut name, square);
    name
}

/// Bitboard chess position
///
/// Invariants kept by every constructor and by `apply`:
/// - each color aggregate is the union of that color's six piece boards
/// - the all-occupancy board is the union of the two aggregates
/// - no square is set on two piece boards
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) boards: [u64; BOARD_COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) engine_color: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
}

impl Position {
    /// Board with no pieces, white to move, no rights
    pub const fn empty() -> Self {
        Position {
            boards: [0; BOARD_COUNT],
            side_to_move: Color::White,
            engine_color: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
        }
    }

    /// Standard initial position, engine playing white
    pub const fn startpos() -> Self {
        Position {
            boards: START_BOARDS,
            side_to_move: Color::White,
            engine_color: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
        }
    }

    #[inline]
    pub fn board(&self, index: usize) -> u64 {
        self.boards[index]
    }

    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> u64 {
        self.boards[kind.board(color)]
    }

    /// Aggregate occupancy of one color
    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.boards[color.aggregate()]
    }

    #[inline]
    pub fn all(&self) -> u64 {
        self.boards[ALL_PIECES]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Color whose perspective the search reports results in
    #[inline]
    pub fn engine_color(&self) -> Color {
        self.engine_color
    }

    pub fn with_engine_color(mut self, color: Color) -> Self {
        self.engine_color = color;
        self
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn with_castling(mut self, rights: CastlingRights) -> Self {
        self.castling = rights;
        self
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Set or clear the en-passant target (FEN field 4 is parsed by the caller)
    pub fn with_en_passant(mut self, square: Option<Square>) -> Self {
        self.en_passant = square;
        self
    }

    /// Number of occupied squares
    #[inline]
    pub fn piece_count(&self) -> u32 {
        self.all().count_ones()
    }

    pub fn piece_at(&self, square: Square) -> Option<(PieceKind, Color)> {
        let mask = bit(square);
        if self.all() & mask == 0 {
            return None;
        }
        (0..PIECE_BOARDS)
            .find(|&index| self.boards[index] & mask != 0)
            .and_then(PieceKind::from_board)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        BitSet(self.pieces(PieceKind::King, color)).first()
    }

    /// Add a piece; the square must be empty
    pub fn put_piece(&mut self, kind: PieceKind, color: Color, square: Square) {
        let mask = bit(square);
        self.boards[kind.board(color)] |= mask;
        self.boards[color.aggregate()] |= mask;
        self.boards[ALL_PIECES] |= mask;
    }

    /// Remove whatever stands on `square`
    pub fn clear_square(&mut self, square: Square) {
        let mask = !bit(square);
        for board in self.boards.iter_mut() {
            *board &= mask;
        }
    }

    /// Recompute the three aggregates from the piece boards
    pub(crate) fn rebuild_aggregates(&mut self) {
        let mut white = 0;
        let mut black = 0;
        for kind in PieceKind::ALL {
            white |= self.boards[kind.board(Color::White)];
            black |= self.boards[kind.board(Color::Black)];
        }
        self.boards[WHITE_PIECES] = white;
        self.boards[BLACK_PIECES] = black;
        self.boards[ALL_PIECES] = white | black;
    }

    /// Check the board invariants
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0u64;
        let mut union = [0u64; 2];
        for index in 0..PIECE_BOARDS {
            if seen & self.boards[index] != 0 {
                return false;
            }
            seen |= self.boards[index];
            union[index % 2] |= self.boards[index];
        }
        union[0] == self.boards[WHITE_PIECES]
            && union[1] == self.boards[BLACK_PIECES]
            && union[0] | union[1] == self.boards[ALL_PIECES]
            && self.pieces(PieceKind::King, Color::White).count_ones() <= 1
            && self.pieces(PieceKind::King, Color::Black).count_ones() <= 1
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let c = match self.piece_at(square_at(file, rank)) {
                    Some((kind, color)) => kind.fen_char(color),
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_is_consistent() {
        let position = Position::startpos();
        assert!(position.is_consistent(), "start boards must satisfy the invariants");
        assert_eq!(position.piece_count(), 32);
        assert_eq!(position.king_square(Color::White), Some(E1));
        assert_eq!(position.king_square(Color::Black), Some(E8));
        assert_eq!(position.piece_at(D8), Some((PieceKind::Queen, Color::Black)));
        assert_eq!(position.piece_at(28), None);
    }

    #[test]
    fn test_square_names() {
        assert_eq!(parse_square("a1").unwrap(), 0);
        assert_eq!(parse_square("h8").unwrap(), 63);
        assert_eq!(parse_square("e4").unwrap(), 28);
        assert!(parse_square("i1").is_err());
        assert!(parse_square("a0").is_err());
        assert!(parse_square("a").is_err());
        assert_eq!(square_name(28), "e4");
    }

    #[test]
    fn test_put_and_clear_keep_invariants() {
        let mut position = Position::empty();
        position.put_piece(PieceKind::Rook, Color::Black, 40);
        position.put_piece(PieceKind::King, Color::White, 4);
        assert!(position.is_consistent());
        assert_eq!(position.piece_count(), 2);

        position.clear_square(40);
        assert!(position.is_consistent());
        assert_eq!(position.occupancy(Color::Black), 0);
    }

    #[test]
    fn test_detects_overlapping_boards() {
        let mut position = Position::startpos();
        position.boards[WHITE_QUEENS] |= bit(E1);
        assert!(!position.is_consistent());
    }

    #[test]
    fn test_display_shows_pieces() {
        let text = Position::startpos().to_string();
        assert!(text.starts_with("8  r n b q k b n r"));
        assert!(text.ends_with("white to move"));
    }
}
