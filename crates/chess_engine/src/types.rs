//! # Core Types - Colors, Piece Kinds, Castling Rights & Outcomes
//!
//! Small value types shared by every other module. Everything here is
//! `Copy` and cheap to pass by value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// Square index 0-63 (`a1 = 0`, `h8 = 63`)
pub type Square = u8;

/// Side of the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index of this color's aggregate occupancy board
    #[inline]
    pub const fn aggregate(self) -> usize {
        crate::constants::WHITE_PIECES + self as usize
    }

    /// FEN side-to-move token
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Piece kind, ordered so that `kind * 2 + color` is the board index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Board index of this kind for `color`
    #[inline]
    pub const fn board(self, color: Color) -> usize {
        self as usize * 2 + color as usize
    }

    /// Decode a board index (0-11) back to kind and color
    pub const fn from_board(index: usize) -> Option<(PieceKind, Color)> {
        if index >= crate::constants::PIECE_BOARDS {
            return None;
        }
        let kind = PieceKind::ALL[index / 2];
        let color = if index % 2 == 0 {
            Color::White
        } else {
            Color::Black
        };
        Some((kind, color))
    }

    /// Parse a FEN piece letter (uppercase = white)
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((kind, color))
    }

    pub const fn fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// Piece a pawn promotes to; the discriminant is the 2-bit selector in a [`Move`](crate::moves::Move)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl Promotion {
    pub const ALL: [Promotion; 4] = [
        Promotion::Knight,
        Promotion::Bishop,
        Promotion::Rook,
        Promotion::Queen,
    ];

    pub const fn from_bits(bits: u16) -> Promotion {
        match bits & 0b11 {
            0 => Promotion::Knight,
            1 => Promotion::Bishop,
            2 => Promotion::Rook,
            _ => Promotion::Queen,
        }
    }

    pub const fn piece_kind(self) -> PieceKind {
        match self {
            Promotion::Knight => PieceKind::Knight,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Queen => PieceKind::Queen,
        }
    }

    /// Lowercase suffix used in move text (`e7e8q`)
    pub const fn suffix(self) -> char {
        match self {
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Rook => 'r',
            Promotion::Queen => 'q',
        }
    }

    pub fn from_suffix(c: char) -> Option<Promotion> {
        match c.to_ascii_lowercase() {
            'n' => Some(Promotion::Knight),
            'b' => Some(Promotion::Bishop),
            'r' => Some(Promotion::Rook),
            'q' => Some(Promotion::Queen),
            _ => None,
        }
    }
}

/// Four independent castling-right flags packed into one byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(1);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(2);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(4);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(8);
    pub const ALL: CastlingRights = CastlingRights(15);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 | other.0)
    }

    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    /// Both rights of one color
    pub const fn for_color(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights(1 | 2),
            Color::Black => CastlingRights(4 | 8),
        }
    }

    /// Right lost when a piece leaves or is captured on `square`
    pub const fn touching(square: Square) -> CastlingRights {
        match square {
            crate::constants::H1 => CastlingRights::WHITE_KINGSIDE,
            crate::constants::A1 => CastlingRights::WHITE_QUEENSIDE,
            crate::constants::H8 => CastlingRights::BLACK_KINGSIDE,
            crate::constants::A8 => CastlingRights::BLACK_QUEENSIDE,
            _ => CastlingRights::NONE,
        }
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        let flags = [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ];
        for (flag, c) in flags {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Exact game result relative to the side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Win probability in [0, 1]
    pub const fn value(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }

    /// The same result seen by the other side
    pub const fn flip(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_round_trip() {
        for kind in PieceKind::ALL {
            for color in Color::BOTH {
                let index = kind.board(color);
                assert_eq!(
                    PieceKind::from_board(index),
                    Some((kind, color)),
                    "board index {index} should decode to {kind:?}/{color:?}"
                );
            }
        }
        assert_eq!(PieceKind::from_board(12), None);
    }

    #[test]
    fn test_fen_chars() {
        assert_eq!(
            PieceKind::from_fen_char('Q'),
            Some((PieceKind::Queen, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('n'),
            Some((PieceKind::Knight, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
        assert_eq!(PieceKind::Rook.fen_char(Color::White), 'R');
    }

    #[test]
    fn test_castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove(CastlingRights::for_color(Color::White));
        assert!(!rights.contains(CastlingRights::WHITE_KINGSIDE));
        assert!(rights.contains(CastlingRights::BLACK_QUEENSIDE));
        assert_eq!(rights.to_string(), "kq");
        assert_eq!(CastlingRights::NONE.to_string(), "-");
        assert_eq!(CastlingRights::touching(7), CastlingRights::WHITE_KINGSIDE);
        assert_eq!(CastlingRights::touching(12), CastlingRights::NONE);
    }

    #[test]
    fn test_outcome_flip() {
        assert_eq!(Outcome::Win.flip(), Outcome::Loss);
        assert_eq!(Outcome::Draw.flip(), Outcome::Draw);
        assert_eq!(Outcome::Loss.value(), 0.0);
    }
}
