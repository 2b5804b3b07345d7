//! # Move Codec - 16-bit Packed Moves
//!
//! A [`Move`] is a `u16` with four fields:
//!
//! | Bits  | Field                                              |
//! |-------|----------------------------------------------------|
//! | 0-5   | destination square                                 |
//! | 6-11  | origin square                                      |
//! | 12-13 | promotion selector (knight, bishop, rook, queen)   |
//! | 14-15 | flag (none, promotion, castle, pawn double start)  |
//!
//! Moves are values: generation creates them fresh every ply and nothing ever
//! mutates one. Plain moves come out of a global origin×destination table so
//! the generator never re-packs the common case.
//!
//! ## Move Text
//!
//! `Display` writes the 4-5 character form `e2e4` / `e7e8q`, and the null
//! move as `0000`. `FromStr` reads the same form without a position, so it
//! can only recover the promotion flag. [`Position::resolve_move`] matches the
//! text against the generated moves and returns the exact packed value,
//! castle and double-start flags included.

use crate::board::{parse_square, write_square, Position};
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::{Promotion, Square};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Meaning of the two top bits of a [`Move`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    None = 0,
    Promotion = 1,
    Castle = 2,
    DoubleStart = 3,
}

impl MoveFlag {
    const fn from_bits(bits: u16) -> MoveFlag {
        match bits & 0b11 {
            0 => MoveFlag::None,
            1 => MoveFlag::Promotion,
            2 => MoveFlag::Castle,
            _ => MoveFlag::DoubleStart,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

const SQUARE_MASK: u16 = 0x3f;
const FROM_SHIFT: u16 = 6;
const PROMOTION_SHIFT: u16 = 12;
const FLAG_SHIFT: u16 = 14;

impl Move {
    /// The "no move" value, printed as `0000`
    pub const NULL: Move = Move(0);

    /// Plain move with no flag
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move::with_flag(from, to, MoveFlag::None)
    }

    #[inline]
    pub const fn with_flag(from: Square, to: Square, flag: MoveFlag) -> Move {
        Move(
            (to as u16 & SQUARE_MASK)
                | ((from as u16 & SQUARE_MASK) << FROM_SHIFT)
                | ((flag as u16) << FLAG_SHIFT),
        )
    }

    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: Promotion) -> Move {
        Move(Move::with_flag(from, to, MoveFlag::Promotion).0 | ((piece as u16) << PROMOTION_SHIFT))
    }

    /// Decode a packed value; every `u16` is a well-formed move
    #[inline]
    pub const fn from_bits(bits: u16) -> Move {
        Move(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        (self.0 & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> FLAG_SHIFT)
    }

    /// Promotion piece, only for moves carrying the promotion flag
    #[inline]
    pub const fn promotion_piece(self) -> Option<Promotion> {
        match self.flag() {
            MoveFlag::Promotion => Some(Promotion::from_bits(self.0 >> PROMOTION_SHIFT)),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

static MOVE_TABLE: LazyLock<Box<[[Move; 64]; 64]>> = LazyLock::new(|| {
    let mut table = Box::new([[Move::NULL; 64]; 64]);
    for from in 0..64u8 {
        for to in 0..64u8 {
            table[from as usize][to as usize] = Move::new(from, to);
        }
    }
    table
});

/// Global origin×destination table of plain moves
pub fn move_table() -> &'static [[Move; 64]; 64] {
    &MOVE_TABLE
}

/// Plain move from the global table
#[inline]
pub fn lookup(from: Square, to: Square) -> Move {
    MOVE_TABLE[from as usize][to as usize]
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write_square(f, self.from())?;
        write_square(f, self.to())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.suffix())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}, {:?})", self.flag())
    }
}

impl FromStr for Move {
    type Err = ChessEngineError;

    /// Context-free parse: squares and promotion suffix only
    fn from_str(text: &str) -> ChessEngineResult<Move> {
        let invalid = || ChessEngineError::InvalidMoveText {
            text: text.to_string(),
        };
        if text == "0000" {
            return Ok(Move::NULL);
        }
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(invalid());
        }
        let from = parse_square(&text[0..2]).map_err(|_| invalid())?;
        let to = parse_square(&text[2..4]).map_err(|_| invalid())?;
        match text[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => Promotion::from_suffix(c)
                .map(|piece| Move::promotion(from, to, piece))
                .ok_or_else(invalid),
        }
    }
}

impl Position {
    /// Turn move text into the exact move the generator produces here
    ///
    /// # Arguments
    ///
    /// * `text` - Move in `<origin><destination>[promotion]` form
    ///
    /// # Returns
    ///
    /// The matching pseudo-legal move with its castle, double-start or
    /// promotion flag filled in. Legality is not checked; pass the result
    /// to [`Position::apply`] for that.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let position = Position::startpos();
    /// let mv = position.resolve_move("e2e4")?;
    /// assert_eq!(mv.flag(), MoveFlag::DoubleStart);
    /// ```
    pub fn resolve_move(&self, text: &str) -> ChessEngineResult<Move> {
        let parsed: Move = text.parse()?;
        self.pseudo_moves()
            .into_iter()
            .find(|mv| {
                mv.from() == parsed.from()
                    && mv.to() == parsed.to()
                    && mv.promotion_piece() == parsed.promotion_piece()
            })
            .ok_or_else(|| ChessEngineError::InvalidMoveText {
                text: text.to_string(),
            })
    }
}
