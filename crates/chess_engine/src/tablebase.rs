//! Endgame oracle
//!
//! Exact win/draw/loss answers for positions with few pieces left. The search
//! consults an [`EndgameOracle`] before expanding any node at or below
//! [`EndgameOracle::max_pieces`]. Answers are from the side to move's view.
//!
//! No tablebase files ship with the crate. [`NoTablebase`] always declines,
//! [`InsufficientMaterialOracle`] knows the trivially drawn endings, and a
//! native Syzygy bridge can implement the trait and map its WDL codes with
//! [`Wdl::from_wdl_code`].

use crate::board::Position;
use crate::constants::DEFAULT_ORACLE_PIECE_LIMIT;
use crate::types::{Color, Outcome, PieceKind};

/// Oracle verdict for the side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wdl {
    Win,
    Draw,
    Loss,
    /// Position not covered; the search evaluates it normally
    Unavailable,
}

impl Wdl {
    /// Map a tablebase WDL code: 0 loss, 4 win, anything else a draw
    ///
    /// Codes 1 and 3 are cursed/blessed results that the fifty-move rule
    /// turns into draws.
    pub fn from_wdl_code(code: u32) -> Wdl {
        match code {
            0 => Wdl::Loss,
            4 => Wdl::Win,
            _ => Wdl::Draw,
        }
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Wdl::Win => Some(Outcome::Win),
            Wdl::Draw => Some(Outcome::Draw),
            Wdl::Loss => Some(Outcome::Loss),
            Wdl::Unavailable => None,
        }
    }
}

pub trait EndgameOracle: Send + Sync {
    fn probe(&self, position: &Position) -> Wdl;

    /// Largest total piece count, kings included, the oracle can answer
    fn max_pieces(&self) -> u32 {
        DEFAULT_ORACLE_PIECE_LIMIT
    }
}

impl<O: EndgameOracle + ?Sized> EndgameOracle for &O {
    fn probe(&self, position: &Position) -> Wdl {
        (**self).probe(position)
    }

    fn max_pieces(&self) -> u32 {
        (**self).max_pieces()
    }
}

impl<O: EndgameOracle + ?Sized> EndgameOracle for Box<O> {
    fn probe(&self, position: &Position) -> Wdl {
        (**self).probe(position)
    }

    fn max_pieces(&self) -> u32 {
        (**self).max_pieces()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoTablebase;

impl EndgameOracle for NoTablebase {
    fn probe(&self, _position: &Position) -> Wdl {
        Wdl::Unavailable
    }
}

/// Draws K v K, K+N v K and K+B v K; declines everything else
#[derive(Clone, Copy, Debug, Default)]
pub struct InsufficientMaterialOracle;

impl EndgameOracle for InsufficientMaterialOracle {
    fn probe(&self, position: &Position) -> Wdl {
        if is_insufficient_material(position) {
            Wdl::Draw
        } else {
            Wdl::Unavailable
        }
    }
}

/// True when neither side can possibly deliver mate
pub fn is_insufficient_material(position: &Position) -> bool {
    let heavy = [PieceKind::Queen, PieceKind::Rook, PieceKind::Pawn];
    let has_heavy = Color::BOTH.iter().any(|&color| {
        heavy
            .iter()
            .any(|&kind| position.pieces(kind, color) != 0)
    });
    if has_heavy {
        return false;
    }
    let minors: u32 = Color::BOTH
        .iter()
        .map(|&color| {
            (position.pieces(PieceKind::Knight, color) | position.pieces(PieceKind::Bishop, color))
                .count_ones()
        })
        .sum();
    minors <= 1
}
