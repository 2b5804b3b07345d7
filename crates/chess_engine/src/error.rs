//! Error types for chess engine
//!
//! Three families share one enum:
//! - format errors (`InvalidFen`, `InvalidMoveText`, `InvalidSquare`) reject
//!   malformed text before any state changes
//! - `IllegalMove` is the normal rejection of a move that leaves the mover's
//!   king attacked; search discards it silently
//! - contract violations (`NoPieceAtSquare`, `WrongPieceColor`) mean a caller
//!   handed `apply` a move that could never have been generated

use crate::types::{Color, Square};
use thiserror::Error;

/// Errors that can occur in the chess engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessEngineError {
    /// Malformed FEN text
    #[error("Invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// Malformed or unmatched move text
    #[error("Invalid move text: {text:?}")]
    InvalidMoveText { text: String },

    /// Square name outside a1-h8
    #[error("Invalid square: {text:?}")]
    InvalidSquare { text: String },

    /// Move leaves the mover's king attacked, or castles through check
    #[error("Illegal move: from square {from} to square {to}")]
    IllegalMove { from: Square, to: Square },

    /// No piece at source square
    #[error("No piece at source square {square}")]
    NoPieceAtSquare { square: Square },

    /// Piece does not belong to the side to move
    #[error("Piece at square {square} does not belong to {color}")]
    WrongPieceColor { square: Square, color: Color },
}

impl ChessEngineError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        ChessEngineError::InvalidFen {
            reason: reason.into(),
        }
    }

    /// True for errors that indicate a caller bug rather than a chess rule
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ChessEngineError::NoPieceAtSquare { .. } | ChessEngineError::WrongPieceColor { .. }
        )
    }

    pub fn is_illegal_move(&self) -> bool {
        matches!(self, ChessEngineError::IllegalMove { .. })
    }
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;
