//! Move application and legal move enumeration
//!
//! [`Position::apply`] is copy-make: it never touches `self` and returns the
//! successor position. It is also the only place where legality is decided.
//! Generation hands over pseudo-moves, `apply` plays them on a copy, and
//! rejects the copy when the mover's king ends up attacked.
//!
//! ## Special Moves
//!
//! - **Promotion**: the pawn bit on the destination moves to the chosen board
//! - **En passant**: a pawn landing on the recorded target removes the pawn
//!   one rank behind it
//! - **Castling**: the rook jumps to the king's other side; castling out of
//!   check or across an attacked square is illegal
//! - **Rights**: a king move drops both rights of its color, and any move from
//!   or onto a rook home square drops that square's right

use crate::bitset::bit;
use crate::board::Position;
use crate::constants::{castle_path, ALL_PIECES, PIECE_BOARDS};
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::moves::{Move, MoveFlag};
use crate::types::{CastlingRights, Color, Outcome, PieceKind};

impl Position {
    /// Play `mv` on a copy of this position
    ///
    /// # Arguments
    ///
    /// * `mv` - A move generated for this position (or resolved from text)
    ///
    /// # Returns
    ///
    /// - `Ok(next)` with the side to move flipped
    /// - `IllegalMove` if the mover's king is attacked afterwards, or a castle
    ///   starts in check or crosses an attacked square
    /// - `NoPieceAtSquare` / `WrongPieceColor` if the origin does not hold a
    ///   piece of the side to move; this is a caller bug, not a chess rule
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let start = Position::startpos();
    /// let next = start.apply(start.resolve_move("e2e4")?)?;
    /// assert_eq!(next.en_passant(), Some(20));
    /// ```
    pub fn apply(&self, mv: Move) -> ChessEngineResult<Position> {
        let us = self.side_to_move;
        let them = !us;
        let (from, to) = (mv.from(), mv.to());
        let (from_bit, to_bit) = (bit(from), bit(to));

        let kind = match self.piece_at(from) {
            Some((kind, color)) if color == us => kind,
            Some(_) => return Err(ChessEngineError::WrongPieceColor { square: from, color: us }),
            None => return Err(ChessEngineError::NoPieceAtSquare { square: from }),
        };
        let illegal = ChessEngineError::IllegalMove { from, to };

        let castle = match mv.flag() {
            MoveFlag::Castle if kind == PieceKind::King => {
                let path = castle_path(us, to).ok_or_else(|| illegal.clone())?;
                let rook_home = self.pieces(PieceKind::Rook, us) & bit(path.rook_from) != 0;
                if from != path.king_from
                    || !rook_home
                    || self.all() & path.interior != 0
                    || self.is_in_check(us)
                    || self.is_square_attacked(path.transit, them)
                {
                    return Err(illegal);
                }
                Some(path)
            }
            _ => None,
        };

        let mut next = *self;

        // capture: whatever stood on the destination goes
        for board in next.boards[..PIECE_BOARDS].iter_mut() {
            *board &= !to_bit;
        }
        next.boards[them.aggregate()] &= !to_bit;

        let moved = kind.board(us);
        next.boards[moved] = (next.boards[moved] & !from_bit) | to_bit;
        next.boards[us.aggregate()] = (next.boards[us.aggregate()] & !from_bit) | to_bit;

        if kind == PieceKind::Pawn {
            if let Some(piece) = mv.promotion_piece() {
                next.boards[moved] &= !to_bit;
                next.boards[piece.piece_kind().board(us)] |= to_bit;
            }
            if self.en_passant == Some(to) {
                let victim = match us {
                    Color::White => bit(to - 8),
                    Color::Black => bit(to + 8),
                };
                next.boards[PieceKind::Pawn.board(them)] &= !victim;
                next.boards[them.aggregate()] &= !victim;
            }
        }

        if let Some(path) = castle {
            let rook = PieceKind::Rook.board(us);
            let (rook_from, rook_to) = (bit(path.rook_from), bit(path.rook_to));
            next.boards[rook] = (next.boards[rook] & !rook_from) | rook_to;
            next.boards[us.aggregate()] = (next.boards[us.aggregate()] & !rook_from) | rook_to;
        }

        next.en_passant = match mv.flag() {
            MoveFlag::DoubleStart if kind == PieceKind::Pawn => Some((from + to) / 2),
            _ => None,
        };

        if kind == PieceKind::King {
            next.castling.remove(CastlingRights::for_color(us));
        }
        next.castling.remove(CastlingRights::touching(from));
        next.castling.remove(CastlingRights::touching(to));

        next.boards[ALL_PIECES] = next.occupancy(Color::White) | next.occupancy(Color::Black);

        if next.is_in_check(us) {
            return Err(illegal);
        }
        next.side_to_move = them;
        debug_assert!(next.is_consistent(), "apply broke board invariants: {mv:?}");
        Ok(next)
    }

    /// Every legal successor, paired with the move that produced it
    ///
    /// `IllegalMove` rejections are dropped; a contract violation from `apply`
    /// is returned as an error because generation must never produce one.
    pub fn legal_children(&self) -> ChessEngineResult<Vec<(Move, Position)>> {
        let mut children = Vec::new();
        for mv in self.pseudo_moves() {
            match self.apply(mv) {
                Ok(next) => children.push((mv, next)),
                Err(err) if err.is_illegal_move() => {}
                Err(err) => return Err(err),
            }
        }
        Ok(children)
    }

    pub fn legal_moves(&self) -> ChessEngineResult<Vec<Move>> {
        Ok(self
            .legal_children()?
            .into_iter()
            .map(|(mv, _)| mv)
            .collect())
    }

    /// Result for the side to move once it is known to have no legal move
    ///
    /// Mate is a loss; stalemate (king not attacked) is a draw.
    pub fn outcome_without_moves(&self) -> Outcome {
        if self.is_in_check(self.side_to_move) {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }

    /// `Some(outcome)` when the side to move has no legal move
    pub fn terminal_outcome(&self) -> ChessEngineResult<Option<Outcome>> {
        for mv in self.pseudo_moves() {
            match self.apply(mv) {
                Ok(_) => return Ok(None),
                Err(err) if err.is_illegal_move() => {}
                Err(err) => return Err(err),
            }
        }
        Ok(Some(self.outcome_without_moves()))
    }
}

/// Count legal leaf nodes `depth` plies below `position`
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(perft(&Position::startpos(), 3)?, 8_902);
/// ```
pub fn perft(position: &Position, depth: u32) -> ChessEngineResult<u64> {
    if depth == 0 {
        return Ok(1);
    }
    let children = position.legal_children()?;
    if depth == 1 {
        return Ok(children.len() as u64);
    }
    let mut nodes = 0;
    for (_, child) in &children {
        nodes += perft(child, depth - 1)?;
    }
    Ok(nodes)
}

/// Perft split by root move, sorted by move text
pub fn perft_divide(position: &Position, depth: u32) -> ChessEngineResult<Vec<(Move, u64)>> {
    let mut split = Vec::new();
    for (mv, child) in position.legal_children()? {
        split.push((mv, perft(&child, depth.saturating_sub(1))?));
    }
    split.sort_by_key(|(mv, _)| mv.to_string());
    Ok(split)
}
