//! Move execution and validation
//!
//! Functions for playing move text against the game and checking legality.

use super::game::Game;
use crate::bitset::bit;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::moves::Move;
use crate::types::{Color, PieceKind};
use tracing::debug;

impl Game {
    /// Play a move given as text
    ///
    /// # Arguments
    ///
    /// * `text` - Move in `<origin><destination>[promotion]` form, e.g. `e7e8q`
    ///
    /// # Returns
    ///
    /// The resolved move with its flags. Malformed text is `InvalidMoveText`;
    /// a well-formed move the position does not allow is `IllegalMove`. The
    /// game is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut game = Game::new();
    /// game.play("e2e4")?;
    /// assert_eq!(game.position().en_passant(), Some(20));
    /// ```
    pub fn play(&mut self, text: &str) -> ChessEngineResult<Move> {
        let parsed: Move = text.trim().parse()?;
        let mv = self
            .position
            .resolve_move(text.trim())
            .map_err(|_| ChessEngineError::IllegalMove {
                from: parsed.from(),
                to: parsed.to(),
            })?;
        let next = self.position.apply(mv)?;

        let mover = self.position.side_to_move();
        let pawn_move = self.position.pieces(PieceKind::Pawn, mover) & bit(mv.from()) != 0;
        let capture = next.piece_count() < self.position.piece_count();
        if pawn_move || capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        self.position = next;
        self.history.push(mv);
        debug!("[GAME] {} played {}", mover, mv);
        Ok(mv)
    }

    /// Play several space-separated moves, stopping at the first failure
    pub fn play_all(&mut self, moves: &str) -> ChessEngineResult<()> {
        for text in moves.split_whitespace() {
            self.play(text)?;
        }
        Ok(())
    }

    /// Check whether move text is legal here without playing it
    pub fn is_legal(&self, text: &str) -> bool {
        self.position
            .resolve_move(text.trim())
            .and_then(|mv| self.position.apply(mv))
            .is_ok()
    }

    pub fn legal_moves(&self) -> ChessEngineResult<Vec<Move>> {
        self.position.legal_moves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveFlag;

    #[test]
    fn test_play_updates_clocks_and_history() {
        let mut game = Game::new();
        game.play_all("g1f3 g8f6 f3g1").unwrap();
        assert_eq!(game.halfmove_clock(), 3);
        assert_eq!(game.fullmove_number(), 2);
        assert_eq!(game.history().len(), 3);

        game.play("e7e5").unwrap();
        assert_eq!(game.halfmove_clock(), 0, "pawn move resets the clock");
        assert_eq!(game.fullmove_number(), 3);
        assert_eq!(game.position().en_passant(), Some(44));
    }

    #[test]
    fn test_play_recovers_flags() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let mv = game.play("e1g1").unwrap();
        assert_eq!(mv.flag(), MoveFlag::Castle);
        assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn test_en_passant_from_loaded_fen() {
        let mut game =
            Game::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        assert!(game.is_legal("e5f6"));
        game.play("e5f6").unwrap();
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.position().piece_count(), 31);
    }

    #[test]
    fn test_rejections_leave_game_untouched() {
        let mut game = Game::new();
        let before = game.to_fen();

        let err = game.play("e2e5").unwrap_err();
        assert_eq!(err, ChessEngineError::IllegalMove { from: 12, to: 36 });

        let err = game.play("e2").unwrap_err();
        assert!(matches!(err, ChessEngineError::InvalidMoveText { .. }));

        // pinned knight
        let mut pinned = Game::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(!pinned.is_legal("e2c3"));
        assert!(pinned.play("e2c3").unwrap_err().is_illegal_move());

        assert_eq!(game.to_fen(), before);
        assert!(game.history().is_empty());
        assert_eq!(game.legal_moves().unwrap().len(), 20);
    }
}
