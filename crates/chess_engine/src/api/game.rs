//! Game lifecycle management
//!
//! Creating, loading, resetting and exporting a game record.

use crate::board::{parse_square, rank_of, Position};
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::fen::FEN_FIELDS;
use crate::moves::Move;
use crate::types::Color;
use tracing::debug;

/// Mutable game record over immutable positions
#[derive(Clone, Debug)]
pub struct Game {
    pub(super) position: Position,
    pub(super) halfmove_clock: u32,
    pub(super) fullmove_number: u32,
    pub(super) history: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// Create a new game with initial position
    pub fn new() -> Game {
        Game {
            position: Position::startpos(),
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// Load a game from all six FEN fields
    ///
    /// Unlike [`Position::from_fen`], this also reads the en-passant square
    /// (rank 6 with white to move, rank 3 with black) and both clocks.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let game = Game::from_fen("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2")?;
    /// assert_eq!(game.position().en_passant(), Some(44));
    /// ```
    pub fn from_fen(text: &str) -> ChessEngineResult<Game> {
        let position = Position::from_fen(text)?;
        let fields: Vec<&str> = text.split_whitespace().collect();
        debug_assert_eq!(fields.len(), FEN_FIELDS);

        let en_passant = match fields[3] {
            "-" => None,
            square => {
                let square = parse_square(square)
                    .map_err(|_| ChessEngineError::fen(format!("bad en-passant square {square:?}")))?;
                let (rank, expected) = match position.side_to_move() {
                    Color::White => (5, 6),
                    Color::Black => (2, 3),
                };
                if rank_of(square) != rank {
                    return Err(ChessEngineError::fen(format!(
                        "en-passant square {} must be on rank {} with {} to move",
                        fields[3],
                        expected,
                        position.side_to_move()
                    )));
                }
                Some(square)
            }
        };
        let halfmove_clock = parse_clock(fields[4], "halfmove clock")?;
        let fullmove_number = parse_clock(fields[5], "fullmove number")?;

        Ok(Game {
            position: position.with_en_passant(en_passant),
            halfmove_clock,
            fullmove_number,
            history: Vec::new(),
        })
    }

    /// Load either `startpos` or a FEN, keeping the current game on error
    pub fn set_position(&mut self, text: &str) -> ChessEngineResult<()> {
        *self = match text.trim() {
            "startpos" => Game::new(),
            fen => Game::from_fen(fen)?,
        };
        debug!("[GAME] Position set to {}", self.to_fen());
        Ok(())
    }

    /// Reset the game to starting position
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Moves played since the game was created or loaded
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Six-field FEN with the game's real clocks
    pub fn to_fen(&self) -> String {
        let fen = self.position.to_fen();
        let core: Vec<&str> = fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            core.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_clock(text: &str, name: &str) -> ChessEngineResult<u32> {
    text.parse()
        .map_err(|_| ChessEngineError::fen(format!("{name} must be a non-negative integer, found {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::START_FEN;

    #[test]
    fn test_new_game_is_start_position() {
        let game = Game::new();
        assert_eq!(game.to_fen(), START_FEN);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_from_fen_reads_all_fields() {
        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
        let game = Game::from_fen(fen).unwrap();
        assert_eq!(game.position().en_passant(), Some(parse_square("e6").unwrap()));
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.fullmove_number(), 2);
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn test_from_fen_rejects_bad_fields() {
        let bad = [
            "4k3/8/8/8/8/8/8/4K3 w - e4 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e3 0 1",
            "4k3/8/8/8/8/8/8/4K3 b - e6 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - z9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 -3",
            "4k3/8/8/8/8/8/8/4K3 w - -",
        ];
        for fen in bad {
            let err = Game::from_fen(fen).unwrap_err();
            assert!(matches!(err, ChessEngineError::InvalidFen { .. }), "{fen} gave {err}");
        }
    }

    #[test]
    fn test_en_passant_rank_follows_side_to_move() {
        let black = Game::from_fen("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(black.position().en_passant(), Some(parse_square("e3").unwrap()));
        assert!(black.is_legal("f4e3"));

        // a white pawn on d2 must not see e3 as a capture target
        let err = Game::from_fen("4k3/8/8/8/4p3/8/3P4/4K3 w - e3 0 1").unwrap_err();
        assert!(err.to_string().contains("rank 6"), "got {err}");
    }

    #[test]
    fn test_set_position_keeps_game_on_error() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 7 40").unwrap();
        assert!(game.set_position("not a fen").is_err());
        assert_eq!(game.fullmove_number(), 40);

        game.set_position("startpos").unwrap();
        assert_eq!(game.to_fen(), START_FEN);

        game.set_position("4k3/8/8/8/8/8/8/4K3 b - - 3 12").unwrap();
        game.reset();
        assert_eq!(game.fullmove_number(), 1);
    }
}
