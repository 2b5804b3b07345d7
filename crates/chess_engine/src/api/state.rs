//! Game state queries and engine replies
//!
//! Functions for querying the game result and asking the search for a move
//! under a clock.

use super::game::Game;
use crate::error::ChessEngineResult;
use crate::evaluation::Evaluator;
use crate::search::{MctsSearch, SearchError, SearchResult};
use crate::tablebase::EndgameOracle;
use crate::types::{Color, Outcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Percent of the remaining clock spent on one move
const CLOCK_PERCENT: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Checkmate,
    Stalemate,
}

/// Clock parameters in milliseconds
///
/// A fixed `movetime` wins over the clocks. Otherwise the side to move
/// spends 3% of its remaining time plus its increment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeControl {
    pub movetime: Option<u64>,
    pub wtime: u64,
    pub btime: u64,
    pub winc: u64,
    pub binc: u64,
}

impl TimeControl {
    pub fn fixed(movetime_ms: u64) -> Self {
        TimeControl {
            movetime: Some(movetime_ms),
            ..Default::default()
        }
    }

    /// Wall time `side` may spend on its next move
    pub fn budget(&self, side: Color) -> Duration {
        if let Some(movetime) = self.movetime {
            return Duration::from_millis(movetime);
        }
        let (time, increment) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        Duration::from_millis((time.saturating_mul(CLOCK_PERCENT) / 100).saturating_add(increment))
    }
}

impl Game {
    /// Get current game state (playing, checkmate, stalemate)
    pub fn state(&self) -> ChessEngineResult<GameState> {
        Ok(match self.position.terminal_outcome()? {
            None => GameState::Playing,
            Some(Outcome::Draw) => GameState::Stalemate,
            Some(_) => GameState::Checkmate,
        })
    }

    /// Search the current position for the side to move
    ///
    /// The game itself is not advanced; play the returned move to do that.
    pub fn reply<E: Evaluator, O: EndgameOracle>(
        &self,
        search: &MctsSearch<E, O>,
        clock: &TimeControl,
    ) -> Result<SearchResult, SearchError> {
        let side = self.position.side_to_move();
        let budget = clock.budget(side);
        info!(
            "[GAME] Thinking for {:?} as {} on move {}",
            budget, side, self.fullmove_number
        );
        let position = self.position.with_engine_color(side);
        search.search(&position, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::MaterialEvaluator;
    use crate::search::MctsConfig;

    #[test]
    fn test_budget_from_clock() {
        let clock = TimeControl {
            wtime: 60_000,
            btime: 10_000,
            winc: 500,
            binc: 0,
            movetime: None,
        };
        assert_eq!(clock.budget(Color::White), Duration::from_millis(2300));
        assert_eq!(clock.budget(Color::Black), Duration::from_millis(300));
        assert_eq!(TimeControl::fixed(750).budget(Color::Black), Duration::from_millis(750));
    }

    #[test]
    fn test_budget_saturates_on_huge_clocks() {
        let clock = TimeControl {
            wtime: u64::MAX,
            btime: u64::MAX / 2,
            winc: u64::MAX,
            ..Default::default()
        };
        assert_eq!(clock.budget(Color::White), Duration::from_millis(u64::MAX));
        assert_eq!(clock.budget(Color::Black), Duration::from_millis(u64::MAX / 100));
    }

    #[test]
    fn test_game_states() {
        assert_eq!(Game::new().state().unwrap(), GameState::Playing);

        let mut fools = Game::new();
        fools.play_all("f2f3 e7e5 g2g4 d8h4").unwrap();
        assert_eq!(fools.state().unwrap(), GameState::Checkmate);

        let stalemate = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.state().unwrap(), GameState::Stalemate);
    }

    #[test]
    fn test_reply_uses_side_to_move() {
        let mut game = Game::new();
        game.play("e2e4").unwrap();
        let search = MctsSearch::new(
            MaterialEvaluator,
            MctsConfig::for_testing().with_max_iterations(100),
        );
        let result = game.reply(&search, &TimeControl::fixed(60_000)).unwrap();
        assert!(game.is_legal(&result.best_move.to_string()));
        assert_eq!(game.history().len(), 1, "reply must not advance the game");
    }

    #[test]
    fn test_reply_on_finished_game() {
        let mut game = Game::new();
        game.play_all("f2f3 e7e5 g2g4 d8h4").unwrap();
        let search = MctsSearch::new(MaterialEvaluator, MctsConfig::for_testing());
        let err = game.reply(&search, &TimeControl::fixed(1_000)).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves { outcome: Outcome::Loss }));
    }
}
