//! Game facade over the position model
//!
//! A [`Game`] is the mutable record a front end drives: it owns the current
//! position, the FEN clocks and the move history, and turns move text into
//! applied moves. Searching is delegated to [`MctsSearch`](crate::MctsSearch).
//!
//! ## Module Organization
//!
//! - `game` - Game lifecycle (new, from_fen, reset, to_fen)
//! - `moves` - Move execution and validation (play, is_legal, legal_moves)
//! - `state` - Game state queries, time budgets and engine replies

mod game;
mod moves;
mod state;

pub use game::Game;
pub use state::{GameState, TimeControl};
