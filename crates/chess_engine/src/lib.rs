//! Bitboard chess engine with parallel Monte Carlo Tree Search
//!
//! The crate has two halves. The position model (`board`, `fen`, `moves`,
//! `move_gen`, `make_move`) stores a position as fifteen 64-bit boards,
//! generates pseudo-legal moves from precomputed tables, and filters legality
//! in one place: [`Position::apply`]. The search (`search`) runs select →
//! expand → evaluate → backpropagate on many threads over one shared tree,
//! asking an [`Evaluator`] and an [`EndgameOracle`] for leaf values.
//!
//! ```rust,ignore
//! use chess_engine::{MaterialEvaluator, MctsConfig, MctsSearch, Position};
//! use std::time::Duration;
//!
//! let search = MctsSearch::new(MaterialEvaluator, MctsConfig::default());
//! let result = search.search(&Position::startpos(), Duration::from_millis(500))?;
//! println!("bestmove {}", result.best_move);
//! ```

pub mod api;
pub mod bitset;
pub mod board;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod hash;
pub mod make_move;
pub mod move_gen;
pub mod moves;
pub mod search;
pub mod tablebase;
pub mod types;

pub use api::{Game, GameState, TimeControl};
pub use board::{parse_square, square_name, Position};
pub use error::{ChessEngineError, ChessEngineResult};
pub use evaluation::{
    Evaluator, EvaluatorError, MaterialEvaluator, NetworkEvaluator, RolloutEvaluator,
    ValueNetwork, ValuePerspective,
};
pub use make_move::{perft, perft_divide};
pub use moves::{Move, MoveFlag};
pub use search::{ChildStats, MctsConfig, MctsSearch, SearchError, SearchResult};
pub use tablebase::{EndgameOracle, InsufficientMaterialOracle, NoTablebase, Wdl};
pub use types::{CastlingRights, Color, Outcome, PieceKind, Promotion, Square};
