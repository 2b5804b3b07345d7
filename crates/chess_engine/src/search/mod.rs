//! Parallel Monte Carlo Tree Search
//!
//! A fixed pool of worker threads repeats select → expand → evaluate →
//! backpropagate against one shared tree until a deadline (and optionally an
//! iteration cap) is reached. The answer is the root child with the most
//! visits.
//!
//! ## Module Organization
//!
//! - `config` - tunable search parameters
//! - `node` - lock-free tree node with atomic statistics
//! - `mcts` - worker loop, leaf evaluation and result extraction

mod config;
mod mcts;
mod node;

pub use config::MctsConfig;
pub use mcts::MctsSearch;
pub use node::{AtomicF64, Node};

use crate::error::ChessEngineError;
use crate::evaluation::EvaluatorError;
use crate::moves::Move;
use crate::types::Outcome;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a search without a move.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The root is checkmate or stalemate
    #[error("No legal moves available ({outcome:?} for the side to move)")]
    NoLegalMoves { outcome: Outcome },

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Engine error: {0}")]
    Engine(#[from] ChessEngineError),
}

/// Statistics of one root move
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats {
    pub mv: Move,
    pub visits: u32,
    /// Win probability for the side to move at the root
    pub mean: f64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Most visited root move
    pub best_move: Move,

    pub root_visits: u32,

    /// Root win probability for the engine's color
    pub win_rate: f64,

    /// Root moves ordered by visits, most visited first
    pub children: Vec<ChildStats>,

    /// Iterations that completed and were backpropagated
    pub iterations: u64,

    /// Iterations abandoned after an error or panic
    pub failed_iterations: u64,

    pub nodes: usize,

    pub elapsed: Duration,
}

impl SearchResult {
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "bestmove {} winrate {:.3} visits {} iterations {} nodes {} time {}ms",
            self.best_move,
            self.win_rate,
            self.root_visits,
            self.iterations,
            self.nodes,
            self.elapsed.as_millis()
        )?;
        for child in &self.children {
            writeln!(f, "  {} visits {} mean {:.3}", child.mv, child.visits, child.mean)?;
        }
        Ok(())
    }
}
