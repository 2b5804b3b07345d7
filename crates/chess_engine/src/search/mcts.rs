//! MCTS worker pool and leaf evaluation
//!
//! Every worker runs the same loop against one shared tree:
//! 1. Selection: descend while the node is expanded and visited, taking the
//!    child with the highest priority (unvisited first, then UCB1)
//! 2. Expansion: generate the legal children on a node's first evaluation
//! 3. Evaluation: endgame oracle, then terminal outcome, then the evaluator.
//!    With `batch_children` the fresh children are evaluated together instead
//! 4. Backpropagation: walk parent links to the root, alternating polarity
//!
//! Each iteration is isolated. An error or panic inside one is logged, its
//! in-flight markers are released, and the worker moves on.

use super::config::MctsConfig;
use super::node::Node;
use super::{ChildStats, SearchError, SearchResult};
use crate::board::Position;
use crate::evaluation::{Evaluator, EvaluatorError, MaterialEvaluator};
use crate::tablebase::{EndgameOracle, NoTablebase};
use instant::Instant;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Search driver holding the injected evaluator and endgame oracle.
pub struct MctsSearch<E, O = NoTablebase> {
    evaluator: E,
    oracle: O,
    config: MctsConfig,
}

/// State shared by the workers of one `search` call
struct SearchState {
    root: Arc<Node>,
    deadline: Instant,
    claimed: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    fallback_warned: AtomicBool,
}

impl<E: Evaluator> MctsSearch<E, NoTablebase> {
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        Self {
            evaluator,
            oracle: NoTablebase,
            config,
        }
    }
}

impl<E: Evaluator, O: EndgameOracle> MctsSearch<E, O> {
    /// Replace the endgame oracle
    pub fn with_oracle<P: EndgameOracle>(self, oracle: P) -> MctsSearch<E, P> {
        MctsSearch {
            evaluator: self.evaluator,
            oracle,
            config: self.config,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Search `position` for at most `budget` wall time
    ///
    /// Returns the most visited root move. A root without legal moves
    /// returns [`SearchError::NoLegalMoves`] with the checkmate or stalemate
    /// outcome for the side to move.
    pub fn search(&self, position: &Position, budget: Duration) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let root = Node::root(*position);
        if root.expand()?.is_empty() {
            let outcome = position.outcome_without_moves();
            info!("[MCTS] No legal moves at root: {:?} for {}", outcome, position.side_to_move());
            return Err(SearchError::NoLegalMoves { outcome });
        }

        let state = SearchState {
            root,
            deadline: start + budget,
            claimed: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            fallback_warned: AtomicBool::new(false),
        };

        let workers = self.config.worker_count();
        debug!(
            "[MCTS] Searching {} with {} worker(s), budget {:?}, cap {:?}, evaluator {}",
            position.to_fen(),
            workers,
            budget,
            self.config.max_iterations,
            self.evaluator.name()
        );

        if workers == 1 {
            self.worker(&state, 0);
        } else {
            std::thread::scope(|scope| {
                for id in 0..workers {
                    let state = &state;
                    scope.spawn(move || self.worker(state, id));
                }
            });
        }

        let result = self.collect(position, &state, start.elapsed())?;
        info!(
            "[MCTS] Best move {} ({} visits of {}), win rate {:.3} for {}, {} iterations in {:?} ({:.0}/s), {} nodes",
            result.best_move,
            result.children.first().map_or(0, |child| child.visits),
            result.root_visits,
            result.win_rate,
            position.engine_color(),
            result.iterations,
            result.elapsed,
            result.iterations_per_second(),
            result.nodes
        );
        if result.failed_iterations > 0 {
            warn!("[MCTS] {} iteration(s) abandoned", result.failed_iterations);
        }
        Ok(result)
    }

    fn worker(&self, state: &SearchState, id: usize) {
        let mut ran = 0u64;
        while Instant::now() < state.deadline {
            if let Some(cap) = self.config.max_iterations {
                if state.claimed.fetch_add(1, Ordering::AcqRel) >= cap {
                    break;
                }
            }
            self.guarded_iteration(state);
            ran += 1;
        }
        trace!("[MCTS] Worker {} finished after {} iterations", id, ran);
    }

    fn guarded_iteration(&self, state: &SearchState) {
        let mut path = Vec::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.iterate(state, &mut path)));
        match result {
            Ok(Ok(())) => {
                state.completed.fetch_add(1, Ordering::Relaxed);
                return;
            }
            Ok(Err(SearchError::Engine(err))) if err.is_contract_violation() => {
                error!("[MCTS] Contract violation during iteration: {}", err);
            }
            Ok(Err(err)) => warn!("[MCTS] Iteration failed: {}", err),
            Err(payload) => warn!("[MCTS] Iteration panicked: {}", panic_message(&*payload)),
        }
        for node in &path {
            node.release_in_flight();
        }
        state.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn iterate(&self, state: &SearchState, path: &mut Vec<Arc<Node>>) -> Result<(), SearchError> {
        let mut node = Arc::clone(&state.root);
        node.add_in_flight();
        path.push(Arc::clone(&node));

        while node.is_expanded() && node.visits() > 0 {
            let Some(next) = node.select_child(self.config.exploration, self.config.virtual_loss)
            else {
                break;
            };
            let next = Arc::clone(next);
            next.add_in_flight();
            path.push(Arc::clone(&next));
            node = next;
        }

        match self.settled_value(&node)? {
            Some(value) => node.backpropagate(value),
            None if self.config.batch_children => {
                self.evaluate_children(state, &node)?;
                for visited in path.iter() {
                    visited.release_in_flight();
                }
            }
            None => {
                let position = node.position();
                let value = self.with_fallback(state, |evaluator| evaluator.evaluate_one(position))?;
                node.backpropagate(value);
            }
        }
        Ok(())
    }

    /// Value known without the evaluator: oracle answer or terminal outcome
    ///
    /// Expands `node` unless the oracle answers. `None` means the node has
    /// children and needs the evaluator.
    fn settled_value(&self, node: &Arc<Node>) -> Result<Option<f64>, SearchError> {
        let position = node.position();
        let oracle_limit = self.config.oracle_piece_limit.min(self.oracle.max_pieces());
        if position.piece_count() <= oracle_limit {
            if let Some(outcome) = self.oracle.probe(position).outcome() {
                return Ok(Some(outcome.value()));
            }
        }

        if node.expand()?.is_empty() {
            return Ok(Some(position.outcome_without_moves().value()));
        }
        Ok(None)
    }

    /// Value every child of `node` and back each one up
    ///
    /// Children the oracle or the rules settle are scored directly; the rest
    /// go to the evaluator in a single call. Nothing is recorded unless the
    /// whole batch succeeds.
    fn evaluate_children(&self, state: &SearchState, node: &Arc<Node>) -> Result<(), SearchError> {
        let children = node.expand()?;
        let mut settled = Vec::with_capacity(children.len());
        let mut batch = Vec::new();
        for child in children {
            let value = self.settled_value(child)?;
            if value.is_none() {
                batch.push(*child.position());
            }
            settled.push(value);
        }

        let evaluated = if batch.is_empty() {
            Vec::new()
        } else {
            self.with_fallback(state, |evaluator| evaluator.evaluate_checked(&batch))?
        };
        trace!("[MCTS] Evaluated {} of {} children in one batch", batch.len(), children.len());

        let mut evaluated = evaluated.into_iter();
        for (child, value) in children.iter().zip(settled) {
            if let Some(value) = value.or_else(|| evaluated.next()) {
                child.record(value);
            }
        }
        Ok(())
    }

    /// Run `call` on the evaluator, switching to material if it is unavailable
    fn with_fallback<T>(
        &self,
        state: &SearchState,
        call: impl Fn(&dyn Evaluator) -> Result<T, EvaluatorError>,
    ) -> Result<T, SearchError> {
        match call(&self.evaluator) {
            Err(EvaluatorError::Unavailable(reason)) => {
                if !state.fallback_warned.swap(true, Ordering::Relaxed) {
                    warn!(
                        "[MCTS] Evaluator {} unavailable ({}), falling back to material",
                        self.evaluator.name(),
                        reason
                    );
                }
                Ok(call(&MaterialEvaluator)?)
            }
            other => Ok(other?),
        }
    }

    fn collect(
        &self,
        position: &Position,
        state: &SearchState,
        elapsed: Duration,
    ) -> Result<SearchResult, SearchError> {
        let root = &state.root;
        let mut children: Vec<ChildStats> = root
            .children()
            .iter()
            .map(|child| ChildStats {
                mv: child.mv(),
                visits: child.visits(),
                mean: child.mean(),
            })
            .collect();
        children.sort_by(|a, b| b.visits.cmp(&a.visits).then(b.mean.total_cmp(&a.mean)));

        let Some(best) = children.first() else {
            return Err(SearchError::NoLegalMoves {
                outcome: position.outcome_without_moves(),
            });
        };

        // the root mean belongs to the player who moved into the root
        let opponent_view = if root.visits() == 0 { 0.5 } else { root.mean() };
        let win_rate = if position.engine_color() == position.side_to_move() {
            1.0 - opponent_view
        } else {
            opponent_view
        };

        Ok(SearchResult {
            best_move: best.mv,
            root_visits: root.visits(),
            win_rate,
            iterations: state.completed.load(Ordering::Relaxed),
            failed_iterations: state.failed.load(Ordering::Relaxed),
            nodes: root.subtree_size(),
            elapsed,
            children,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
