//! MCTS configuration parameters.

use crate::constants::{DEFAULT_EXPLORATION, DEFAULT_ORACLE_PIECE_LIMIT, WORKERS_PER_CORE};
use serde::{Deserialize, Serialize};

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Exploration constant C in the UCB1 formula.
    /// Useful range 0.5 - 0.8; higher values spread visits more evenly.
    pub exploration: f64,

    /// Worker threads sharing the tree. 0 uses the hardware parallelism;
    /// larger values are capped at [`MctsConfig::max_workers`].
    pub threads: usize,

    /// Score in-flight selections as losses so concurrent workers spread out.
    pub virtual_loss: bool,

    /// Consult the endgame oracle at or below this many pieces, kings included.
    pub oracle_piece_limit: u32,

    /// Stop after exactly this many iterations, even if time remains.
    pub max_iterations: Option<u64>,

    /// On a leaf's first expansion, evaluate all its children in one
    /// evaluator call and back each of them up, instead of evaluating the
    /// leaf alone. Root visits then exceed the iteration count.
    pub batch_children: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            threads: 0,
            virtual_loss: true,
            oracle_piece_limit: DEFAULT_ORACLE_PIECE_LIMIT,
            max_iterations: None,
            batch_children: false,
        }
    }
}

impl MctsConfig {
    /// Create a small deterministic config for testing: one thread, 200 iterations.
    pub fn for_testing() -> Self {
        Self {
            threads: 1,
            max_iterations: Some(200),
            ..Self::default()
        }
    }

    /// Builder pattern: set exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Builder pattern: toggle virtual loss.
    pub fn with_virtual_loss(mut self, enabled: bool) -> Self {
        self.virtual_loss = enabled;
        self
    }

    pub fn with_oracle_piece_limit(mut self, pieces: u32) -> Self {
        self.oracle_piece_limit = pieces;
        self
    }

    /// Builder pattern: cap the total iteration count.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Builder pattern: evaluate fresh children as one batch.
    pub fn with_batch_children(mut self, enabled: bool) -> Self {
        self.batch_children = enabled;
        self
    }

    /// Upper bound on worker threads for this machine
    pub fn max_workers() -> usize {
        hardware_threads() * WORKERS_PER_CORE
    }

    /// Worker count after resolving `threads == 0` and applying the cap
    pub fn worker_count(&self) -> usize {
        match self.threads {
            0 => hardware_threads(),
            n => n.min(Self::max_workers()),
        }
    }
}

fn hardware_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!((config.exploration - 0.8).abs() < 1e-12);
        assert_eq!(config.threads, 0);
        assert!(config.virtual_loss);
        assert_eq!(config.oracle_piece_limit, 6);
        assert_eq!(config.max_iterations, None);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_exploration(0.5)
            .with_threads(3)
            .with_virtual_loss(false)
            .with_max_iterations(1000);

        assert!((config.exploration - 0.5).abs() < 1e-12);
        assert_eq!(config.worker_count(), 3);
        assert!(!config.virtual_loss);
        assert_eq!(config.max_iterations, Some(1000));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: MctsConfig = serde_json::from_str(r#"{"exploration": 0.6}"#).unwrap();
        assert!((config.exploration - 0.6).abs() < 1e-12);
        assert_eq!(config.oracle_piece_limit, 6);
        assert!(config.virtual_loss);
        assert!(!config.batch_children);
    }

    #[test]
    fn test_worker_count_is_capped() {
        let config = MctsConfig::default().with_threads(100_000);
        assert_eq!(config.worker_count(), MctsConfig::max_workers());
        assert!(MctsConfig::max_workers() >= WORKERS_PER_CORE);
    }
}
