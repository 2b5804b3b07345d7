//! Engine settings
//!
//! Everything the command-line tool needs to build a search: the MCTS
//! parameters, which evaluator to use, the default think time and the log
//! level. Serialized as JSON; missing fields take their defaults so an old
//! settings file keeps loading after new fields appear.

use super::error::{AppError, AppResult};
use chess_engine::{Evaluator, MaterialEvaluator, MctsConfig, RolloutEvaluator};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Leaf evaluator selected by name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// Material count through a sigmoid
    Material,
    /// Seeded random playouts
    #[default]
    Rollout,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// `trace`, `debug`, `info`, `warn` or `error`; `RUST_LOG` overrides it
    pub log_level: String,
    pub evaluator: EvaluatorKind,
    /// Ply cap for each rollout
    pub rollout_plies: u32,
    /// Base seed mixed into every rollout
    pub seed: u64,
    /// Think time when no clock is given, in milliseconds
    pub movetime_ms: u64,
    pub mcts: MctsConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            log_level: "info".to_string(),
            evaluator: EvaluatorKind::default(),
            rollout_plies: chess_engine::constants::DEFAULT_ROLLOUT_PLIES,
            seed: 0,
            movetime_ms: 1_000,
            mcts: MctsConfig::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> AppResult<()> {
        if !(self.mcts.exploration.is_finite() && self.mcts.exploration > 0.0) {
            return Err(AppError::invalid(
                "mcts.exploration",
                format!("must be a positive number, found {}", self.mcts.exploration),
            ));
        }

        let max_workers = MctsConfig::max_workers();
        if self.mcts.threads > max_workers {
            return Err(AppError::invalid(
                "mcts.threads",
                format!(
                    "{} exceeds the limit of {} for this machine",
                    self.mcts.threads, max_workers
                ),
            ));
        }

        if self.mcts.max_iterations == Some(0) {
            return Err(AppError::invalid("mcts.max_iterations", "must be greater than 0"));
        }

        if self.evaluator == EvaluatorKind::Rollout && self.rollout_plies == 0 {
            return Err(AppError::invalid("rollout_plies", "must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(AppError::invalid(
                "log_level",
                format!(
                    "'{}' is not one of trace, debug, info, warn, error",
                    self.log_level
                ),
            ));
        }

        Ok(())
    }

    /// Build the configured evaluator
    pub fn build_evaluator(&self) -> Box<dyn Evaluator> {
        match self.evaluator {
            EvaluatorKind::Material => Box::new(MaterialEvaluator),
            EvaluatorKind::Rollout => Box::new(
                RolloutEvaluator::new()
                    .with_max_plies(self.rollout_plies)
                    .with_seed(self.seed),
            ),
        }
    }
}
