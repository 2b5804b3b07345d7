//! Leaf evaluation
//!
//! The search asks an [`Evaluator`] for the probability that the side to move
//! wins from a leaf position. Implementations must be stateless and
//! thread-safe: every search worker calls the same instance without locking.
//!
//! ## Module Organization
//!
//! - `material` - static material heuristic squashed through a sigmoid
//! - `rollout` - seeded random playout to a result or a ply cap
//! - `tensor` - 13-plane input encoding for learned value functions
//! - `network` - adapter from an external value network to `Evaluator`

pub mod material;
pub mod network;
pub mod rollout;
pub mod tensor;

pub use material::{material_balance, MaterialEvaluator};
pub use network::{NetworkEvaluator, ValueNetwork, ValuePerspective};
pub use rollout::RolloutEvaluator;
pub use tensor::{encode_batch, encode_planes, PLANE_SIZE};

use crate::board::Position;
use crate::error::ChessEngineError;
use thiserror::Error;

/// Errors an evaluator can report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    /// Backing model or service cannot answer; the search falls back to a heuristic
    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("Evaluator returned {got} values for {expected} positions")]
    BatchSizeMismatch { expected: usize, got: usize },

    #[error("Evaluator returned {value}, outside [0, 1]")]
    OutOfRange { value: f64 },

    #[error("Rollout hit an inconsistent position: {0}")]
    Rollout(#[from] ChessEngineError),
}

/// Win-probability oracle for leaf positions
pub trait Evaluator: Send + Sync {
    /// Evaluate a batch of positions
    ///
    /// # Returns
    ///
    /// One value in [0, 1] per position, in input order, each the win
    /// probability of the side to move in that position.
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError>;

    /// Evaluate a batch, checking one in-range value per position
    fn evaluate_checked(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        let values = self.evaluate(positions)?;
        if values.len() != positions.len() {
            return Err(EvaluatorError::BatchSizeMismatch {
                expected: positions.len(),
                got: values.len(),
            });
        }
        if let Some(&value) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(EvaluatorError::OutOfRange { value });
        }
        Ok(values)
    }

    /// Evaluate a single position, checking the batch contract
    fn evaluate_one(&self, position: &Position) -> Result<f64, EvaluatorError> {
        let values = self.evaluate_checked(std::slice::from_ref(position))?;
        Ok(values[0])
    }

    /// Short name for logs
    fn name(&self) -> &'static str {
        "evaluator"
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        (**self).evaluate(positions)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        (**self).evaluate(positions)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Evaluator for Broken {
        fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
            Ok(vec![1.5; positions.len() + 1])
        }
    }

    struct Overshoot;

    impl Evaluator for Overshoot {
        fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
            Ok(vec![1.5; positions.len()])
        }
    }

    #[test]
    fn test_evaluate_one_checks_batch_length() {
        let err = Broken.evaluate_one(&Position::startpos()).unwrap_err();
        assert_eq!(err, EvaluatorError::BatchSizeMismatch { expected: 1, got: 2 });
    }

    #[test]
    fn test_evaluate_one_checks_range() {
        let err = Overshoot.evaluate_one(&Position::startpos()).unwrap_err();
        assert_eq!(err, EvaluatorError::OutOfRange { value: 1.5 });
    }

    #[test]
    fn test_evaluate_checked_batch() {
        let positions = [Position::startpos(); 3];
        let values = MaterialEvaluator.evaluate_checked(&positions).unwrap();
        assert_eq!(values.len(), 3);

        let err = Broken.evaluate_checked(&positions).unwrap_err();
        assert_eq!(err, EvaluatorError::BatchSizeMismatch { expected: 3, got: 4 });
        let err = Overshoot.evaluate_checked(&positions).unwrap_err();
        assert_eq!(err, EvaluatorError::OutOfRange { value: 1.5 });
    }

    #[test]
    fn test_boxed_evaluator_delegates() {
        let boxed: Box<dyn Evaluator> = Box::new(MaterialEvaluator);
        assert_eq!(boxed.name(), "material");
        let value = boxed.evaluate_one(&Position::startpos()).unwrap();
        assert!((value - 0.5).abs() < 1e-12);
    }
}
