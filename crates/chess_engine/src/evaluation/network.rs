//! Learned value function adapter
//!
//! The network itself lives outside this crate. [`ValueNetwork`] is the seam:
//! it takes the flat `[batch, 13, 8, 8]` tensor from
//! [`encode_batch`](super::encode_batch) and returns one value per position.
//! [`NetworkEvaluator`] handles batching and converts the network's output
//! to the side-to-move convention the search expects.

use super::tensor::encode_batch;
use super::{Evaluator, EvaluatorError};
use crate::board::Position;
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::types::Color;

/// External value model
pub trait ValueNetwork: Send + Sync {
    /// Run the model on `batch` encoded positions
    ///
    /// # Arguments
    ///
    /// * `input` - `batch * PLANE_SIZE` floats, plane-major per position
    /// * `batch` - Number of positions in `input`
    fn forward(&self, input: &[f32], batch: usize) -> Result<Vec<f32>, EvaluatorError>;
}

/// Whose win probability the network outputs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValuePerspective {
    SideToMove,
    White,
}

pub struct NetworkEvaluator<N> {
    network: N,
    batch_size: usize,
    perspective: ValuePerspective,
}

impl<N: ValueNetwork> NetworkEvaluator<N> {
    pub fn new(network: N) -> Self {
        NetworkEvaluator {
            network,
            batch_size: DEFAULT_BATCH_SIZE,
            perspective: ValuePerspective::SideToMove,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_perspective(mut self, perspective: ValuePerspective) -> Self {
        self.perspective = perspective;
        self
    }

    pub fn network(&self) -> &N {
        &self.network
    }
}

impl<N: ValueNetwork> Evaluator for NetworkEvaluator<N> {
    fn evaluate(&self, positions: &[Position]) -> Result<Vec<f64>, EvaluatorError> {
        let mut values = Vec::with_capacity(positions.len());
        for chunk in positions.chunks(self.batch_size) {
            let output = self.network.forward(&encode_batch(chunk), chunk.len())?;
            if output.len() != chunk.len() {
                return Err(EvaluatorError::BatchSizeMismatch {
                    expected: chunk.len(),
                    got: output.len(),
                });
            }
            for (position, raw) in chunk.iter().zip(output) {
                let value = f64::from(raw).clamp(0.0, 1.0);
                values.push(match self.perspective {
                    ValuePerspective::White if position.side_to_move() == Color::Black => {
                        1.0 - value
                    }
                    _ => value,
                });
            }
        }
        Ok(values)
    }

    fn name(&self) -> &'static str {
        "network"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::PLANE_SIZE;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the side-to-move plane value, counting calls
    struct SidePlane {
        calls: AtomicUsize,
    }

    impl ValueNetwork for SidePlane {
        fn forward(&self, input: &[f32], batch: usize) -> Result<Vec<f32>, EvaluatorError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            assert_eq!(input.len(), batch * PLANE_SIZE);
            Ok((0..batch)
                .map(|i| if input[i * PLANE_SIZE + 12 * 64] == 1.0 { 0.8 } else { 0.3 })
                .collect())
        }
    }

    struct Offline;

    impl ValueNetwork for Offline {
        fn forward(&self, _: &[f32], _: usize) -> Result<Vec<f32>, EvaluatorError> {
            Err(EvaluatorError::Unavailable("model not loaded".into()))
        }
    }

    #[test]
    fn test_chunks_into_batches() {
        let evaluator = NetworkEvaluator::new(SidePlane { calls: AtomicUsize::new(0) }).with_batch_size(2);
        let positions = vec![Position::startpos(); 5];
        let values = evaluator.evaluate(&positions).unwrap();
        assert_eq!(values.len(), 5);
        assert_eq!(evaluator.network.calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_white_perspective_is_flipped_for_black() {
        let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        let evaluator = NetworkEvaluator::new(SidePlane { calls: AtomicUsize::new(0) })
            .with_perspective(ValuePerspective::White);
        let values = evaluator.evaluate(&[Position::startpos(), black]).unwrap();
        assert!((values[0] - 0.8).abs() < 1e-6);
        assert!((values[1] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_unavailable_propagates() {
        let err = NetworkEvaluator::new(Offline).evaluate_one(&Position::startpos()).unwrap_err();
        assert!(matches!(err, EvaluatorError::Unavailable(_)));
    }
}
