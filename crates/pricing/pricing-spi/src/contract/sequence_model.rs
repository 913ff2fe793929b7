//! Sequence model trait for windowed inference

use crate::error::{PricingError, Result};
use ndarray::{Array2, Array3};

/// A trained model mapping a `(batch, steps, features)` window to
/// `(batch, outputs)` predictions.
///
/// Implementations are immutable after construction so a single instance can
/// be shared across concurrent requests.
pub trait SequenceModel: Send + Sync {
    /// Run inference on a batch of windows
    fn predict(&self, input: &Array3<f64>) -> Result<Array2<f64>>;

    /// Expected `(steps, features)` of each window
    fn input_shape(&self) -> (usize, usize);

    /// Number of outputs produced per window
    fn output_len(&self) -> usize;

    /// Name of this model
    fn name(&self) -> &str;

    /// Validate a batch against [`SequenceModel::input_shape`].
    fn check_input(&self, input: &Array3<f64>) -> Result<()> {
        let (steps, features) = self.input_shape();
        let (batch, got_steps, got_features) = input.dim();
        if got_steps != steps || got_features != features {
            return Err(PricingError::shape_mismatch(
                &[batch, steps, features],
                &[batch, got_steps, got_features],
            ));
        }
        Ok(())
    }
}
