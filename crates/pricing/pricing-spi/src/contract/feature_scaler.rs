//! Column-wise scaler trait for feature and target matrices

use crate::error::Result;
use ndarray::Array2;

/// Column-wise affine scaler over `(rows, columns)` matrices
pub trait FeatureScaler: Send + Sync {
    /// Fit the scaler to data (learn per-column parameters)
    fn fit(&mut self, data: &Array2<f64>) -> Result<()>;

    /// Transform data forward
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>>;

    /// Inverse transform (undo the transformation)
    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>>;

    /// Number of columns the scaler was fitted on, 0 when unfitted
    fn n_features(&self) -> usize;

    /// Whether parameters are available
    fn is_fitted(&self) -> bool {
        self.n_features() > 0
    }

    /// Name of this scaler
    fn name(&self) -> &str;
}
