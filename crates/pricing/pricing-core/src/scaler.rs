//! Min-max scaling
//!
//! Column-wise affine scaling to a target range, with parameters that can be
//! persisted beside a model and restored exactly.

use ndarray::{Array1, Array2, Axis};
use pricing_spi::{FeatureScaler, PricingError, Result};
use serde::{Deserialize, Serialize};

/// Persisted min-max parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Column-wise min-max scaler
///
/// `transform(x) = x * scale + min` where
/// `scale = (hi - lo) / (data_max - data_min)` and
/// `min = lo - data_min * scale`. A constant column has its range treated
/// as 1 so it maps to `lo + (x - data_min)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    data_min: Array1<f64>,
    data_max: Array1<f64>,
    scale: Array1<f64>,
    min: Array1<f64>,
}

impl MinMaxScaler {
    /// Unfitted scaler targeting `[0, 1]`
    pub fn new() -> Self {
        Self::with_range(0.0, 1.0)
    }

    /// Unfitted scaler targeting `[lo, hi]`
    pub fn with_range(lo: f64, hi: f64) -> Self {
        Self {
            feature_range: (lo, hi),
            data_min: Array1::zeros(0),
            data_max: Array1::zeros(0),
            scale: Array1::zeros(0),
            min: Array1::zeros(0),
        }
    }

    /// Restore a fitted scaler from persisted parameters
    pub fn from_params(params: &ScalerParams) -> Result<Self> {
        let (lo, hi) = params.feature_range;
        if !(lo < hi) {
            return Err(PricingError::invalid_parameter(
                "feature_range",
                format!("lower bound {} must be below upper bound {}", lo, hi),
            ));
        }
        if params.data_min.len() != params.data_max.len() {
            return Err(PricingError::shape_mismatch(
                &[params.data_min.len()],
                &[params.data_max.len()],
            ));
        }
        if params.data_min.is_empty() {
            return Err(PricingError::invalid_parameter(
                "data_min",
                "scaler parameters have no columns",
            ));
        }
        if let Some(col) = params
            .data_min
            .iter()
            .zip(&params.data_max)
            .position(|(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return Err(PricingError::invalid_parameter(
                "data_min",
                format!("column {} has an invalid range", col),
            ));
        }

        let mut scaler = Self::with_range(lo, hi);
        scaler.set_bounds(
            Array1::from(params.data_min.clone()),
            Array1::from(params.data_max.clone()),
        );
        Ok(scaler)
    }

    /// Parameters suitable for persisting
    pub fn params(&self) -> ScalerParams {
        ScalerParams {
            data_min: self.data_min.to_vec(),
            data_max: self.data_max.to_vec(),
            feature_range: self.feature_range,
        }
    }

    /// Columns holding at least one value outside the fitted data range.
    ///
    /// Such values map outside the feature range, which a model trained on
    /// scaled data never saw.
    pub fn out_of_range_columns(&self, data: &Array2<f64>) -> Vec<usize> {
        data.axis_iter(Axis(1))
            .take(self.n_features())
            .enumerate()
            .filter(|(i, col)| {
                let (lo, hi) = (self.data_min[*i], self.data_max[*i]);
                col.iter().any(|&x| x < lo || x > hi)
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn set_bounds(&mut self, data_min: Array1<f64>, data_max: Array1<f64>) {
        let (lo, hi) = self.feature_range;
        let range = (&data_max - &data_min).mapv(|r| if r == 0.0 { 1.0 } else { r });
        let scale = range.mapv(|r| (hi - lo) / r);
        let min = lo - &data_min * &scale;
        self.data_min = data_min;
        self.data_max = data_max;
        self.scale = scale;
        self.min = min;
    }

    fn check_width(&self, data: &Array2<f64>) -> Result<()> {
        if !self.is_fitted() {
            return Err(PricingError::NotFitted);
        }
        if data.ncols() != self.n_features() {
            return Err(PricingError::shape_mismatch(
                &[data.nrows(), self.n_features()],
                &[data.nrows(), data.ncols()],
            ));
        }
        Ok(())
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureScaler for MinMaxScaler {
    fn fit(&mut self, data: &Array2<f64>) -> Result<()> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(PricingError::invalid_parameter(
                "data",
                format!("cannot fit on a {}x{} matrix", data.nrows(), data.ncols()),
            ));
        }
        let data_min = data.fold_axis(Axis(0), f64::INFINITY, |acc, &x| acc.min(x));
        let data_max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &x| acc.max(x));
        self.set_bounds(data_min, data_max);
        Ok(())
    }

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(data)?;
        Ok(data * &self.scale + &self.min)
    }

    fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(data)?;
        Ok((data - &self.min) / &self.scale)
    }

    fn n_features(&self) -> usize {
        self.scale.len()
    }

    fn name(&self) -> &str {
        "min_max"
    }
}
