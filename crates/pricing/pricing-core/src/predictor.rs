//! Price prediction
//!
//! Scales an engineered feature window, runs the sequence model and maps
//! the output back to prices.

use crate::artifact::{self, ArtifactMetadata};
use crate::calendar::FeatureEngineer;
use crate::provision::{provision, ScalerPair, ScalerSource};
use ndarray::{Array2, Axis};
use pricing_spi::{
    FeatureColumn, FeatureScaler, FeatureTable, Forecast, ForecastRequest, PricingError, Result,
    SequenceModel,
};
use std::path::Path;
use tracing::{debug, warn};

/// Model, scalers and feature engineer bundled for inference.
///
/// Immutable once built; share it behind an `Arc`.
pub struct PricePredictor {
    model: Box<dyn SequenceModel>,
    scalers: ScalerPair,
    engineer: FeatureEngineer,
    scaler_source: ScalerSource,
    metadata: ArtifactMetadata,
}

impl std::fmt::Debug for PricePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricePredictor")
            .field("model", &self.model.name())
            .field("scaler_source", &self.scaler_source)
            .field("window", &self.engineer.window())
            .finish()
    }
}

impl PricePredictor {
    /// Bundle a model with its scalers, checking that the shapes agree.
    pub fn new(
        model: Box<dyn SequenceModel>,
        scalers: ScalerPair,
        scaler_source: ScalerSource,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        let (steps, features) = model.input_shape();
        if scalers.features.n_features() != features {
            return Err(PricingError::shape_mismatch(
                &[features],
                &[scalers.features.n_features()],
            ));
        }
        if scalers.target.n_features() != 1 {
            return Err(PricingError::shape_mismatch(&[1], &[scalers.target.n_features()]));
        }
        if model.output_len() != steps {
            return Err(PricingError::shape_mismatch(&[steps], &[model.output_len()]));
        }
        Ok(Self {
            model,
            scalers,
            engineer: FeatureEngineer::with_window(steps),
            scaler_source,
            metadata,
        })
    }

    /// Load the artifact at `path` and provision scalers from `source`.
    pub fn load(path: impl AsRef<Path>, source: ScalerSource) -> Result<Self> {
        let loaded = artifact::load(path)?;
        let scalers = provision(source, loaded.scalers.as_ref())?;
        Self::new(Box::new(loaded.network), scalers, source, loaded.metadata)
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    pub fn scaler_source(&self) -> ScalerSource {
        self.scaler_source
    }

    /// Predict one price per row of `table`.
    ///
    /// Every call recomputes; nothing is cached.
    pub fn predict_table(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let matrix = table.to_matrix();
        let (steps, features) = self.model.input_shape();
        if matrix.dim() != (steps, features) {
            return Err(PricingError::shape_mismatch(
                &[steps, features],
                &[matrix.nrows(), matrix.ncols()],
            ));
        }

        let outside = self.scalers.features.out_of_range_columns(&matrix);
        if !outside.is_empty() {
            let columns: Vec<&str> = outside.iter().map(|&i| FeatureColumn::ALL[i].name()).collect();
            warn!(
                ?columns,
                scaler_source = %self.scaler_source,
                "Features fall outside the fitted scaler range"
            );
        }

        let scaled = self.scalers.features.transform(&matrix)?;
        let batch = scaled.insert_axis(Axis(0));
        let raw = self.model.predict(&batch)?;

        let column = Array2::from_shape_vec((raw.len(), 1), raw.iter().copied().collect())
            .map_err(|e| PricingError::NumericalError(e.to_string()))?;
        let prices: Vec<f64> = self
            .scalers
            .target
            .inverse_transform(&column)?
            .iter()
            .copied()
            .collect();

        if prices.len() != steps {
            return Err(PricingError::shape_mismatch(&[steps], &[prices.len()]));
        }
        debug!(model = self.model.name(), predictions = prices.len(), "Predicted window");
        Ok(prices)
    }

    /// Engineer features for `request` and predict the whole window.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<Forecast> {
        let table = self.engineer.generate_for(request)?;
        let prices = self.predict_table(&table)?;
        Ok(Forecast {
            start_date: request.start_date,
            dates: table.dates(),
            prices,
        })
    }
}
