//! Predictor configuration types.

use pricing_core::{
    ArtifactRegistry, PricingError, Result, ScalerSource, DEFAULT_MODEL_PATH, WINDOW_DAYS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Days of forecast shown to the user
pub const DEFAULT_HORIZON_DAYS: usize = 7;

/// Environment variable naming the model artifact path
pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
/// Environment variable selecting `artifact` or `synthetic` scalers
pub const ENV_SCALER_SOURCE: &str = "SCALER_SOURCE";
/// Environment variable seeding the synthetic scaler fit
pub const ENV_SCALER_SEED: &str = "SCALER_SEED";

/// Configuration for loading and presenting forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Model artifact location
    pub model_path: PathBuf,
    /// Where scaler parameters come from
    pub scaler_source: ScalerSource,
    /// Leading predictions surfaced to the user
    pub horizon_days: usize,
}

impl PredictorConfig {
    /// Create a configuration with the default horizon.
    pub fn new(model_path: impl Into<PathBuf>, scaler_source: ScalerSource) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_source,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Read `MODEL_PATH`, `SCALER_SOURCE` and `SCALER_SEED` from the process
    /// environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`PredictorConfig::from_env`] over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = PredictorConfigBuilder::new();
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            builder = builder.model_path(path);
        }
        if let Some(source) = lookup(ENV_SCALER_SOURCE) {
            let mut source: ScalerSource = source.parse()?;
            if let (ScalerSource::SyntheticFit { seed }, Some(raw)) =
                (&mut source, lookup(ENV_SCALER_SEED))
            {
                *seed = raw.trim().parse().map_err(|_| {
                    PricingError::invalid_parameter(
                        ENV_SCALER_SEED,
                        format!("'{}' is not an unsigned integer", raw),
                    )
                })?;
            }
            builder = builder.scaler_source(source);
        }
        builder.build()
    }

    /// Registry that loads this configuration's artifact on first use.
    pub fn registry(&self) -> ArtifactRegistry {
        ArtifactRegistry::new(&self.model_path, self.scaler_source)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH, ScalerSource::Persisted)
    }
}

/// Builder for PredictorConfig.
#[derive(Debug, Default)]
pub struct PredictorConfigBuilder {
    model_path: Option<PathBuf>,
    scaler_source: Option<ScalerSource>,
    horizon_days: Option<usize>,
}

impl PredictorConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the artifact path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Set the scaler source.
    pub fn scaler_source(mut self, source: ScalerSource) -> Self {
        self.scaler_source = Some(source);
        self
    }

    /// Set the number of surfaced days.
    pub fn horizon_days(mut self, days: usize) -> Self {
        self.horizon_days = Some(days);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<PredictorConfig> {
        let horizon_days = self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS);
        // Row i is dated start + i + 1, so the last row needs window day horizon
        if horizon_days == 0 || horizon_days >= WINDOW_DAYS {
            return Err(PricingError::invalid_parameter(
                "horizon_days",
                format!("must be between 1 and {}", WINDOW_DAYS - 1),
            ));
        }
        Ok(PredictorConfig {
            model_path: self
                .model_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            scaler_source: self.scaler_source.unwrap_or_default(),
            horizon_days,
        })
    }
}
