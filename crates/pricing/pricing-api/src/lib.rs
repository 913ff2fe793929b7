//! Pricing Consumer API
//!
//! Consumer configuration and presentation types for nightly price
//! forecasting.
//!
//! This crate provides:
//! - [`PredictorConfig`] and its builder, including environment loading
//! - [`ForecastReport`] for turning a forecast into displayed rows
//! - Re-exports from SPI and core for convenience

pub mod config;
pub mod report;

// Re-export from core
pub use pricing_core::{
    artifact, calendar, lstm, predictor, provision, registry, scaler, ArtifactMetadata,
    ArtifactRegistry, FeatureEngineer, MinMaxScaler, ModelArtifact, PricePredictor, ScalerPair,
    ScalerSource, DEFAULT_MODEL_PATH, WINDOW_DAYS,
};

// Re-export traits and model from SPI
pub use pricing_spi::{
    FeatureColumn, FeatureRow, FeatureScaler, FeatureTable, Forecast, ForecastRequest,
    PricingError, Result, Season, SequenceModel, FEATURE_COUNT,
};

pub use config::{PredictorConfig, PredictorConfigBuilder, DEFAULT_HORIZON_DAYS};
pub use report::{format_date, format_price, weekday_name, ForecastReport, ReportRow};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ForecastReport, PredictorConfig, PredictorConfigBuilder};
    pub use pricing_core::{ArtifactRegistry, FeatureEngineer, PricePredictor, ScalerSource};
    pub use pricing_spi::{
        FeatureScaler, Forecast, ForecastRequest, PricingError, Result, SequenceModel,
    };
}
