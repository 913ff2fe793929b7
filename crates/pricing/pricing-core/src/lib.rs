//! Pricing Core
//!
//! Core implementations for nightly price forecasting: calendar feature
//! engineering, min-max scaling, scaler provisioning, LSTM inference, the
//! model artifact format and the shared predictor cache.

pub mod artifact;
pub mod calendar;
pub mod lstm;
pub mod predictor;
pub mod provision;
pub mod registry;
pub mod scaler;

// Re-export SPI traits for implementations
pub use pricing_spi::{
    FeatureColumn, FeatureRow, FeatureScaler, FeatureTable, Forecast, ForecastRequest,
    PricingError, Result, Season, SequenceModel, FEATURE_COUNT,
};

// Re-export main types
pub use artifact::{ArtifactMetadata, LoadedArtifact, ModelArtifact, DEFAULT_MODEL_PATH};
pub use calendar::{FeatureEngineer, HOLIDAYS, WINDOW_DAYS};
pub use lstm::{Activation, DenseLayer, Layer, LstmLayer, LstmNetwork};
pub use predictor::PricePredictor;
pub use provision::{provision, ScalerPair, ScalerPairParams, ScalerSource};
pub use registry::ArtifactRegistry;
pub use scaler::{MinMaxScaler, ScalerParams};
