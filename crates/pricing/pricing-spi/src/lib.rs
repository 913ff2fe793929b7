//! Pricing Service Provider Interface
//!
//! Defines the contracts, error type and data model for nightly price
//! forecasting: engineered feature rows, the scaler and sequence model
//! traits, and the forecast result.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{FeatureScaler, SequenceModel};
pub use error::{PricingError, Result};
pub use model::{
    FeatureColumn, FeatureRow, FeatureTable, Forecast, ForecastRequest, Season, FEATURE_COUNT,
};
