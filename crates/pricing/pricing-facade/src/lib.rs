//! Pricing Facade
//!
//! High-level API for nightly price forecasting. Re-exports all public
//! types from the pricing stack for convenient usage.

// Re-export everything from API (which includes SPI and core)
pub use pricing_api::*;

// Explicit re-exports for documentation
pub use pricing_api::prelude;

// Re-export core modules for direct access
pub use pricing_core::{artifact, calendar, lstm, predictor, provision, registry, scaler};

// Re-export SPI traits
pub use pricing_spi::{FeatureScaler, PricingError, SequenceModel};
