//! Error module containing error types and result aliases

mod pricing_error;

pub use pricing_error::PricingError;

/// Result type for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;
