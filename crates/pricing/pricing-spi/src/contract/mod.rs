//! Contract module containing trait definitions for the prediction pipeline

mod feature_scaler;
mod sequence_model;

pub use feature_scaler::FeatureScaler;
pub use sequence_model::SequenceModel;
