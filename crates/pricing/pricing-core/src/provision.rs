//! Scaler provisioning
//!
//! Supplies the feature and target scalers used around inference. The
//! default restores the exact parameters persisted with the model. The
//! synthetic mode refits both scalers on uniform random noise; it exists
//! only to reproduce the legacy deployment and yields scalers unrelated to
//! the training distribution.

use crate::scaler::{MinMaxScaler, ScalerParams};
use ndarray::Array2;
use pricing_spi::{FeatureScaler, PricingError, Result, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Rows of noise used by the synthetic fit
pub const SYNTHETIC_SAMPLES: usize = 100;

/// Where scaler parameters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScalerSource {
    /// Parameters stored in the model artifact
    Persisted,
    /// Fit on seeded uniform noise in `[0, 1)`
    SyntheticFit { seed: u64 },
}

impl Default for ScalerSource {
    fn default() -> Self {
        ScalerSource::Persisted
    }
}

impl fmt::Display for ScalerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalerSource::Persisted => f.write_str("persisted"),
            ScalerSource::SyntheticFit { seed } => write!(f, "synthetic(seed={})", seed),
        }
    }
}

impl FromStr for ScalerSource {
    type Err = PricingError;

    /// Accepts `artifact`/`persisted` and `synthetic` (seed 0).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artifact" | "persisted" => Ok(ScalerSource::Persisted),
            "synthetic" => Ok(ScalerSource::SyntheticFit { seed: 0 }),
            other => Err(PricingError::invalid_parameter(
                "scaler_source",
                format!("unknown source '{}', expected 'artifact' or 'synthetic'", other),
            )),
        }
    }
}

/// Persisted parameters of both scalers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerPairParams {
    pub features: ScalerParams,
    pub target: ScalerParams,
}

/// Feature scaler over the engineered columns and target scaler over price
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerPair {
    pub features: MinMaxScaler,
    pub target: MinMaxScaler,
}

impl ScalerPair {
    /// Restore both scalers and check their widths
    pub fn from_params(params: &ScalerPairParams) -> Result<Self> {
        let features = MinMaxScaler::from_params(&params.features)?;
        let target = MinMaxScaler::from_params(&params.target)?;
        if features.n_features() != FEATURE_COUNT {
            return Err(PricingError::ArtifactFormat(format!(
                "feature scaler covers {} columns, expected {}",
                features.n_features(),
                FEATURE_COUNT
            )));
        }
        if target.n_features() != 1 {
            return Err(PricingError::ArtifactFormat(format!(
                "target scaler covers {} columns, expected 1",
                target.n_features()
            )));
        }
        Ok(Self { features, target })
    }

    pub fn params(&self) -> ScalerPairParams {
        ScalerPairParams {
            features: self.features.params(),
            target: self.target.params(),
        }
    }

    /// Placeholder scalers fitted on seeded uniform noise
    pub fn synthetic(seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample_features =
            Array2::from_shape_fn((SYNTHETIC_SAMPLES, FEATURE_COUNT), |_| rng.gen::<f64>());
        let sample_target = Array2::from_shape_fn((SYNTHETIC_SAMPLES, 1), |_| rng.gen::<f64>());

        let mut features = MinMaxScaler::new();
        features.fit(&sample_features)?;
        let mut target = MinMaxScaler::new();
        target.fit(&sample_target)?;
        Ok(Self { features, target })
    }
}

/// Produce the scaler pair for `source`.
///
/// `persisted` is the parameter block read from the artifact, if it had one.
pub fn provision(source: ScalerSource, persisted: Option<&ScalerPairParams>) -> Result<ScalerPair> {
    match source {
        ScalerSource::Persisted => {
            let params = persisted.ok_or_else(|| {
                PricingError::ArtifactFormat(
                    "artifact has no persisted scaler parameters; re-export it with its scalers"
                        .to_string(),
                )
            })?;
            debug!("Restoring persisted scaler parameters");
            ScalerPair::from_params(params)
        }
        ScalerSource::SyntheticFit { seed } => {
            warn!(
                seed,
                "Fitting scalers on synthetic uniform noise; predictions will not match the \
                 training distribution"
            );
            ScalerPair::synthetic(seed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn pair_params() -> ScalerPairParams {
        ScalerPairParams {
            features: ScalerParams {
                data_min: vec![1.0, 1.0, 10.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 2015.0],
                data_max: vec![30.0, 365.0, 1000.0, 6.0, 12.0, 3.0, 4.0, 1.0, 31.0, 2030.0],
                feature_range: (0.0, 1.0),
            },
            target: ScalerParams {
                data_min: vec![10.0],
                data_max: vec![1000.0],
                feature_range: (0.0, 1.0),
            },
        }
    }

    #[test]
    fn test_persisted_restores_exact_params() {
        let params = pair_params();
        let pair = provision(ScalerSource::Persisted, Some(&params)).unwrap();
        assert_eq!(pair.params(), params);
    }

    #[test]
    fn test_persisted_requires_params() {
        let result = provision(ScalerSource::Persisted, None);
        assert!(matches!(result, Err(PricingError::ArtifactFormat(_))));
    }

    #[test]
    fn test_persisted_rejects_wrong_width() {
        let mut params = pair_params();
        params.features.data_min.pop();
        params.features.data_max.pop();
        assert!(ScalerPair::from_params(&params).is_err());

        let mut params = pair_params();
        params.target.data_min.push(0.0);
        params.target.data_max.push(1.0);
        assert!(ScalerPair::from_params(&params).is_err());
    }

    #[test]
    fn test_synthetic_is_seeded() {
        let a = ScalerPair::synthetic(7).unwrap();
        let b = ScalerPair::synthetic(7).unwrap();
        let c = ScalerPair::synthetic(8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.features.n_features(), FEATURE_COUNT);
        assert_eq!(a.target.n_features(), 1);
    }

    #[test]
    fn test_synthetic_ignores_persisted_params() {
        let params = pair_params();
        let pair = provision(ScalerSource::SyntheticFit { seed: 1 }, Some(&params)).unwrap();
        assert_ne!(pair.params(), params);
        assert!(pair.features.params().data_max.iter().all(|&v| v < 1.0));
    }

    #[test]
    fn test_synthetic_fit_flags_realistic_features() {
        // One engineered row: 2024-01-01, price 100, 1-7 nights
        let row = array![[1.0, 7.0, 100.0, 0.0, 1.0, 3.0, 1.0, 1.0, 1.0, 2024.0]];
        let synthetic = ScalerPair::synthetic(0).unwrap();
        let flagged = synthetic.features.out_of_range_columns(&row);
        assert!(flagged.contains(&2), "price lag should be out of range");
        assert!(flagged.contains(&9), "year should be out of range");

        let persisted = ScalerPair::from_params(&pair_params()).unwrap();
        assert!(persisted.features.out_of_range_columns(&row).is_empty());
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("artifact".parse::<ScalerSource>().unwrap(), ScalerSource::Persisted);
        assert_eq!(" Persisted ".parse::<ScalerSource>().unwrap(), ScalerSource::Persisted);
        assert_eq!(
            "synthetic".parse::<ScalerSource>().unwrap(),
            ScalerSource::SyntheticFit { seed: 0 }
        );
        assert!("random".parse::<ScalerSource>().is_err());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ScalerSource::Persisted.to_string(), "persisted");
        assert_eq!(
            ScalerSource::SyntheticFit { seed: 3 }.to_string(),
            "synthetic(seed=3)"
        );
    }
}
