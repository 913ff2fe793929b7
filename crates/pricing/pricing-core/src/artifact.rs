//! Model artifact format and loading
//!
//! An artifact is a single JSON document holding the network weights, the
//! feature column names in training order, and the fitted scaler
//! parameters. Loading validates all three before anything is served.

use crate::calendar::WINDOW_DAYS;
use crate::lstm::{Activation, DenseLayer, Layer, LstmLayer, LstmNetwork};
use crate::provision::{ScalerPair, ScalerPairParams};
use crate::scaler::ScalerParams;
use ndarray::{Array1, Array2};
use pricing_spi::{FeatureColumn, PricingError, Result, SequenceModel, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Artifact format understood by this crate
pub const FORMAT_VERSION: u32 = 1;

/// Where the model artifact lives relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "model/lstm_model.json";

/// Serialized layer weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Lstm {
        kernel: Vec<Vec<f64>>,
        recurrent_kernel: Vec<Vec<f64>>,
        bias: Vec<f64>,
        #[serde(default)]
        return_sequences: bool,
    },
    Dense {
        kernel: Vec<Vec<f64>>,
        bias: Vec<f64>,
        #[serde(default)]
        activation: Activation,
    },
}

impl LayerSpec {
    fn build(&self, index: usize) -> Result<Layer> {
        let context = |e: PricingError| {
            PricingError::ArtifactFormat(format!("layer {}: {}", index, e))
        };
        match self {
            LayerSpec::Lstm {
                kernel,
                recurrent_kernel,
                bias,
                return_sequences,
            } => LstmLayer::new(
                to_matrix(kernel, "kernel").map_err(context)?,
                to_matrix(recurrent_kernel, "recurrent_kernel").map_err(context)?,
                Array1::from(bias.clone()),
                *return_sequences,
            )
            .map(Layer::Lstm)
            .map_err(context),
            LayerSpec::Dense {
                kernel,
                bias,
                activation,
            } => DenseLayer::new(
                to_matrix(kernel, "kernel").map_err(context)?,
                Array1::from(bias.clone()),
                *activation,
            )
            .map(Layer::Dense)
            .map_err(context),
        }
    }

    fn from_layer(layer: &Layer) -> Self {
        match layer {
            Layer::Lstm(l) => LayerSpec::Lstm {
                kernel: to_rows(l.kernel()),
                recurrent_kernel: to_rows(l.recurrent_kernel()),
                bias: l.bias().to_vec(),
                return_sequences: l.return_sequences(),
            },
            Layer::Dense(d) => LayerSpec::Dense {
                kernel: to_rows(d.kernel()),
                bias: d.bias().to_vec(),
                activation: d.activation(),
            },
        }
    }
}

fn to_matrix(rows: &[Vec<f64>], what: &str) -> Result<Array2<f64>> {
    let ncols = rows.first().map(Vec::len).unwrap_or(0);
    if let Some(bad) = rows.iter().position(|r| r.len() != ncols) {
        return Err(PricingError::invalid_parameter(
            what,
            format!("row {} has {} values, expected {}", bad, rows[bad].len(), ncols),
        ));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), ncols), flat)
        .map_err(|e| PricingError::invalid_parameter(what, e.to_string()))
}

fn to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

/// On-disk model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    /// Days per input window
    pub window: usize,
    /// Feature column names in training order
    pub feature_columns: Vec<String>,
    pub layers: Vec<LayerSpec>,
    /// Fitted scaler parameters from training
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalers: Option<ScalerPairParams>,
}

/// Summary of a loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub format_version: u32,
    pub window: usize,
    pub feature_columns: Vec<String>,
    pub layer_count: usize,
    pub output_len: usize,
    pub has_persisted_scalers: bool,
    pub path: Option<PathBuf>,
}

/// A validated artifact ready for inference
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub network: LstmNetwork,
    pub scalers: Option<ScalerPairParams>,
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Parse an artifact without validating it
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PricingError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let artifact = serde_json::from_str(&text).map_err(|e| {
            PricingError::ArtifactFormat(format!("{}: {}", path.display(), e))
        })?;
        Ok(artifact)
    }

    /// Write the artifact as pretty JSON, creating parent directories
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("Wrote model artifact to {:?}", path);
        Ok(())
    }

    /// Check the recorded feature layout against the engineered one
    pub fn validate_columns(&self) -> Result<()> {
        let expected = FeatureColumn::names();
        if self.feature_columns != expected {
            return Err(PricingError::ColumnMismatch {
                expected,
                actual: self.feature_columns.clone(),
            });
        }
        Ok(())
    }

    /// Validate the artifact and build its network
    pub fn into_loaded(self, path: Option<&Path>) -> Result<LoadedArtifact> {
        if self.format_version != FORMAT_VERSION {
            return Err(PricingError::ArtifactFormat(format!(
                "unsupported format version {}, expected {}",
                self.format_version, FORMAT_VERSION
            )));
        }
        self.validate_columns()?;
        if self.window != WINDOW_DAYS {
            return Err(PricingError::ArtifactFormat(format!(
                "window of {} days, expected {}",
                self.window, WINDOW_DAYS
            )));
        }

        let layers = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.build(i))
            .collect::<Result<Vec<_>>>()?;
        let network = LstmNetwork::new(&self.name, self.window, FEATURE_COUNT, layers)?;
        if network.output_len() != self.window {
            return Err(PricingError::ArtifactFormat(format!(
                "network produces {} outputs per window, expected {}",
                network.output_len(),
                self.window
            )));
        }
        if let Some(params) = &self.scalers {
            // Fail at load time rather than on the first request
            ScalerPair::from_params(params)?;
        }

        let metadata = ArtifactMetadata {
            name: self.name,
            format_version: self.format_version,
            window: self.window,
            feature_columns: self.feature_columns,
            layer_count: network.layers().len(),
            output_len: network.output_len(),
            has_persisted_scalers: self.scalers.is_some(),
            path: path.map(Path::to_path_buf),
        };
        Ok(LoadedArtifact {
            network,
            scalers: self.scalers,
            metadata,
        })
    }

    /// Export a network and its scalers
    pub fn from_network(network: &LstmNetwork, scalers: Option<&ScalerPair>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            name: network.name().to_string(),
            window: network.input_shape().0,
            feature_columns: FeatureColumn::names(),
            layers: network.layers().iter().map(LayerSpec::from_layer).collect(),
            scalers: scalers.map(ScalerPair::params),
        }
    }

    /// Untrained demo artifact with seeded random weights.
    ///
    /// Lets the whole stack run without a trained model. The scalers use
    /// [`DEMO_FEATURE_MIN`]/[`DEMO_FEATURE_MAX`] and [`DEMO_PRICE_RANGE`];
    /// predictions are meaningless.
    pub fn demo(seed: u64, units: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut matrix = |rows: usize, cols: usize| -> Vec<Vec<f64>> {
            (0..rows)
                .map(|_| (0..cols).map(|_| rng.gen_range(-0.2..0.2)).collect())
                .collect()
        };
        let kernel = matrix(FEATURE_COUNT, 4 * units);
        let recurrent_kernel = matrix(units, 4 * units);
        let dense = matrix(units, 1);

        // Forget gate bias of 1, as Keras initializes it
        let mut bias = vec![0.0; 4 * units];
        bias[units..2 * units].iter_mut().for_each(|b| *b = 1.0);

        Self {
            format_version: FORMAT_VERSION,
            name: format!("demo-lstm-{}", seed),
            window: WINDOW_DAYS,
            feature_columns: FeatureColumn::names(),
            layers: vec![
                LayerSpec::Lstm {
                    kernel,
                    recurrent_kernel,
                    bias,
                    return_sequences: true,
                },
                LayerSpec::Dense {
                    kernel: dense,
                    bias: vec![0.5],
                    activation: Activation::Linear,
                },
            ],
            scalers: Some(ScalerPairParams {
                features: ScalerParams {
                    data_min: DEMO_FEATURE_MIN.to_vec(),
                    data_max: DEMO_FEATURE_MAX.to_vec(),
                    feature_range: (0.0, 1.0),
                },
                target: ScalerParams {
                    data_min: vec![DEMO_PRICE_RANGE.0],
                    data_max: vec![DEMO_PRICE_RANGE.1],
                    feature_range: (0.0, 1.0),
                },
            }),
        }
    }
}

/// Lower feature bounds of the demo artifact, in training column order
pub const DEMO_FEATURE_MIN: [f64; FEATURE_COUNT] =
    [1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 2015.0];

/// Upper feature bounds of the demo artifact, in training column order
pub const DEMO_FEATURE_MAX: [f64; FEATURE_COUNT] =
    [365.0, 1125.0, 1000.0, 6.0, 12.0, 3.0, 4.0, 1.0, 31.0, 2035.0];

/// Nightly price range of the demo target scaler
pub const DEMO_PRICE_RANGE: (f64, f64) = (10.0, 1000.0);

/// Read and validate the artifact at `path`.
///
/// Fails with [`PricingError::ArtifactNotFound`] when the file is missing
/// and with a format or column error when it cannot be served.
pub fn load(path: impl AsRef<Path>) -> Result<LoadedArtifact> {
    let path = path.as_ref();
    info!("Loading model artifact from {:?}", path);
    let loaded = ModelArtifact::read(path)?.into_loaded(Some(path))?;
    debug!(
        layers = loaded.metadata.layer_count,
        window = loaded.metadata.window,
        persisted_scalers = loaded.metadata.has_persisted_scalers,
        "Model artifact validated"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use std::io::Write;

    #[test]
    fn test_demo_artifact_loads() {
        let loaded = ModelArtifact::demo(1, 4).into_loaded(None).unwrap();
        assert_eq!(loaded.metadata.window, WINDOW_DAYS);
        assert_eq!(loaded.metadata.output_len, WINDOW_DAYS);
        assert_eq!(loaded.metadata.layer_count, 2);
        assert!(loaded.metadata.has_persisted_scalers);

        let out = loaded
            .network
            .predict(&Array3::zeros((1, WINDOW_DAYS, FEATURE_COUNT)))
            .unwrap();
        assert_eq!(out.dim(), (1, WINDOW_DAYS));
    }

    #[test]
    fn test_demo_is_seeded() {
        assert_eq!(ModelArtifact::demo(3, 2), ModelArtifact::demo(3, 2));
        assert_ne!(ModelArtifact::demo(3, 2), ModelArtifact::demo(4, 2));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        let artifact = ModelArtifact::demo(9, 3);
        artifact.write(&path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.metadata.path.as_deref(), Some(path.as_path()));
        assert_eq!(ModelArtifact::read(&path).unwrap(), artifact);
    }

    #[test]
    fn test_export_matches_network() {
        let loaded = ModelArtifact::demo(5, 2).into_loaded(None).unwrap();
        let exported = ModelArtifact::from_network(&loaded.network, None);
        let reloaded = exported.into_loaded(None).unwrap();
        assert_eq!(reloaded.network, loaded.network);
        assert!(!reloaded.metadata.has_persisted_scalers);
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        match load(&missing) {
            Err(PricingError::ArtifactNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_file_fails_fast() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"format_version\": 1, \"layers\": ").unwrap();
        assert!(matches!(load(file.path()), Err(PricingError::ArtifactFormat(_))));
    }

    #[test]
    fn test_reordered_columns_are_rejected() {
        let mut artifact = ModelArtifact::demo(1, 2);
        artifact.feature_columns.swap(0, 1);
        assert!(matches!(
            artifact.into_loaded(None),
            Err(PricingError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let mut artifact = ModelArtifact::demo(1, 2);
        artifact.format_version = 2;
        assert!(matches!(
            artifact.into_loaded(None),
            Err(PricingError::ArtifactFormat(_))
        ));
    }

    #[test]
    fn test_wrong_window_is_rejected() {
        let mut artifact = ModelArtifact::demo(1, 2);
        artifact.window = 7;
        assert!(artifact.into_loaded(None).is_err());
    }

    #[test]
    fn test_output_length_must_match_window() {
        let mut artifact = ModelArtifact::demo(1, 2);
        if let LayerSpec::Lstm {
            return_sequences, ..
        } = &mut artifact.layers[0]
        {
            *return_sequences = false;
        }
        // Collapsed LSTM followed by Dense(1) yields a single output
        assert!(matches!(
            artifact.into_loaded(None),
            Err(PricingError::ArtifactFormat(_))
        ));
    }

    #[test]
    fn test_ragged_kernel_is_rejected() {
        let mut artifact = ModelArtifact::demo(1, 2);
        if let LayerSpec::Lstm { kernel, .. } = &mut artifact.layers[0] {
            kernel[3].pop();
        }
        assert!(artifact.into_loaded(None).is_err());
    }

    #[test]
    fn test_invalid_scalers_are_rejected_at_load() {
        let mut artifact = ModelArtifact::demo(1, 2);
        if let Some(scalers) = artifact.scalers.as_mut() {
            scalers.features.data_min.pop();
            scalers.features.data_max.pop();
        }
        assert!(artifact.into_loaded(None).is_err());
    }

    #[test]
    fn test_layer_json_layout() {
        let json = r#"{"type":"dense","kernel":[[1.0],[2.0]],"bias":[0.0]}"#;
        let spec: LayerSpec = serde_json::from_str(json).unwrap();
        match spec {
            LayerSpec::Dense { activation, .. } => assert_eq!(activation, Activation::Linear),
            _ => panic!("Expected dense layer"),
        }
    }
}
