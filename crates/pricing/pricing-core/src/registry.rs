//! Process-wide predictor cache
//!
//! Loads the artifact and provisions scalers at most once, then hands out
//! shared read-only handles.

use crate::predictor::PricePredictor;
use crate::provision::ScalerSource;
use once_cell::sync::OnceCell;
use pricing_spi::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Lazily loaded, shared [`PricePredictor`].
///
/// The first successful [`ArtifactRegistry::get`] loads the artifact;
/// every later call returns the same instance. A failed load leaves the
/// registry empty so the error is reported again on the next call.
#[derive(Debug)]
pub struct ArtifactRegistry {
    path: PathBuf,
    scaler_source: ScalerSource,
    predictor: OnceCell<Arc<PricePredictor>>,
}

impl ArtifactRegistry {
    pub fn new(path: impl Into<PathBuf>, scaler_source: ScalerSource) -> Self {
        Self {
            path: path.into(),
            scaler_source,
            predictor: OnceCell::new(),
        }
    }

    /// Registry whose predictor is already built
    pub fn preloaded(predictor: PricePredictor) -> Self {
        let path = predictor.metadata().path.clone().unwrap_or_default();
        let scaler_source = predictor.scaler_source();
        Self {
            path,
            scaler_source,
            predictor: OnceCell::with_value(Arc::new(predictor)),
        }
    }

    /// Shared predictor, loading it on first use
    pub fn get(&self) -> Result<Arc<PricePredictor>> {
        self.predictor
            .get_or_try_init(|| {
                let predictor = PricePredictor::load(&self.path, self.scaler_source)?;
                info!(
                    model = %predictor.metadata().name,
                    scaler_source = %self.scaler_source,
                    "Model ready"
                );
                Ok(Arc::new(predictor))
            })
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.get().is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scaler_source(&self) -> ScalerSource {
        self.scaler_source
    }
}
