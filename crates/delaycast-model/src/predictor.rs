//! Predictor trait and the loaded model type

use crate::artifact::ModelArtifact;
use crate::frame::Frame;
use delaycast_core::{Error, Result};
use std::sync::Arc;

/// Capability exposed by every loaded model
pub trait Predictor: Send + Sync {
    /// Predict one class index per frame row
    fn predict(&self, frame: &Frame) -> Result<Vec<u32>>;

    /// Model name
    fn name(&self) -> &str;

    /// Columns the model reads from a frame
    fn input_columns(&self) -> Vec<&str>;
}

/// A validated artifact ready to predict
#[derive(Debug, Clone)]
pub struct LoadedModel {
    artifact: Arc<ModelArtifact>,
}

impl LoadedModel {
    /// Validate an artifact and wrap it
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self {
            artifact: Arc::new(artifact),
        })
    }

    /// The underlying artifact
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Model version
    pub fn version(&self) -> &str {
        &self.artifact.version
    }
}

impl Predictor for LoadedModel {
    fn predict(&self, frame: &Frame) -> Result<Vec<u32>> {
        if frame.is_empty() {
            return Err(Error::validation("cannot predict on an empty frame"));
        }
        let rows = self.artifact.encode(frame)?;
        Ok(rows
            .iter()
            .map(|x| self.artifact.estimator.predict_class(x))
            .collect())
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn input_columns(&self) -> Vec<&str> {
        self.artifact.input_columns()
    }
}
