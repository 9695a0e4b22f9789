//! Delaycast Service
//!
//! Stateless operations over the record store:
//! - [`ModelRepository`]: load, encode and persist models; resolve the current one
//! - [`PredictionService`]: run the current model and record inferences
//! - [`HistoryService`]: list stored models and inferences

pub mod history;
pub mod prediction;
pub mod repository;
pub mod source;
pub mod telemetry;

pub use history::HistoryService;
pub use prediction::PredictionService;
pub use repository::{ModelRepository, ModelSelection};
pub use source::{FsModelSource, MemoryModelSource, ModelSource};

use delaycast_core::{InferenceRecord, InputData, RecordStore, Result};
use std::sync::Arc;

/// All services wired to one shared store
pub struct Services {
    pub repository: ModelRepository,
    pub predictions: PredictionService,
    pub history: HistoryService,
}

impl Services {
    /// Wire every service to `store`
    pub fn new(store: Arc<RecordStore>, selection: ModelSelection) -> Self {
        Self {
            repository: ModelRepository::new(store.clone(), selection),
            predictions: PredictionService::new(store.clone()),
            history: HistoryService::new(store),
        }
    }

    /// Replace the repository's model source
    pub fn with_source(mut self, source: Arc<dyn ModelSource>) -> Self {
        self.repository = self.repository.with_source(source);
        self
    }

    /// Predict with whichever model is current
    pub fn predict_current(&self, input: &InputData) -> Result<InferenceRecord> {
        let (model, model_id) = self.repository.current_model()?;
        self.predictions.predict(input, &model, &model_id)
    }
}
