//! Listing of stored models and inference history

use delaycast_core::{InferenceRecord, ModelSummary, RecordStore};
use std::sync::Arc;

/// Read-only views over the record store
pub struct HistoryService {
    store: Arc<RecordStore>,
}

impl HistoryService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Every stored model, in load order; payloads only when asked for
    pub fn list_models(&self, include_payload: bool) -> Vec<ModelSummary> {
        self.store
            .models()
            .find_all()
            .iter()
            .map(|m| ModelSummary::from_stored(m, include_payload))
            .collect()
    }

    /// Every recorded inference, in insertion order
    pub fn list_inferences(&self) -> Vec<InferenceRecord> {
        self.store.inferences().find_all()
    }
}
