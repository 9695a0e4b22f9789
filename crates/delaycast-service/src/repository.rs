//! Model repository
//!
//! Loads model bytes from a [`ModelSource`], stores them encoded in the
//! `models` collection and resolves the current model through an explicit
//! pointer rather than the store's iteration order.

use crate::source::{FsModelSource, ModelSource};
use crate::telemetry;
use delaycast_core::{Error, ModelPayload, RecordId, RecordStore, Result};
use delaycast_model::{codec, LoadedModel, Predictor};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which stored model is considered current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSelection {
    /// Every successful load becomes current
    #[default]
    Latest,
    /// The first successful load stays current
    First,
}

impl fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::First => f.write_str("first"),
        }
    }
}

impl FromStr for ModelSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "first" => Ok(Self::First),
            other => Err(format!("unknown model selection '{}' (expected latest or first)", other)),
        }
    }
}

/// Persists models into the record store and hands back the current one
pub struct ModelRepository {
    store: Arc<RecordStore>,
    source: Arc<dyn ModelSource>,
    selection: ModelSelection,
    current: Mutex<Option<RecordId>>,
}

impl ModelRepository {
    /// Create a repository reading models from the filesystem
    pub fn new(store: Arc<RecordStore>, selection: ModelSelection) -> Self {
        Self {
            store,
            source: Arc::new(FsModelSource::new()),
            selection,
            current: Mutex::new(None),
        }
    }

    /// Replace the model source
    pub fn with_source(mut self, source: Arc<dyn ModelSource>) -> Self {
        self.source = source;
        self
    }

    /// Identifier of the current model, if any
    pub fn current_model_id(&self) -> Option<RecordId> {
        self.current.lock().clone()
    }

    /// Read, validate, encode and store the model at `location`
    pub async fn load_model(&self, location: &str) -> Result<RecordId> {
        match self.store_model(location).await {
            Ok(id) => {
                telemetry::record_model_loaded();
                Ok(id)
            }
            Err(e) => {
                warn!("Failed to load model from {}: {}", location, e);
                telemetry::record_model_load_failure(&e);
                Err(e)
            }
        }
    }

    async fn store_model(&self, location: &str) -> Result<RecordId> {
        let bytes = self.source.read(location).await?;
        debug!("Read {} bytes from {}", bytes.len(), location);

        let model = codec::decode_artifact(&bytes)?;
        let encoded = codec::encode_artifact(model.artifact())?;

        let payload = ModelPayload {
            name: model.name().to_string(),
            version: model.version().to_string(),
            source: location.to_string(),
            checksum: encoded.checksum,
            payload: encoded.payload,
        };

        // Insert and pointer update happen under one lock so readers never
        // observe a pointer to a record that is not yet stored.
        let mut current = self.current.lock();
        let id = self.store.models().insert(payload);
        let promoted = match self.selection {
            ModelSelection::Latest => true,
            ModelSelection::First => current.is_none(),
        };
        if promoted {
            *current = Some(id.clone());
        }

        info!(
            "Stored {} model {} v{} from {} as {} (current: {})",
            model.artifact().estimator.kind(),
            model.name(),
            model.version(),
            location,
            id,
            promoted
        );
        Ok(id)
    }

    /// Decode the current model
    pub fn current_model(&self) -> Result<(LoadedModel, RecordId)> {
        let id = self
            .current_model_id()
            .ok_or_else(|| Error::not_found("no model has been loaded"))?;

        let stored = self
            .store
            .models()
            .find_by_id(&id)
            .ok_or_else(|| Error::not_found(format!("model {} is no longer stored", id)))?;

        let model = codec::decode_payload(&stored.body.payload, &stored.body.checksum)?;
        Ok((model, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryModelSource;

    const STUMP: &str = r#"{
        "name": "stump", "version": "2.1.0",
        "features": [{"column": "dep_delay", "kind": "numeric"}],
        "estimator": {"type": "decision_tree", "nodes": [
            {"feature": 0, "threshold": 15.0, "left": 1, "right": 2},
            {"class": 0}, {"class": 1}
        ]}
    }"#;

    fn repository(selection: ModelSelection) -> (Arc<RecordStore>, ModelRepository) {
        let source = MemoryModelSource::new();
        source.insert("a.json", STUMP.replace("stump", "alpha"));
        source.insert("b.json", STUMP.replace("stump", "beta"));
        source.insert("broken.json", "not a model");

        let store = RecordStore::shared();
        let repo = ModelRepository::new(store.clone(), selection).with_source(Arc::new(source));
        (store, repo)
    }

    #[tokio::test]
    async fn load_then_get_current() {
        let (store, repo) = repository(ModelSelection::Latest);
        let id = repo.load_model("a.json").await.unwrap();

        let (model, current) = repo.current_model().unwrap();
        assert_eq!(current, id);
        assert_eq!(model.name(), "alpha");
        assert_eq!(model.version(), "2.1.0");

        let stored = store.models().find_first().unwrap();
        assert_eq!(stored.body.source, "a.json");
        assert_eq!(stored.body.name, "alpha");
    }

    #[tokio::test]
    async fn nothing_loaded_is_not_found() {
        let (_, repo) = repository(ModelSelection::Latest);
        assert!(matches!(repo.current_model(), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn failed_loads_leave_store_untouched() {
        let (store, repo) = repository(ModelSelection::Latest);
        assert!(matches!(repo.load_model("missing.json").await, Err(Error::Io(_))));
        assert!(matches!(repo.load_model("broken.json").await, Err(Error::Decode(_))));
        assert!(store.models().is_empty());
        assert!(repo.current_model_id().is_none());
    }

    #[tokio::test]
    async fn latest_selection_follows_newest_load() {
        let (_, repo) = repository(ModelSelection::Latest);
        repo.load_model("a.json").await.unwrap();
        let second = repo.load_model("b.json").await.unwrap();

        let (model, id) = repo.current_model().unwrap();
        assert_eq!(id, second);
        assert_eq!(model.name(), "beta");
    }

    #[tokio::test]
    async fn first_selection_keeps_first_load() {
        let (store, repo) = repository(ModelSelection::First);
        let first = repo.load_model("a.json").await.unwrap();
        repo.load_model("b.json").await.unwrap();

        assert_eq!(store.models().len(), 2);
        let (model, id) = repo.current_model().unwrap();
        assert_eq!(id, first);
        assert_eq!(model.name(), "alpha");
    }

    #[tokio::test]
    async fn reset_store_invalidates_pointer() {
        let (store, repo) = repository(ModelSelection::Latest);
        repo.load_model("a.json").await.unwrap();
        store.reset();
        assert!(matches!(repo.current_model(), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn tampered_checksum_is_a_decode_error() {
        let (store, repo) = repository(ModelSelection::Latest);
        repo.load_model("a.json").await.unwrap();

        let mut stored = store.models().find_first().unwrap();
        stored.body.checksum = "0".repeat(64);
        store.reset();
        let id = store.models().insert(stored.body);
        *repo.current.lock() = Some(id);

        assert!(matches!(repo.current_model(), Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn corrupted_payload_is_a_decode_error() {
        let (store, repo) = repository(ModelSelection::Latest);
        repo.load_model("a.json").await.unwrap();

        let mut stored = store.models().find_first().unwrap();
        stored.body.payload.insert(0, '!');
        store.reset();
        let id = store.models().insert(stored.body);
        *repo.current.lock() = Some(id);

        assert!(matches!(repo.current_model(), Err(Error::Decode(_))));
    }

    #[test]
    fn selection_from_str() {
        assert_eq!("LATEST".parse::<ModelSelection>(), Ok(ModelSelection::Latest));
        assert_eq!("first".parse::<ModelSelection>(), Ok(ModelSelection::First));
        assert!("newest".parse::<ModelSelection>().is_err());
    }
}
