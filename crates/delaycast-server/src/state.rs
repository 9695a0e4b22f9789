//! Shared application state

use crate::config::ServiceConfig;
use delaycast_core::RecordStore;
use delaycast_service::{FsModelSource, Services};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// Store holding models and inferences
    pub store: Arc<RecordStore>,

    /// Repository, prediction and history services
    pub services: Arc<Services>,

    /// Prometheus metrics handle for rendering, absent when metrics are disabled
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire services to `store` according to `config`
    pub fn new(
        config: ServiceConfig,
        store: Arc<RecordStore>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        let source = match &config.model_dir {
            Some(dir) => FsModelSource::with_base_dir(dir.clone()),
            None => FsModelSource::new(),
        };
        let services = Services::new(store.clone(), config.model_selection)
            .with_source(Arc::new(source));

        info!(
            "Services ready (schema: {}, model selection: {})",
            config.schema, config.model_selection
        );

        Self {
            config: Arc::new(config),
            store,
            services: Arc::new(services),
            metrics_handle,
        }
    }

    /// Load the configured startup model, if any
    pub async fn preload(&self) -> delaycast_core::Result<()> {
        if let Some(path) = &self.config.preload_model {
            info!("Preloading model from {}", path);
            self.services.repository.load_model(path).await?;
        }
        Ok(())
    }
}
