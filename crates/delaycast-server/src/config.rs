//! Server configuration

use crate::cli::Cli;
use delaycast_core::{Error, InputSchema, Result};
use delaycast_service::ModelSelection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Input schema accepted by the prediction endpoint
    #[serde(default)]
    pub schema: InputSchema,

    /// Which stored model serves predictions
    #[serde(default)]
    pub model_selection: ModelSelection,

    /// Model loaded before the server starts accepting requests
    #[serde(default)]
    pub preload_model: Option<String>,

    /// Directory relative model paths are resolved against
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Include encoded payloads in /model/list unless the query says otherwise
    #[serde(default)]
    pub list_payloads: bool,

    /// Install the Prometheus recorder and serve /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl ServiceConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| Error::config(format!("failed to read {}: {}", config_path, e)))?;
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("invalid {}: {}", config_path, e)))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            config.port = port;
        }
        if let Some(schema) = cli.schema {
            config.schema = schema;
        }
        if let Some(selection) = cli.model_selection {
            config.model_selection = selection;
        }
        if let Some(model) = &cli.model {
            config.preload_model = Some(model.clone());
        }

        Ok(config)
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            schema: InputSchema::default(),
            model_selection: ModelSelection::default(),
            preload_model: None,
            model_dir: None,
            list_payloads: false,
            metrics_enabled: true,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn missing_file_uses_defaults() {
        let cli = Cli::parse_from(["delaycast"]);
        let config = ServiceConfig::load("/nonexistent/delaycast.yaml", &cli).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.schema, InputSchema::Flight);
        assert_eq!(config.model_selection, ModelSelection::Latest);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn file_values_then_cli_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port: 9000\nschema: fleet\nmodel_selection: first\nlist_payloads: true"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["delaycast"]);
        let config = ServiceConfig::load(path, &cli).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.schema, InputSchema::Fleet);
        assert_eq!(config.model_selection, ModelSelection::First);
        assert!(config.list_payloads);

        let cli = Cli::parse_from([
            "delaycast",
            "--port",
            "7070",
            "--schema",
            "flight",
            "--model",
            "artifacts/flight_delay_model.json",
        ]);
        let config = ServiceConfig::load(path, &cli).unwrap();
        assert_eq!(config.port, 7070);
        assert_eq!(config.schema, InputSchema::Flight);
        assert_eq!(
            config.preload_model.as_deref(),
            Some("artifacts/flight_delay_model.json")
        );
    }

    #[test]
    fn example_config_resolves_bundled_models() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let example = root.join("delaycast.example.yaml");
        let cli = Cli::parse_from(["delaycast"]);
        let config = ServiceConfig::load(example.to_str().unwrap(), &cli).unwrap();

        let model_dir = config.model_dir.expect("example sets model_dir");
        assert!(root.join(model_dir).join("flight_delay_model.json").is_file());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "schema: cargo").unwrap();
        let cli = Cli::parse_from(["delaycast"]);
        let err = ServiceConfig::load(file.path().to_str().unwrap(), &cli).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("cargo"));
    }
}
