//! Text-safe encoding of model artifacts
//!
//! Raw model bytes are parsed and validated once, re-serialized to a
//! canonical JSON form, then stored as base64 text alongside a SHA-256
//! digest of the canonical bytes. Decoding reverses the steps and refuses
//! payloads whose digest no longer matches.

use crate::artifact::ModelArtifact;
use crate::predictor::LoadedModel;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use delaycast_core::{Error, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// An artifact ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedModel {
    /// Base64 of the canonical artifact bytes
    pub payload: String,

    /// SHA-256 hex digest of the canonical artifact bytes
    pub checksum: String,
}

/// Parse raw model bytes into a validated model
pub fn decode_artifact(bytes: &[u8]) -> Result<LoadedModel> {
    let artifact: ModelArtifact = serde_json::from_slice(bytes)
        .map_err(|e| Error::decode(format!("not a valid model artifact: {}", e)))?;
    LoadedModel::new(artifact)
}

/// Encode an artifact for storage
pub fn encode_artifact(artifact: &ModelArtifact) -> Result<EncodedModel> {
    let bytes = serde_json::to_vec(artifact)
        .map_err(|e| Error::internal(format!("failed to serialize model: {}", e)))?;

    let checksum = digest(&bytes);
    debug!(model = %artifact.name, bytes = bytes.len(), checksum = %checksum, "model encoded");

    Ok(EncodedModel {
        payload: STANDARD.encode(&bytes),
        checksum,
    })
}

/// Decode a stored payload, verifying its checksum
pub fn decode_payload(payload: &str, checksum: &str) -> Result<LoadedModel> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::decode(format!("payload is not valid base64: {}", e)))?;

    let actual = digest(&bytes);
    if actual != checksum {
        return Err(Error::decode(format!(
            "payload checksum mismatch (expected {}, got {})",
            checksum, actual
        )));
    }

    decode_artifact(&bytes)
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
