//! Core types for Delaycast

use crate::error::{Error, Result};
use crate::store::{Document, RecordId};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flight features used by the delay classifier
///
/// `dep_delay` is the departure delay in minutes (negative for an early
/// departure), `air_time` the flight duration in minutes and `distance` the
/// route length in miles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightFeatures {
    pub dep_delay: f64,
    pub carrier: String,
    pub origin: String,
    pub dest: String,
    pub air_time: f64,
    #[serde(deserialize_with = "whole_number")]
    pub distance: i64,
}

/// Aircraft/carrier categorical features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetFeatures {
    pub tailnum: String,
    pub carrier: String,
    pub origin: String,
    pub dest: String,
    pub name: String,
    #[serde(deserialize_with = "whole_number")]
    pub distance: i64,
}

/// Accept an integer, or a finite float with no fractional part
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumber;

    impl<'de> de::Visitor<'de> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

/// Prediction input, one variant per supported schema
///
/// Serializes as the bare feature object so inference records echo the
/// request body verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputData {
    Flight(FlightFeatures),
    Fleet(FleetFeatures),
}

impl InputData {
    /// Schema this input was parsed with
    pub fn schema(&self) -> InputSchema {
        match self {
            Self::Flight(_) => InputSchema::Flight,
            Self::Fleet(_) => InputSchema::Fleet,
        }
    }
}

/// The input schema accepted by a deployment
///
/// Only one schema is active at a time; bodies are parsed strictly against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSchema {
    /// Numeric delay/time/distance features plus airline and airport codes
    #[default]
    Flight,
    /// Tail number, carrier name and airport codes
    Fleet,
}

impl InputSchema {
    /// Parse a JSON body against this schema
    pub fn parse(&self, value: serde_json::Value) -> Result<InputData> {
        let parsed = match self {
            Self::Flight => serde_json::from_value(value).map(InputData::Flight),
            Self::Fleet => serde_json::from_value(value).map(InputData::Fleet),
        };
        parsed.map_err(|e| Error::validation(format!("{} input: {}", self, e)))
    }
}

impl fmt::Display for InputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flight => f.write_str("flight"),
            Self::Fleet => f.write_str("fleet"),
        }
    }
}

impl FromStr for InputSchema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flight" => Ok(Self::Flight),
            "fleet" => Ok(Self::Fleet),
            other => Err(format!("unknown input schema '{}' (expected flight or fleet)", other)),
        }
    }
}

/// Two-valued prediction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionLabel {
    /// Class index 1
    #[serde(rename = "atraso")]
    Delayed,
    /// Any other class index
    #[serde(rename = "sem atraso")]
    NotDelayed,
}

impl PredictionLabel {
    /// Map a model class index to a label
    pub fn from_class(class: u32) -> Self {
        if class == 1 {
            Self::Delayed
        } else {
            Self::NotDelayed
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delayed => "atraso",
            Self::NotDelayed => "sem atraso",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an inference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inference {
    /// Model that produced the prediction
    pub model_id: RecordId,

    /// Predicted label
    pub prediction: PredictionLabel,

    /// The request input, echoed verbatim
    pub features: InputData,
}

/// A stored inference
pub type InferenceRecord = Document<Inference>;

/// Body of a stored model record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPayload {
    /// Model name from the artifact header
    pub name: String,

    /// Model version from the artifact header
    pub version: String,

    /// Location the model was loaded from
    pub source: String,

    /// SHA-256 hex digest of the decoded payload
    pub checksum: String,

    /// Base64 encoded canonical artifact
    pub payload: String,
}

/// A stored model
pub type StoredModel = Document<ModelPayload>;

/// Listing view of a stored model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub version: String,
    pub source: String,
    pub checksum: String,

    /// Length of the encoded payload in bytes
    pub payload_size: usize,

    /// Encoded payload, only present when explicitly requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl ModelSummary {
    /// Build a summary from a stored model
    pub fn from_stored(model: &StoredModel, include_payload: bool) -> Self {
        Self {
            id: model.id.clone(),
            created_at: model.created_at,
            name: model.body.name.clone(),
            version: model.body.version.clone(),
            source: model.body.source.clone(),
            checksum: model.body.checksum.clone(),
            payload_size: model.body.payload.len(),
            payload: include_payload.then(|| model.body.payload.clone()),
        }
    }
}
