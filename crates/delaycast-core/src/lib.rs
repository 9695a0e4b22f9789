//! Delaycast Core
//!
//! Core types, errors, and storage shared across Delaycast components.
//!
//! This crate provides:
//! - The error taxonomy used by every service call
//! - Flight input schemas, prediction labels and inference records
//! - The in-memory record store holding the `models` and `inferences` collections

pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use store::{Collection, Document, RecordId, RecordStore};
pub use types::{
    FleetFeatures, FlightFeatures, Inference, InferenceRecord, InputData, InputSchema,
    ModelPayload, ModelSummary, PredictionLabel, StoredModel,
};
