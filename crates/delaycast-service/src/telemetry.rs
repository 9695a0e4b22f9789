//! Service metrics
//!
//! Recorded through the `metrics` facade; nothing is emitted until the
//! binary installs a recorder.

use delaycast_core::{Error, PredictionLabel};
use std::time::Duration;

pub const MODELS_LOADED: &str = "delaycast_models_loaded_total";
pub const MODEL_LOAD_FAILURES: &str = "delaycast_model_load_failures_total";
pub const PREDICTIONS: &str = "delaycast_predictions_total";
pub const PREDICTION_ERRORS: &str = "delaycast_prediction_errors_total";
pub const PREDICTION_LATENCY_US: &str = "delaycast_prediction_latency_us";

/// Register descriptions for every service metric
pub fn describe() {
    metrics::describe_counter!(MODELS_LOADED, "Models successfully loaded and stored");
    metrics::describe_counter!(MODEL_LOAD_FAILURES, "Model loads rejected, by error kind");
    metrics::describe_counter!(PREDICTIONS, "Successful predictions by label");
    metrics::describe_counter!(PREDICTION_ERRORS, "Predictions rejected by the model or input");
    metrics::describe_histogram!(
        PREDICTION_LATENCY_US,
        metrics::Unit::Microseconds,
        "Time spent building the frame and evaluating the model"
    );
}

pub(crate) fn record_model_loaded() {
    metrics::counter!(MODELS_LOADED).increment(1);
}

pub(crate) fn record_model_load_failure(err: &Error) {
    metrics::counter!(MODEL_LOAD_FAILURES, "kind" => err.kind()).increment(1);
}

pub(crate) fn record_prediction(label: PredictionLabel, latency: Duration) {
    metrics::counter!(PREDICTIONS, "label" => label.as_str()).increment(1);
    metrics::histogram!(PREDICTION_LATENCY_US).record(latency.as_micros() as f64);
}

pub(crate) fn record_prediction_error() {
    metrics::counter!(PREDICTION_ERRORS).increment(1);
}
