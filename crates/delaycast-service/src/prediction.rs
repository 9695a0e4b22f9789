//! Prediction service

use crate::telemetry;
use delaycast_core::{
    Error, Inference, InferenceRecord, InputData, PredictionLabel, RecordId, RecordStore, Result,
};
use delaycast_model::{Frame, Predictor};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs a model on structured input and records the inference
pub struct PredictionService {
    store: Arc<RecordStore>,
}

impl PredictionService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Predict a label for `input` and append the inference record
    ///
    /// Any failure while tabulating the input or evaluating the model is
    /// reported as a validation error and nothing is recorded.
    pub fn predict(
        &self,
        input: &InputData,
        model: &dyn Predictor,
        model_id: &RecordId,
    ) -> Result<InferenceRecord> {
        let start = Instant::now();

        let prediction = match classify(input, model) {
            Ok(label) => label,
            Err(e) => {
                telemetry::record_prediction_error();
                return Err(match e {
                    Error::Validation(_) => e,
                    other => Error::validation(other.to_string()),
                });
            }
        };
        telemetry::record_prediction(prediction, start.elapsed());

        let record = self.store.inferences().insert_returning(Inference {
            model_id: model_id.clone(),
            prediction,
            features: input.clone(),
        });

        info!(
            "Inference {} with model {} ({}): {}",
            record.id,
            model_id,
            model.name(),
            prediction
        );
        Ok(record)
    }
}

fn classify(input: &InputData, model: &dyn Predictor) -> Result<PredictionLabel> {
    let frame = Frame::from_record(input)?;
    debug!("Built frame with columns {:?}", frame.columns());

    let classes = model.predict(&frame)?;
    match classes.as_slice() {
        [class] => Ok(PredictionLabel::from_class(*class)),
        other => Err(Error::validation(format!(
            "model returned {} predictions for a single row",
            other.len()
        ))),
    }
}
