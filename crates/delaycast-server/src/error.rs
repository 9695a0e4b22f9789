//! Mapping of service errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use delaycast_core::Error;
use serde_json::json;

/// Error returned by route handlers, tagged with the operation that failed
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Error saving model: {0}")]
    SaveModel(Error),

    #[error("Error loading model: {0}")]
    LoadModel(Error),

    #[error("Error on prediction: {0}")]
    Prediction(Error),

    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Prediction(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SaveModel(_) | Self::LoadModel(_) | Self::Prediction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::SaveModel(Error::io("missing")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::LoadModel(Error::not_found("no model")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Prediction(Error::validation("bad input")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Prediction(Error::internal("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn detail_carries_context() {
        let err = ApiError::Prediction(Error::validation("missing field `dep_delay`"));
        assert_eq!(
            err.to_string(),
            "Error on prediction: validation error: missing field `dep_delay`"
        );
    }
}
