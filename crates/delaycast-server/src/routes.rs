//! HTTP routes and handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        MatchedPath, Query, Request, State,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use delaycast_core::{InferenceRecord, ModelSummary};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/model/load", post(load_model))
        .route("/model/list", get(list_models))
        .route("/model/predict", post(predict))
        .route("/model/history", get(history))
        .fallback(fallback)
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn welcome() -> Json<&'static str> {
    Json("Welcome to Model API")
}

async fn health_check() -> Json<Value> {
    Json(json!({ "Status": "OK" }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct LoadModelParams {
    model_path: String,
}

async fn load_model(
    State(state): State<AppState>,
    params: Result<Query<LoadModelParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    info!("Loading model from {}", params.model_path);

    state
        .services
        .repository
        .load_model(&params.model_path)
        .await
        .map_err(ApiError::SaveModel)?;

    Ok(Json(json!({ "message": "Model loaded and persisted successfully." })))
}

#[derive(Debug, Deserialize)]
struct ListModelsParams {
    include_payload: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ModelList {
    models: Vec<ModelSummary>,
}

async fn list_models(
    State(state): State<AppState>,
    params: Result<Query<ListModelsParams>, QueryRejection>,
) -> Result<Json<ModelList>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let include_payload = params.include_payload.unwrap_or(state.config.list_payloads);

    let models = state.services.history.list_models(include_payload);
    debug!("Listing {} models", models.len());
    Ok(Json(ModelList { models }))
}

async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InferenceRecord>, ApiError> {
    // The body is validated before the model is resolved, so a malformed
    // request is a client error even when no model is loaded.
    let Json(body) = body.map_err(|e| {
        ApiError::InvalidRequest(format!("Error on prediction: {}", e.body_text()))
    })?;
    let input = state
        .config
        .schema
        .parse(body)
        .map_err(ApiError::Prediction)?;

    let (model, model_id) = state
        .services
        .repository
        .current_model()
        .map_err(ApiError::LoadModel)?;

    let record = state
        .services
        .predictions
        .predict(&input, &model, &model_id)
        .map_err(ApiError::Prediction)?;

    Ok(Json(record))
}

#[derive(Debug, Serialize)]
struct InferenceHistory {
    status: &'static str,
    inferences: Vec<InferenceRecord>,
}

async fn history(State(state): State<AppState>) -> Json<InferenceHistory> {
    Json(InferenceHistory {
        status: "ok",
        inferences: state.services.history.list_inferences(),
    })
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// Count requests per matched route and status
async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;

    metrics::counter!(
        "delaycast_http_requests_total",
        "route" => route,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    response
}
