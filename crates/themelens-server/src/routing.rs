//! Axum router configuration for all endpoints

use axum::{
  body::Bytes,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Json, Response},
  routing::{get, post},
  Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use themelens::model::{DashboardBundle, DashboardRequest, TextInfo, TextInfoRequest};

use crate::inference::infer;
use crate::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/status", get(status))
    .route("/get-dashboard-data", get(dashboard_data).post(dashboard_data))
    .route("/text-info", post(text_info))
    .route("/save-settings", post(save_settings))
    .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
  pub status: &'static str,
  pub version: &'static str,
  pub themes: usize,
  pub documents: usize,
}

/// GET /status - Health check endpoint
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
  Json(StatusResponse {
    status: "healthy",
    version: env!("CARGO_PKG_VERSION"),
    themes: state.bundle.themes.len(),
    documents: state.bundle.documents.len(),
  })
}

/// GET|POST /get-dashboard-data - The whole bundle; the model in the body is
/// only logged.
async fn dashboard_data(State(state): State<AppState>, body: Bytes) -> Json<DashboardBundle> {
  match serde_json::from_slice::<DashboardRequest>(&body) {
    Ok(request) => info!(model = %request.model, "Serving dashboard bundle"),
    Err(_) => info!("Serving dashboard bundle"),
  }
  Json(state.bundle.as_ref().clone())
}

/// POST /text-info - Top themes for one document
async fn text_info(State(state): State<AppState>, body: Bytes) -> Result<Json<TextInfo>, Response> {
  let request: TextInfoRequest = serde_json::from_slice(&body).map_err(|e| {
    warn!(error = %e, "Rejected malformed text-info request");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
  })?;

  if request.text.trim().is_empty() {
    return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": "text must not be empty" }))).into_response());
  }

  let result = infer(&state.bundle, &request);
  debug!(id = %request.id, theme = ?result.theme, "Inferred themes");
  Ok(Json(result))
}

/// POST /save-settings - Echo the payload back
async fn save_settings(body: Bytes) -> Json<Value> {
  let payload = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));
  info!(%payload, "Settings received");
  Json(json!({ "ok": true, "echo": payload }))
}
