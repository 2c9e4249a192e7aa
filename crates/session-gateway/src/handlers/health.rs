//! Health check handler.

use crate::errors::SgError;
use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for `GET /v1/health`.
///
/// The gateway has no external dependency to probe (the store is
/// in-process), so a reachable process is a healthy one.
#[instrument(skip_all, name = "sg.health.check")]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, SgError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        region: state.config.region.clone(),
    }))
}
