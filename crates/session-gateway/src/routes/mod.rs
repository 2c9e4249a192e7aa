//! HTTP routes for the Session Gateway.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::repositories::MeetingStore;
use crate::services::{SessionLifecycleManager, TokenService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Meeting record store.
    pub store: Arc<dyn MeetingStore>,

    /// Capability token issuance facade.
    pub tokens: TokenService,

    /// Meeting lifecycle state machine.
    pub lifecycle: SessionLifecycleManager,
}

/// Build the application routes.
///
/// Creates an Axum router with the token, meeting, and health endpoints,
/// a TraceLayer for request logging, and a 30 second request timeout.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/tokens", post(handlers::issue_token))
        .route("/v1/meetings", post(handlers::create_meeting))
        .route(
            "/v1/meetings/:id",
            get(handlers::get_meeting).patch(handlers::patch_meeting),
        )
        .route("/v1/meetings/:id/join", post(handlers::join_meeting))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    routes
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
