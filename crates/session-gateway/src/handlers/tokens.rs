//! Token issuance handler.
//!
//! `POST /v1/tokens` - issue a capability token for an explicit room.
//!
//! The caller is expected to have resolved the meeting (and derived its
//! room name) already; this endpoint only scopes and signs the credential.

use crate::errors::SgError;
use crate::models::{ParticipantRole, TokenRequest, TokenResponse};
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for `POST /v1/tokens`.
///
/// # Response
///
/// - 200 OK: `{ "token": "..." }`
/// - 400 Bad Request: missing `roomName` or `participantName`
/// - 500 Internal Server Error: signing failure
#[instrument(skip(state, request), fields(room_name = %request.room_name))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, SgError> {
    let role = if request.is_host {
        ParticipantRole::Host
    } else {
        ParticipantRole::Participant
    };

    let token = state
        .tokens
        .issue(&request.room_name, &request.participant_name, role)?;

    info!(
        target: "sg.handlers.tokens",
        room_name = %request.room_name,
        is_host = request.is_host,
        "Issued room token"
    );

    Ok(Json(TokenResponse { token }))
}
