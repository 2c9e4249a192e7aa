//! Token issuance facade.
//!
//! Composes room-name derivation with the credential issuer so callers that
//! have already resolved a meeting record can request a token in one step.

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::errors::SgError;
use crate::models::ParticipantRole;
use crate::services::rooms;
use std::sync::Arc;

/// Facade over [`TokenIssuer`] and room-name derivation.
///
/// Cheap to clone; token issuance is stateless and fully concurrent.
#[derive(Clone)]
pub struct TokenService {
    issuer: Arc<TokenIssuer>,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        TokenService {
            issuer: Arc::new(TokenIssuer::new(config)),
        }
    }

    /// Issue a token scoped to an explicit room name.
    pub fn issue(
        &self,
        room_name: &str,
        identity: &str,
        role: ParticipantRole,
    ) -> Result<String, SgError> {
        self.issuer.issue(room_name, identity, role)
    }

    /// Issue a token for the room derived from a meeting id.
    ///
    /// Empty meeting ids are rejected here so the degenerate prefix-only
    /// room name never reaches the issuer.
    pub fn issue_for_meeting(
        &self,
        meeting_id: &str,
        identity: &str,
        role: ParticipantRole,
    ) -> Result<String, SgError> {
        if meeting_id.trim().is_empty() {
            return Err(SgError::Validation("meeting id is required".to_string()));
        }
        self.issuer
            .issue(&rooms::room_name(meeting_id), identity, role)
    }
}
