//! Capability token issuance.
//!
//! Builds and signs bearer tokens that grant a named participant a specific
//! permission set inside exactly one room. The claim layout matches what the
//! downstream media server verifies: `iss` carries the gateway API key,
//! `sub` the participant identity, and a `video` object carries the grants.
//!
//! Signing material is loaded once at startup and injected here at
//! construction time; tests substitute deterministic keys through the same
//! constructor.

use crate::config::Config;
use crate::errors::SgError;
use crate::models::ParticipantRole;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Permission set encoded in a capability token, scoped to one room.
///
/// Every participant may publish and subscribe to media and data; the
/// gateway does not model view-only participants. Room administration is
/// reserved for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
    /// Name of the single room this token is scoped to.
    pub room: String,

    pub room_join: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
    pub room_admin: bool,
}

impl VideoGrants {
    /// Derive the grant set for a role inside a room.
    ///
    /// `room_admin` is the only role-dependent grant.
    pub fn for_role(room: &str, role: ParticipantRole) -> Self {
        VideoGrants {
            room: room.to_string(),
            room_join: true,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
            room_admin: role.is_host(),
        }
    }
}

/// Claims carried by an issued capability token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer: the gateway API key.
    pub iss: String,

    /// Subject: the participant identity (display name).
    pub sub: String,

    /// Display name, duplicated from `sub` for verifier convenience.
    pub name: String,

    /// Not-before timestamp (Unix epoch seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Grant set scoped to one room.
    pub video: VideoGrants,
}

/// Signs capability tokens with the process-wide API key pair.
///
/// Stateless apart from the read-only key material: issuing a token twice
/// with identical inputs yields two independently valid tokens. Nothing is
/// tracked or deduplicated.
pub struct TokenIssuer {
    api_key: String,
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

impl TokenIssuer {
    /// Build an issuer from configuration loaded at startup.
    pub fn new(config: &Config) -> Self {
        TokenIssuer {
            api_key: config.api_key.clone(),
            encoding_key: EncodingKey::from_secret(config.api_secret.expose_secret().as_bytes()),
            ttl_seconds: config.token_ttl_seconds,
        }
    }

    /// Issue a signed capability token for a (room, identity, role) triple.
    ///
    /// Fails with [`SgError::Validation`] when `room_name` or `identity` is
    /// empty, and with [`SgError::Signing`] when the signing primitive
    /// rejects the configured key material.
    pub fn issue(
        &self,
        room_name: &str,
        identity: &str,
        role: ParticipantRole,
    ) -> Result<String, SgError> {
        if room_name.trim().is_empty() {
            return Err(SgError::Validation("roomName is required".to_string()));
        }
        if identity.trim().is_empty() {
            return Err(SgError::Validation(
                "participantName is required".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            name: identity.to_string(),
            nbf: now,
            exp: now + self.ttl_seconds,
            video: VideoGrants::for_role(room_name, role),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SgError::Signing(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use std::collections::HashMap;

    fn test_config() -> Config {
        let vars = HashMap::from([
            ("SG_API_KEY".to_string(), "test-api-key".to_string()),
            ("SG_API_SECRET".to_string(), "test-api-secret".to_string()),
        ]);
        Config::from_vars(&vars).unwrap()
    }

    fn decode_claims(token: &str) -> AccessClaims {
        let key = DecodingKey::from_secret(b"test-api-secret");
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<AccessClaims>(token, &key, &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_host_token_grants_room_admin() {
        let issuer = TokenIssuer::new(&test_config());
        let token = issuer
            .issue("meeting-room-abc", "Alice", ParticipantRole::Host)
            .unwrap();

        let claims = decode_claims(&token);
        assert_eq!(claims.sub, "Alice");
        assert_eq!(claims.iss, "test-api-key");
        assert_eq!(claims.video.room, "meeting-room-abc");
        assert!(claims.video.room_join);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
        assert!(claims.video.can_publish_data);
        assert!(claims.video.room_admin);
    }

    #[test]
    fn test_participant_token_has_no_room_admin() {
        let issuer = TokenIssuer::new(&test_config());
        let token = issuer
            .issue("meeting-room-abc", "Bob", ParticipantRole::Participant)
            .unwrap();

        let claims = decode_claims(&token);
        assert!(claims.video.room_join);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
        assert!(claims.video.can_publish_data);
        assert!(!claims.video.room_admin);
    }

    #[test]
    fn test_empty_identity_rejected() {
        let issuer = TokenIssuer::new(&test_config());

        let result = issuer.issue("meeting-room-abc", "", ParticipantRole::Host);
        assert!(matches!(result, Err(SgError::Validation(_))));

        // Rejected regardless of roomName validity
        let result = issuer.issue("", "", ParticipantRole::Participant);
        assert!(matches!(result, Err(SgError::Validation(_))));
    }

    #[test]
    fn test_empty_room_rejected() {
        let issuer = TokenIssuer::new(&test_config());
        let result = issuer.issue("", "Alice", ParticipantRole::Host);
        assert!(matches!(result, Err(SgError::Validation(_))));
    }

    #[test]
    fn test_whitespace_only_fields_rejected() {
        let issuer = TokenIssuer::new(&test_config());
        let result = issuer.issue("   ", "Alice", ParticipantRole::Host);
        assert!(matches!(result, Err(SgError::Validation(_))));

        let result = issuer.issue("meeting-room-abc", "  ", ParticipantRole::Host);
        assert!(matches!(result, Err(SgError::Validation(_))));
    }

    #[test]
    fn test_repeated_issuance_yields_independent_tokens() {
        let issuer = TokenIssuer::new(&test_config());
        let t1 = issuer
            .issue("meeting-room-abc", "Alice", ParticipantRole::Host)
            .unwrap();
        let t2 = issuer
            .issue("meeting-room-abc", "Alice", ParticipantRole::Host)
            .unwrap();

        // Both decode to valid claim sets with identical grants
        let c1 = decode_claims(&t1);
        let c2 = decode_claims(&t2);
        assert_eq!(c1.video, c2.video);
    }

    #[test]
    fn test_token_expiry_uses_configured_ttl() {
        let mut vars = HashMap::from([
            ("SG_API_KEY".to_string(), "test-api-key".to_string()),
            ("SG_API_SECRET".to_string(), "test-api-secret".to_string()),
        ]);
        vars.insert("SG_TOKEN_TTL_SECONDS".to_string(), "900".to_string());
        let config = Config::from_vars(&vars).unwrap();

        let issuer = TokenIssuer::new(&config);
        let token = issuer
            .issue("meeting-room-abc", "Alice", ParticipantRole::Host)
            .unwrap();

        let claims = decode_claims(&token);
        assert_eq!(claims.exp - claims.nbf, 900);
    }
}
