//! Session Gateway configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! injected into the components that need it; nothing reads ambient global
//! state after boot. The API secret is redacted in Debug output.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default token validity window in seconds (1 hour).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Maximum allowed token validity window in seconds (24 hours).
pub const MAX_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Default base URL used when deriving shareable meeting URLs.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Session Gateway configuration.
///
/// Loaded from environment variables with sensible defaults. The signing
/// secret is held as a [`SecretString`] so accidental `{:?}` logging cannot
/// leak it.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Deployment region identifier (e.g., "us-east-1").
    pub region: String,

    /// API key identifying this gateway to the media server. Used as the
    /// `iss` claim in issued tokens.
    pub api_key: String,

    /// Shared secret used to sign capability tokens. Loaded once at
    /// startup; never rotated within a process lifetime.
    pub api_secret: SecretString,

    /// Validity window for issued tokens, in seconds.
    pub token_ttl_seconds: i64,

    /// Public base URL used to derive shareable meeting URLs.
    pub public_base_url: String,
}

/// Custom Debug implementation that redacts the signing secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("region", &self.region)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token TTL configuration: {0}")]
    InvalidTokenTtl(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_key = vars
            .get("SG_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("SG_API_KEY".to_string()))?
            .clone();

        let api_secret = vars
            .get("SG_API_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("SG_API_SECRET".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let region = vars
            .get("SG_REGION")
            .cloned()
            .unwrap_or_else(|| "us-east-1".to_string());

        // Parse token TTL with validation
        let token_ttl_seconds = if let Some(value_str) = vars.get("SG_TOKEN_TTL_SECONDS") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenTtl(format!(
                    "SG_TOKEN_TTL_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value <= 0 {
                return Err(ConfigError::InvalidTokenTtl(format!(
                    "SG_TOKEN_TTL_SECONDS must be positive, got {}",
                    value
                )));
            }

            if value > MAX_TOKEN_TTL_SECONDS {
                return Err(ConfigError::InvalidTokenTtl(format!(
                    "SG_TOKEN_TTL_SECONDS must not exceed {} seconds, got {}",
                    MAX_TOKEN_TTL_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_TOKEN_TTL_SECONDS
        };

        let public_base_url = vars
            .get("SG_PUBLIC_BASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());

        Ok(Config {
            bind_address,
            region,
            api_key,
            api_secret: SecretString::from(api_secret),
            token_ttl_seconds,
            public_base_url,
        })
    }
}
