//! Test server harness for E2E testing
//!
//! Provides [`TestServer`] for spawning real Session Gateway instances in
//! tests: the real router, an in-memory store, and deterministic signing
//! keys, bound to a random local port.

use session_gateway::config::Config;
use session_gateway::repositories::{InMemoryMeetingStore, MeetingStore};
use session_gateway::routes::{self, AppState};
use session_gateway::services::{SessionLifecycleManager, TokenService};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// API key used by spawned test servers.
pub const TEST_API_KEY: &str = "test-api-key";

/// Signing secret used by spawned test servers. Tests that verify issued
/// tokens decode them with this secret.
pub const TEST_API_SECRET: &str = "test-api-secret";

/// Test harness for spawning a Session Gateway server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> Result<()> {
///     let server = TestServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/v1/health", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestServer {
    addr: SocketAddr,
    config: Config,
    store: Arc<dyn MeetingStore>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a new test server instance with default test configuration.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a test server with extra configuration variables layered over
    /// the defaults.
    pub async fn spawn_with_vars(
        extra_vars: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("SG_API_KEY".to_string(), TEST_API_KEY.to_string()),
            ("SG_API_SECRET".to_string(), TEST_API_SECRET.to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("SG_REGION".to_string(), "test-region".to_string()),
        ]);
        vars.extend(extra_vars);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let store: Arc<dyn MeetingStore> = Arc::new(InMemoryMeetingStore::new());
        let tokens = TokenService::new(&config);
        let lifecycle = SessionLifecycleManager::new(Arc::clone(&store));

        let state = Arc::new(AppState {
            config: config.clone(),
            store: Arc::clone(&store),
            tokens,
            lifecycle,
        });

        // Build routes using session-gateway's real route builder
        let app = routes::build_routes(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            store,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the store backing the spawned server, for seeding records
    /// directly in tests.
    pub fn store(&self) -> Arc<dyn MeetingStore> {
        Arc::clone(&self.store)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Abort the HTTP server task so the port is released as soon as the
        // test completes
        self._handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestServer::spawn().await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));

        let response = reqwest::get(format!("{}/v1/health", server.url())).await?;
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["region"], "test-region");

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_addr() -> Result<(), anyhow::Error> {
        let server = TestServer::spawn().await?;

        let addr = server.addr();
        assert!(addr.ip().is_loopback());
        assert!(addr.port() > 0);

        let expected_url = format!("http://{}", addr);
        assert_eq!(server.url(), expected_url);

        Ok(())
    }

    #[tokio::test]
    async fn test_server_provides_config_access() -> Result<(), anyhow::Error> {
        let server = TestServer::spawn().await?;

        let config = server.config();
        assert_eq!(config.region, "test-region");
        assert_eq!(config.api_key, TEST_API_KEY);

        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_servers_different_ports() -> Result<(), anyhow::Error> {
        let server1 = TestServer::spawn().await?;
        let server2 = TestServer::spawn().await?;

        assert_ne!(server1.addr(), server2.addr());

        let response1 = reqwest::get(format!("{}/v1/health", server1.url())).await?;
        assert_eq!(response1.status(), 200);

        let response2 = reqwest::get(format!("{}/v1/health", server2.url())).await?;
        assert_eq!(response2.status(), 200);

        Ok(())
    }
}
