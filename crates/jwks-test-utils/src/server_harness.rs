//! Test server harness for E2E testing
//!
//! Provides TestJwksServer for spawning real JWKS server instances in tests.

use crate::crypto_fixtures::seeded_registry;
use chrono::Utc;
use jwks_service::config::{Config, DEFAULT_REQUEST_TIMEOUT_SECONDS};
use jwks_service::models::{AuthResponse, Jwks};
use jwks_service::repositories::signing_keys::KeyRegistry;
use jwks_service::routes::{self, AppState};
use jwks_service::services::key_management_service;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the JWKS server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_jwks_e2e() -> Result<(), anyhow::Error> {
///     let server = TestJwksServer::spawn_seeded().await?;
///
///     let response = reqwest::get(format!("{}/jwks", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestJwksServer {
    addr: SocketAddr,
    registry: Arc<KeyRegistry>,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestJwksServer {
    /// Spawn a server whose registry is seeded exactly like production
    /// startup: one freshly generated valid key and one expired key.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let registry = KeyRegistry::new();
        key_management_service::initialize_signing_keys(&registry)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize signing keys: {}", e))?;

        Self::spawn_with_registry(registry).await
    }

    /// Spawn a server seeded with the fixture keys
    /// ([`VALID_KEY_ID`](crate::VALID_KEY_ID) then
    /// [`EXPIRED_KEY_ID`](crate::EXPIRED_KEY_ID)), relative to now.
    pub async fn spawn_seeded() -> Result<Self, anyhow::Error> {
        let registry = seeded_registry(Utc::now().timestamp()).await?;
        Self::spawn_with_registry(registry).await
    }

    /// Spawn a server around a caller-built registry
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn_with_registry(registry: KeyRegistry) -> Result<Self, anyhow::Error> {
        let registry = Arc::new(registry);

        let config = Config {
            bind_address: "127.0.0.1:0".to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        let state = Arc::new(AppState {
            registry: registry.clone(),
            config,
        });

        // The global recorder can only be installed once per test process;
        // later servers get a standalone recorder.
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            registry,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the registry the server reads from
    pub fn registry(&self) -> &Arc<KeyRegistry> {
        &self.registry
    }

    /// Get a shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Fetch and parse the key set from `path`
    /// (`/.well-known/jwks.json` or `/jwks`).
    pub async fn fetch_jwks(&self, path: &str) -> Result<Jwks, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}{}", self.url(), path))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Jwks>().await?)
    }

    /// Request a token over HTTP, valid or expired
    ///
    /// # Example
    /// ```rust,ignore
    /// let token = server.request_token(true).await?;
    /// token.assert_expired();
    /// ```
    pub async fn request_token(&self, expired: bool) -> Result<String, anyhow::Error> {
        let mut url = format!("{}/auth", self.url());
        if expired {
            url.push_str("?expired=true");
        }

        let response = self.client.post(url).send().await?.error_for_status()?;

        Ok(response.json::<AuthResponse>().await?.token)
    }
}

impl Drop for TestJwksServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
