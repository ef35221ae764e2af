//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own caches and fake upstreams.

use super::constants::*;
use super::fixtures::{fixture_upstreams, FixtureCatalog, FixtureImages};
use ghibli_world::cache::MemoryTtlCache;
use ghibli_world::catalog::{Film, FilmCatalog, CATALOG_TTL};
use ghibli_world::clock::{Clock, SystemClock};
use ghibli_world::image_proxy::{ImageProxy, ProxiedImage, IMAGE_CACHE_TTL};
use ghibli_world::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance with isolated caches and upstream fakes
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The fake catalog host, for counting upstream calls
    pub catalog_source: Arc<FixtureCatalog>,

    /// The fake image host, for counting upstream calls
    pub image_source: Arc<FixtureImages>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server whose catalog sources both answer.
    pub async fn spawn() -> Self {
        Self::spawn_with(false, None).await
    }

    /// Spawns a server whose catalog sources are all unreachable.
    pub async fn spawn_with_failing_catalog() -> Self {
        Self::spawn_with(true, None).await
    }

    /// Spawns a server that also serves pages from `frontend_dir`.
    pub async fn spawn_with_frontend(frontend_dir: &Path) -> Self {
        Self::spawn_with(false, Some(frontend_dir.to_string_lossy().to_string())).await
    }

    async fn spawn_with(failing_catalog: bool, frontend_dir_path: Option<String>) -> Self {
        let (catalog_source, image_source) = fixture_upstreams(failing_catalog);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let catalog = FilmCatalog::new(
            catalog_source.clone(),
            vec![
                PRIMARY_CATALOG_URL.to_string(),
                MIRROR_CATALOG_URL.to_string(),
            ],
            Arc::new(MemoryTtlCache::<(), Arc<Vec<Film>>>::new(
                CATALOG_TTL,
                clock.clone(),
            )),
        );
        let image_proxy = ImageProxy::new(
            image_source.clone(),
            Arc::new(
                MemoryTtlCache::<String, ProxiedImage>::new(IMAGE_CACHE_TTL, clock.clone())
                    .with_max_entries(16),
            ),
            clock,
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            content_cache_age_sec: 60,
            frontend_dir_path,
            ..Default::default()
        };
        let app = make_app(config, Arc::new(catalog), Arc::new(image_proxy));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            catalog_source,
            image_source,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling /healthz
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/healthz", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
