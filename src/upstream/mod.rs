//! Access to the remote film catalog and to arbitrary image hosts.
//!
//! Both capabilities are traits so the catalog and the image proxy can be
//! exercised against in-memory fakes.

mod client;
pub mod models;

pub use client::HttpUpstream;
pub use models::{parse_film_payload, RawFilm, UpstreamImage};

use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::server::metrics::record_upstream_fetch;

/// Timeout applied to every outbound request.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed body from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("body from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Malformed { .. } => "malformed",
            UpstreamError::TooLarge { .. } => "too_large",
        }
    }
}

/// A remote endpoint publishing film records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw film records published at `url`.
    async fn fetch_films(&self, url: &str) -> Result<Vec<RawFilm>, UpstreamError>;
}

/// Any host serving images over HTTP.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the image at `url`, giving up once the body grows past `max_bytes`.
    async fn fetch_image(&self, url: &str, max_bytes: usize)
        -> Result<UpstreamImage, UpstreamError>;
}

/// Fetches every source concurrently and concatenates the records in source
/// order. A failing source is logged and contributes nothing.
pub async fn fetch_all_films(source: &dyn CatalogSource, urls: &[String]) -> Vec<RawFilm> {
    let results = join_all(urls.iter().map(|url| source.fetch_films(url))).await;

    let mut films = Vec::new();
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(batch) => {
                debug!("Fetched {} film records from {}", batch.len(), url);
                record_upstream_fetch("catalog", "ok");
                films.extend(batch);
            }
            Err(err) => {
                warn!("Skipping catalog source {}: {}", url, err);
                record_upstream_fetch("catalog", err.kind());
            }
        }
    }
    films
}
