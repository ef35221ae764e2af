//! Fetches remote images on behalf of the pages and keeps them for an hour.

use bytes::Bytes;
use reqwest::Url;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::server::metrics::{record_cache_lookup, record_upstream_fetch};
use crate::upstream::{ImageSource, UpstreamError};

pub const IMAGE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Largest body the proxy accepts: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const PROXY_PATH: &str = "/proxy/image";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Rewrites a remote image URL so the browser loads it through the proxy.
pub fn to_proxy_url(url: Option<&str>) -> Option<String> {
    url.map(|url| format!("{}?url={}", PROXY_PATH, urlencoding::encode(url)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedImage {
    pub content: Bytes,
    /// Media type with any parameters removed.
    pub content_type: String,
    pub fetched_at: Instant,
}

#[derive(Debug, Error)]
pub enum ImageProxyError {
    #[error("invalid image url: {0}")]
    InvalidUrl(String),

    #[error("image fetch failed: {0}")]
    FetchFailed(String),

    #[error("image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

impl From<UpstreamError> for ImageProxyError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::TooLarge { limit, .. } => ImageProxyError::TooLarge { limit },
            other => ImageProxyError::FetchFailed(other.to_string()),
        }
    }
}

pub type ImageCache = dyn TtlCache<String, ProxiedImage>;

pub struct ImageProxy {
    source: Arc<dyn ImageSource>,
    cache: Arc<ImageCache>,
    clock: Arc<dyn Clock>,
}

fn validate_url(url: &str) -> Result<(), ImageProxyError> {
    let parsed = Url::parse(url).map_err(|err| ImageProxyError::InvalidUrl(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ImageProxyError::InvalidUrl(format!(
            "unsupported scheme {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ImageProxyError::InvalidUrl("missing host".to_string()));
    }
    Ok(())
}

/// `image/png; charset=binary` becomes `image/png`.
fn strip_parameters(content_type: Option<&str>) -> String {
    content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

impl ImageProxy {
    pub fn new(source: Arc<dyn ImageSource>, cache: Arc<ImageCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache,
            clock,
        }
    }

    /// Returns the image at `url`, from the cache when it is recent enough.
    pub async fn fetch_image(&self, url: &str) -> Result<ProxiedImage, ImageProxyError> {
        validate_url(url)?;

        if let Some(cached) = self.cache.get(&url.to_string()) {
            record_cache_lookup("image", true);
            return Ok(cached);
        }
        record_cache_lookup("image", false);

        let fetched = match self.source.fetch_image(url, MAX_IMAGE_BYTES).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!("Could not proxy {}: {}", url, err);
                record_upstream_fetch("image", err.kind());
                return Err(err.into());
            }
        };
        record_upstream_fetch("image", "ok");

        // Sources may ignore max_bytes.
        if fetched.body.len() > MAX_IMAGE_BYTES {
            return Err(ImageProxyError::TooLarge {
                limit: MAX_IMAGE_BYTES,
            });
        }

        let image = ProxiedImage {
            content: fetched.body,
            content_type: strip_parameters(fetched.content_type.as_deref()),
            fetched_at: self.clock.now(),
        };
        debug!(
            "Caching {} ({} bytes, {})",
            url,
            image.content.len(),
            image.content_type
        );
        self.cache.insert(url.to_string(), image.clone());
        Ok(image)
    }

    pub fn cached_images(&self) -> usize {
        self.cache.len()
    }
}
