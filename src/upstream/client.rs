//! reqwest-backed implementation of the upstream traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{header::CONTENT_TYPE, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::models::{parse_film_payload, RawFilm, UpstreamImage};
use super::{CatalogSource, ImageSource, UpstreamError};

/// HTTP client shared by the catalog and the image proxy.
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Create a new client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ghibli-world/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Sends a GET and rejects anything other than a plain 200.
    async fn get(&self, url: &str) -> Result<Response, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(url, err))?;

        if response.status() != StatusCode::OK {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl CatalogSource for HttpUpstream {
    async fn fetch_films(&self, url: &str) -> Result<Vec<RawFilm>, UpstreamError> {
        let response = self.get(url).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| UpstreamError::Malformed {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        parse_film_payload(payload).map_err(|reason| UpstreamError::Malformed {
            url: url.to_string(),
            reason,
        })
    }
}

#[async_trait]
impl ImageSource for HttpUpstream {
    async fn fetch_image(
        &self,
        url: &str,
        max_bytes: usize,
    ) -> Result<UpstreamImage, UpstreamError> {
        let too_large = || UpstreamError::TooLarge {
            url: url.to_string(),
            limit: max_bytes,
        };

        let mut response = self.get(url).await?;
        if response
            .content_length()
            .is_some_and(|length| length > max_bytes as u64)
        {
            return Err(too_large());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // Stream so an undeclared oversized body is cut off early.
        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| transport_error(url, err))?
        {
            if body.len() + chunk.len() > max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(UpstreamImage {
            content_type,
            body: body.freeze(),
        })
    }
}
