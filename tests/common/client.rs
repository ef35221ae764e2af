//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest with one method per Ghibli World endpoint.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Pages and Status
    // ========================================================================

    pub async fn healthz(&self) -> Response {
        self.get("/healthz").await
    }

    pub async fn get_page(&self, path: &str) -> Response {
        self.get(path).await
    }

    // ========================================================================
    // API Endpoints
    // ========================================================================

    pub async fn get_world(&self) -> Response {
        self.get("/api/world").await
    }

    pub async fn get_movies(&self, query: Option<&str>, filter: Option<&str>) -> Response {
        let mut params = Vec::new();
        if let Some(q) = query {
            params.push(("q", q));
        }
        if let Some(filter) = filter {
            params.push(("filter", filter));
        }
        self.client
            .get(format!("{}/api/movies", self.base_url))
            .query(&params)
            .send()
            .await
            .expect("Movies request failed")
    }

    pub async fn post_quiz(&self, payload: &Value) -> Response {
        self.client
            .post(format!("{}/api/quiz", self.base_url))
            .json(payload)
            .send()
            .await
            .expect("Quiz request failed")
    }

    /// Posts an arbitrary body, for exercising malformed payloads.
    pub async fn post_quiz_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/api/quiz", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Quiz request failed")
    }

    pub async fn get_oracle(&self, mood: &str) -> Response {
        self.get(&format!("/api/oracle/{}", mood)).await
    }

    // ========================================================================
    // Image Proxy
    // ========================================================================

    pub async fn proxy_image(&self, url: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}/proxy/image", self.base_url));
        if let Some(url) = url {
            request = request.query(&[("url", url)]);
        }
        request.send().await.expect("Proxy request failed")
    }

    /// Follows a proxy path as returned by the API, e.g. `/proxy/image?url=...`.
    pub async fn follow_proxy_path(&self, path: &str) -> Response {
        self.get(path).await
    }
}
