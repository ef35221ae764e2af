use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Ghibli World metrics
const PREFIX: &str = "ghibli_world";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Upstream Metrics
    pub static ref UPSTREAM_FETCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_fetches_total"), "Upstream fetches by kind and outcome"),
        &["kind", "outcome"]
    ).expect("Failed to create upstream_fetches_total metric");

    // Cache Metrics
    pub static ref CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_cache_lookups_total"), "Cache lookups by cache and result"),
        &["cache", "result"]
    ).expect("Failed to create cache_lookups_total metric");

    // Catalog Metrics
    pub static ref CATALOG_FILMS: Gauge = Gauge::new(
        format!("{PREFIX}_catalog_films"),
        "Number of films in the last computed catalog"
    ).expect("Failed to create catalog_films metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_FETCHES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_FILMS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Maps a request path to a bounded label value.
pub fn categorize_endpoint(path: &str) -> &'static str {
    match path {
        "/api/world" => "world",
        "/api/movies" => "movies",
        "/api/quiz" => "quiz",
        "/proxy/image" => "image_proxy",
        "/healthz" => "health",
        "/" | "/quiz" | "/explorer" | "/oracle" => "page",
        p if p.starts_with("/api/oracle/") => "oracle",
        _ => "other",
    }
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let endpoint = categorize_endpoint(path);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of a call to the film catalog or an image host
pub fn record_upstream_fetch(kind: &str, outcome: &str) {
    UPSTREAM_FETCHES_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

pub fn record_cache_lookup(cache: &str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    CACHE_LOOKUPS_TOTAL.with_label_values(&[cache, result]).inc();
}

pub fn set_catalog_films(count: usize) {
    CATALOG_FILMS.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
