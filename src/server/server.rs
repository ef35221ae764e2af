use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::errors::error_response;
use super::metrics::metrics_handler;
use super::{http_cache, log_requests, state::*, ServerConfig};
use crate::catalog::{filter_films, ExplorerFilter};
use crate::image_proxy::PROXY_PATH;
use crate::oracle::suggest;
use crate::quiz::handle_quiz;
use crate::world::build_world_snapshot;

/// Page routes and the file each one serves from the frontend directory.
const PAGES: [(&str, &str); 4] = [
    ("/", "index.html"),
    ("/quiz", "quiz.html"),
    ("/explorer", "explorer.html"),
    ("/oracle", "oracle.html"),
];

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
struct MoviesQuery {
    pub q: Option<String>,
    pub filter: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct ProxyQuery {
    pub url: Option<String>,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn get_world(State(catalog): State<GuardedFilmCatalog>) -> Response {
    let films = catalog.get_catalog().await;
    Json(build_world_snapshot(&films)).into_response()
}

async fn get_movies(
    State(catalog): State<GuardedFilmCatalog>,
    Query(query): Query<MoviesQuery>,
) -> Response {
    let films = catalog.get_catalog().await;
    if query.q.is_none() && query.filter.is_none() {
        return Json(films.as_ref()).into_response();
    }

    let filter = query
        .filter
        .as_deref()
        .map(ExplorerFilter::from_name)
        .unwrap_or_default();
    Json(filter_films(&films, query.q.as_deref(), filter)).into_response()
}

async fn post_quiz(State(catalog): State<GuardedFilmCatalog>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!("Rejecting quiz body: {}", err);
            return error_response(StatusCode::BAD_REQUEST, format!("invalid JSON body: {}", err));
        }
    };

    match handle_quiz(&catalog, &payload).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_oracle(
    State(catalog): State<GuardedFilmCatalog>,
    Path(mood): Path<String>,
) -> Response {
    let films = catalog.get_catalog().await;
    match suggest(&films, &mood) {
        Some(suggestion) => Json(suggestion).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("unknown mood {}", mood)),
    }
}

async fn proxy_image(
    State(proxy): State<GuardedImageProxy>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let Some(url) = query.url.filter(|url| !url.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing url parameter");
    };

    match proxy.fetch_image(&url).await {
        Ok(image) => ([(header::CONTENT_TYPE, image.content_type)], image.content).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(
    config: ServerConfig,
    catalog: GuardedFilmCatalog,
    image_proxy: GuardedImageProxy,
) -> Router {
    let state = ServerState::new(config.clone(), catalog, image_proxy);

    let api_routes: Router = Router::new()
        .route("/world", get(get_world))
        .route("/movies", get(get_movies))
        .route("/quiz", post(post_quiz))
        .route("/oracle/{mood}", get(get_oracle))
        .with_state(state.clone());

    let proxy_routes: Router = Router::new()
        .route(PROXY_PATH, get(proxy_image))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let frontend_dir = PathBuf::from(frontend_path);
            let pages = PAGES.iter().fold(Router::new(), |router, (route, file)| {
                router.route_service(route, ServeFile::new(frontend_dir.join(file)))
            });
            let static_files_service =
                ServeDir::new(&frontend_dir).append_index_html_on_directories(true);
            pages.fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    #[allow(unused_mut)]
    let mut app: Router = home_router
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .merge(proxy_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app.layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Could not listen for the shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run_server(
    config: ServerConfig,
    catalog: GuardedFilmCatalog,
    image_proxy: GuardedImageProxy,
) -> Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    let metrics_address = format!("{}:{}", config.host, config.metrics_port);
    let app = make_app(config, catalog, image_proxy);

    let metrics_listener = TcpListener::bind(&metrics_address)
        .await
        .with_context(|| format!("Failed to bind metrics server to {}", metrics_address))?;
    let metrics_app = Router::new().route("/metrics", get(metrics_handler));
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });
    info!("Metrics available at {}/metrics", metrics_address);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind server to {}", address))?;
    info!("Ready to serve at {}!", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
