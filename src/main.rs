use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ghibli_world::cache::MemoryTtlCache;
use ghibli_world::catalog::{Film, FilmCatalog, CATALOG_TTL};
use ghibli_world::clock::{Clock, SystemClock};
use ghibli_world::config::{AppConfig, CliConfig, FileConfig, DEFAULT_HOST};
use ghibli_world::image_proxy::{ImageProxy, ProxiedImage, IMAGE_CACHE_TTL};
use ghibli_world::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use ghibli_world::upstream::{HttpUpstream, UPSTREAM_TIMEOUT};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values found there override the CLI ones.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The address to bind to.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The max-age advertised for proxied images, in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Film catalog endpoint. Repeat to merge several sources.
    #[clap(long = "catalog-url")]
    pub catalog_urls: Vec<String>,

    /// Proxied images kept in memory. Set to 0 for no limit.
    #[clap(long, default_value_t = ghibli_world::config::DEFAULT_IMAGE_CACHE_MAX_ENTRIES)]
    pub image_cache_max_entries: usize,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            host: args.host.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            frontend_dir_path: args.frontend_dir_path.clone(),
            catalog_urls: args.catalog_urls.clone(),
            image_cache_max_entries: args.image_cache_max_entries,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let upstream = Arc::new(HttpUpstream::new(UPSTREAM_TIMEOUT)?);

    info!("Catalog sources: {}", config.catalog_urls.join(", "));
    let catalog = FilmCatalog::new(
        upstream.clone(),
        config.catalog_urls.clone(),
        Arc::new(MemoryTtlCache::<(), Arc<Vec<Film>>>::new(
            CATALOG_TTL,
            clock.clone(),
        )),
    );

    let image_cache = MemoryTtlCache::<String, ProxiedImage>::new(IMAGE_CACHE_TTL, clock.clone())
        .with_max_entries(config.image_cache_max_entries);
    let image_proxy = ImageProxy::new(upstream, Arc::new(image_cache), clock);

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        host: config.host.clone(),
        port: config.port,
        metrics_port: config.metrics_port,
        content_cache_age_sec: config.content_cache_age_sec,
        frontend_dir_path: config.frontend_dir_path.clone(),
    };

    info!("Starting server on {}...", config.bind_address());
    run_server(server_config, Arc::new(catalog), Arc::new(image_proxy)).await
}
