mod file_config;

pub use file_config::FileConfig;

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Proxied images kept in memory before the oldest is evicted.
pub const DEFAULT_IMAGE_CACHE_MAX_ENTRIES: usize = 512;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub catalog_urls: Vec<String>,
    pub image_cache_max_entries: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,

    // Upstreams
    pub catalog_urls: Vec<String>,
    /// Zero leaves the image cache unbounded.
    pub image_cache_max_entries: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let host = file
            .host
            .or_else(|| Some(cli.host.clone()))
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port != 0 && port == metrics_port {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        if let Some(dir) = &frontend_dir_path {
            let dir = PathBuf::from(dir);
            if !dir.exists() {
                bail!("Frontend directory does not exist: {:?}", dir);
            }
            if !dir.is_dir() {
                bail!("frontend_dir_path is not a directory: {:?}", dir);
            }
        }

        let mut catalog_urls = file
            .catalog_urls
            .unwrap_or_else(|| cli.catalog_urls.clone());
        if catalog_urls.is_empty() {
            catalog_urls.push(DEFAULT_CATALOG_URL.to_string());
        }
        for url in &catalog_urls {
            validate_catalog_url(url)?;
        }

        let image_cache_max_entries = file
            .image_cache_max_entries
            .unwrap_or(cli.image_cache_max_entries);

        Ok(Self {
            host,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            catalog_urls,
            image_cache_max_entries,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_catalog_url(url: &str) -> Result<()> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => bail!("Invalid catalog url {:?}: {}", url, err),
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Catalog url must use http or https: {:?}", url);
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        bail!("Catalog url has no host: {:?}", url);
    }
    Ok(())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
