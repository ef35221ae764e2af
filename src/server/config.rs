use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Max-age advertised on proxied images.
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            host: "127.0.0.1".to_string(),
            port: 8000,
            metrics_port: 9091,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
        }
    }
}
