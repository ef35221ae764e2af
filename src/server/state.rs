use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::FilmCatalog;
use crate::image_proxy::ImageProxy;

use super::ServerConfig;

pub type GuardedFilmCatalog = Arc<FilmCatalog>;
pub type GuardedImageProxy = Arc<ImageProxy>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedFilmCatalog,
    pub image_proxy: GuardedImageProxy,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog: GuardedFilmCatalog,
        image_proxy: GuardedImageProxy,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog,
            image_proxy,
        }
    }
}

impl FromRef<ServerState> for GuardedFilmCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedImageProxy {
    fn from_ref(input: &ServerState) -> Self {
        input.image_proxy.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
