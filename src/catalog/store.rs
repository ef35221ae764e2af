use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::fallback::fallback_films;
use super::models::Film;
use super::normalize::{merge_records, normalize_film};
use crate::cache::TtlCache;
use crate::server::metrics::{record_cache_lookup, set_catalog_films};
use crate::upstream::{fetch_all_films, CatalogSource, RawFilm};

/// How long a computed catalog is served before the next request refetches.
pub const CATALOG_TTL: Duration = Duration::from_secs(600);

/// Public film API queried when no source is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://ghibliapi.vercel.app/films";

pub type CatalogCache = dyn TtlCache<(), Arc<Vec<Film>>>;

/// The de-duplicated, normalized film catalog, recomputed when its cache
/// entry expires.
pub struct FilmCatalog {
    source: Arc<dyn CatalogSource>,
    source_urls: Vec<String>,
    cache: Arc<CatalogCache>,
    fallback: Vec<RawFilm>,
}

impl FilmCatalog {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        source_urls: Vec<String>,
        cache: Arc<CatalogCache>,
    ) -> Self {
        Self {
            source,
            source_urls,
            cache,
            fallback: fallback_films(),
        }
    }

    /// Replaces the built-in fallback films.
    pub fn with_fallback(mut self, fallback: Vec<RawFilm>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn source_urls(&self) -> &[String] {
        &self.source_urls
    }

    /// Returns the cached catalog, or rebuilds it from the sources.
    ///
    /// Never fails: unreachable sources only shrink the result, down to the
    /// fallback films. An empty catalog is never served from the cache.
    pub async fn get_catalog(&self) -> Arc<Vec<Film>> {
        if let Some(films) = self.cache.get(&()).filter(|films| !films.is_empty()) {
            record_cache_lookup("catalog", true);
            return films;
        }
        record_cache_lookup("catalog", false);

        let live = fetch_all_films(self.source.as_ref(), &self.source_urls).await;
        let live_count = live.len();
        let merged = merge_records(live, &self.fallback);
        let films: Arc<Vec<Film>> = Arc::new(merged.iter().map(normalize_film).collect());

        info!(
            "Catalog rebuilt: {} films from {} live records",
            films.len(),
            live_count
        );
        set_catalog_films(films.len());

        self.cache.insert((), films.clone());
        films
    }
}
