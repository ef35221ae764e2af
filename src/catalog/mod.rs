//! The film catalog: upstream records merged with fallback films,
//! de-duplicated, normalized and cached.

mod fallback;
pub mod filter;
pub mod models;
pub mod normalize;
mod store;

pub use fallback::fallback_films;
pub use filter::{filter_films, ExplorerFilter};
pub use models::Film;
pub use normalize::parse_optional_int;
pub use store::{CatalogCache, FilmCatalog, CATALOG_TTL, DEFAULT_CATALOG_URL};
