//! Ghibli World Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod image_proxy;
pub mod oracle;
pub mod quiz;
pub mod server;
pub mod upstream;
pub mod world;

// Re-export commonly used types for convenience
pub use catalog::{Film, FilmCatalog};
pub use image_proxy::ImageProxy;
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use upstream::{CatalogSource, HttpUpstream, ImageSource};
