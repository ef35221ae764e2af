//! Shared constants for end-to-end tests
//!
//! When the fixture films change, update only this file and `fixtures.rs`.

// ============================================================================
// Catalog Sources
// ============================================================================

/// First catalog source, serving the bulk of the fixture films.
pub const PRIMARY_CATALOG_URL: &str = "http://films.test/films";

/// Second catalog source, re-publishing one film with fresher data.
pub const MIRROR_CATALOG_URL: &str = "http://mirror.test/films";

// ============================================================================
// Fixture Films
// ============================================================================

pub const TOTORO_ID: &str = "58611129-2dbc-4a81-a72f-77ddfc1b1b49";
pub const TOTORO_TITLE: &str = "My Neighbor Totoro";
pub const TOTORO_IMAGE: &str = "https://images.test/totoro.jpg";

/// Rotten Tomatoes score the mirror publishes for Totoro, replacing the primary's.
pub const TOTORO_MIRROR_SCORE: i64 = 94;

pub const SPIRITED_AWAY_TITLE: &str = "Spirited Away";
pub const MARNIE_TITLE: &str = "When Marnie Was There";
pub const PORCO_TITLE: &str = "Porco Rosso";

/// Always merged in from the built-in fallback films.
pub const HERON_TITLE: &str = "The Boy and the Heron";

/// Films served when both sources answer: four fixtures plus the fallback.
pub const FIXTURE_FILM_COUNT: usize = 5;

// ============================================================================
// Images
// ============================================================================

pub const PNG_IMAGE_URL: &str = "https://images.test/poster.png";

/// Answered by the fake image host with a 404.
pub const MISSING_IMAGE_URL: &str = "https://images.test/missing.png";

/// Answered by the fake image host as exceeding the size limit.
pub const HUGE_IMAGE_URL: &str = "https://images.test/huge.png";

pub const PNG_IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
