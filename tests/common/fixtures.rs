//! In-memory upstreams for end-to-end tests
//!
//! The catalog and image hosts are faked so tests never touch the network.

use super::constants::*;
use async_trait::async_trait;
use bytes::Bytes;
use ghibli_world::upstream::{CatalogSource, ImageSource, RawFilm, UpstreamError, UpstreamImage};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn into_raw(records: Value) -> Vec<RawFilm> {
    serde_json::from_value(records).expect("Fixture records must be objects")
}

fn primary_records() -> Vec<RawFilm> {
    into_raw(json!([
        {
            "id": TOTORO_ID,
            "title": TOTORO_TITLE,
            "release_date": "1988",
            "director": "Hayao Miyazaki",
            "description": "Two sisters move to the country and befriend the forest spirits.",
            "image": TOTORO_IMAGE,
            "running_time": "86",
            "rt_score": "93"
        },
        {
            "id": "dc2e6bd1-8156-4886-adff-b39e6043af0c",
            "title": SPIRITED_AWAY_TITLE,
            "release_date": "2001",
            "director": "Hayao Miyazaki",
            "description": "A girl wanders into a world of gods and spirits.",
            "movie_banner": "https://images.test/spirited-banner.jpg",
            "running_time": "124",
            "rt_score": "97"
        },
        {
            "id": "5fdfb320-2a02-49a7-94ff-5ca418cae602",
            "title": MARNIE_TITLE,
            "release_date": "2014",
            "director": "Hiromasa Yonebayashi",
            "description": "A lonely girl spends a quiet summer by the marsh.",
            "running_time": "103",
            "rt_score": "92"
        }
    ]))
}

fn mirror_records() -> Vec<RawFilm> {
    into_raw(json!([
        {
            "id": TOTORO_ID,
            "title": TOTORO_TITLE,
            "release_date": "1988",
            "director": "Hayao Miyazaki",
            "description": "Two sisters move to the country and befriend the forest spirits.",
            "image": TOTORO_IMAGE,
            "running_time": "86",
            "rt_score": TOTORO_MIRROR_SCORE.to_string()
        },
        {
            "id": "ebbb6b7c-945c-41ee-a792-de0e43191bd8",
            "title": PORCO_TITLE,
            "release_date": "1992",
            "director": "Hayao Miyazaki",
            "description": "A cursed pilot fights sky pirates over the Adriatic.",
            "running_time": "94",
            "rt_score": "95"
        }
    ]))
}

/// Catalog host serving the fixture films, or failing every request.
pub struct FixtureCatalog {
    responses: HashMap<String, Vec<RawFilm>>,
    fail: bool,
    calls: AtomicUsize,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(PRIMARY_CATALOG_URL.to_string(), primary_records());
        responses.insert(MIRROR_CATALOG_URL.to_string(), mirror_records());
        Self {
            responses,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FixtureCatalog {
    async fn fetch_films(&self, url: &str) -> Result<Vec<RawFilm>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(UpstreamError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| UpstreamError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Image host answering with a tiny PNG, except for the failure fixtures.
pub struct FixtureImages {
    calls: AtomicUsize,
}

impl FixtureImages {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for FixtureImages {
    async fn fetch_image(
        &self,
        url: &str,
        max_bytes: usize,
    ) -> Result<UpstreamImage, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match url {
            MISSING_IMAGE_URL => Err(UpstreamError::Status {
                url: url.to_string(),
                status: 404,
            }),
            HUGE_IMAGE_URL => Err(UpstreamError::TooLarge {
                url: url.to_string(),
                limit: max_bytes,
            }),
            _ => Ok(UpstreamImage {
                content_type: Some("image/png".to_string()),
                body: Bytes::from_static(PNG_IMAGE_BYTES),
            }),
        }
    }
}

pub fn fixture_upstreams(failing_catalog: bool) -> (Arc<FixtureCatalog>, Arc<FixtureImages>) {
    let catalog = if failing_catalog {
        FixtureCatalog::failing()
    } else {
        FixtureCatalog::new()
    };
    (Arc::new(catalog), Arc::new(FixtureImages::new()))
}
