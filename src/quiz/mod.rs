//! Personality quiz: answers in, archetype and film recommendations out.

mod matcher;
mod profiles;

pub use matcher::{build_recommendations, dominant_trait, normalized_title, Recommendation};
pub use profiles::{profile, ArchetypeProfile, DEFAULT_TRAIT, PROFILES};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Film, FilmCatalog};
use crate::image_proxy::to_proxy_url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("invalid quiz answers: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    #[serde(rename = "type")]
    pub trait_key: String,
    pub name: String,
    pub film: String,
    pub quote: String,
    pub film_image: Option<String>,
    /// Avatar shown next to the result.
    pub image: Option<String>,
    pub recommended: Vec<Recommendation>,
}

/// Extracts the trimmed, non-blank answers of a `{"answers": [...]}` payload.
pub fn parse_answers(payload: &Value) -> Result<Vec<String>, QuizError> {
    let Some(list) = payload.get("answers").and_then(Value::as_array) else {
        return Err(QuizError::InvalidInput(
            "answers must be a list of strings".to_string(),
        ));
    };

    let mut answers = Vec::with_capacity(list.len());
    for item in list {
        let Some(text) = item.as_str() else {
            return Err(QuizError::InvalidInput(format!(
                "answers must be strings, got {}",
                item
            )));
        };
        let text = text.trim();
        if !text.is_empty() {
            answers.push(text.to_string());
        }
    }

    if answers.is_empty() {
        return Err(QuizError::InvalidInput("no answers given".to_string()));
    }
    Ok(answers)
}

/// Builds the result for `answers` against an already fetched catalog.
pub fn match_quiz(films: &[Film], answers: &[String]) -> QuizResult {
    let trait_key = dominant_trait(answers);
    let profile = profile(trait_key)
        .or_else(|| profile(DEFAULT_TRAIT))
        .unwrap_or(&PROFILES[0]);

    let wanted = profile.film.to_lowercase();
    let matched = films
        .iter()
        .find(|film| film.title.as_deref().is_some_and(|t| t.to_lowercase() == wanted));

    let film_image = matched.and_then(Film::display_image).or(profile.image);
    let avatar = profile.image.or(film_image);

    QuizResult {
        trait_key: profile.key.to_string(),
        name: profile.name.to_string(),
        film: profile.film.to_string(),
        quote: profile.quote.to_string(),
        film_image: to_proxy_url(film_image),
        image: to_proxy_url(avatar),
        recommended: build_recommendations(films, profile.recommended, Some(profile.film)),
    }
}

pub async fn handle_quiz(catalog: &FilmCatalog, payload: &Value) -> Result<QuizResult, QuizError> {
    let answers = parse_answers(payload)?;
    let films = catalog.get_catalog().await;
    let result = match_quiz(&films, &answers);
    debug!("Quiz answered {:?} -> {}", answers, result.trait_key);
    Ok(result)
}
