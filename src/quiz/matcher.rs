use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::profiles::{profile, DEFAULT_TRAIT};
use crate::catalog::Film;
use crate::image_proxy::to_proxy_url;

/// A recommended film, resolved against the catalog when possible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recommendation {
    Resolved {
        title: Option<String>,
        year: Value,
        director: String,
        image: Option<String>,
    },
    Stub {
        title: String,
    },
}

/// The most frequent answer; ties go to the answer seen first.
///
/// Blank answers are ignored. Falls back to `curious` when nothing is left
/// or the winner is not a known trait.
pub fn dominant_trait(answers: &[String]) -> &'static str {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for answer in answers.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
        match tally.iter_mut().find(|(seen, _)| *seen == answer) {
            Some((_, count)) => *count += 1,
            None => tally.push((answer, 1)),
        }
    }

    let winner = tally
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (answer, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((answer, count)),
        });

    winner
        .and_then(|(answer, _)| profile(answer))
        .map_or(DEFAULT_TRAIT, |p| p.key)
}

/// Lowercase alphanumerics only, so `"Kiki's Delivery Service"` and
/// `"kikis delivery service"` compare equal.
pub fn normalized_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn resolve(film: &Film) -> Recommendation {
    Recommendation::Resolved {
        title: film.title.clone(),
        year: film.year.clone(),
        director: film.director.clone(),
        image: to_proxy_url(film.display_image()),
    }
}

/// Resolves `titles` against the catalog, in order.
///
/// Blank titles, repeats and `exclude` are skipped, matching either by
/// lowercased or by normalized title. Titles missing from the catalog are
/// kept as bare stubs.
pub fn build_recommendations(
    films: &[Film],
    titles: &[&str],
    exclude: Option<&str>,
) -> Vec<Recommendation> {
    let mut by_lower: HashMap<String, &Film> = HashMap::new();
    let mut by_normalized: HashMap<String, &Film> = HashMap::new();
    for film in films {
        let Some(title) = film.title.as_deref() else {
            continue;
        };
        by_lower.entry(title.to_lowercase()).or_insert(film);
        let normalized = normalized_title(title);
        if !normalized.is_empty() {
            by_normalized.entry(normalized).or_insert(film);
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    if let Some(excluded) = exclude {
        seen.insert(excluded.trim().to_lowercase());
        seen.insert(normalized_title(excluded));
    }
    seen.remove("");

    let mut picks = Vec::new();
    for title in titles.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let lower = title.to_lowercase();
        let normalized = normalized_title(title);
        if seen.contains(&lower) || (!normalized.is_empty() && seen.contains(&normalized)) {
            continue;
        }

        let found = by_lower
            .get(&lower)
            .or_else(|| by_normalized.get(&normalized))
            .copied();
        picks.push(match found {
            Some(film) => resolve(film),
            None => Recommendation::Stub {
                title: title.to_string(),
            },
        });

        seen.insert(lower);
        if !normalized.is_empty() {
            seen.insert(normalized);
        }
    }
    picks
}
