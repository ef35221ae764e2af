//! Deduplication and field normalization of raw film records.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::models::Film;
use crate::upstream::RawFilm;

/// Loose truthiness of the upstream data: null, false, "", 0 and empty
/// containers count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// The first truthy value among `keys`, in order.
fn first_truthy<'a>(raw: &'a RawFilm, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| is_truthy(value))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(raw: &RawFilm, keys: &[&str]) -> Option<String> {
    first_truthy(raw, keys).and_then(as_text)
}

fn lowered_key(raw: &RawFilm, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(as_text)
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty())
}

/// Lowercased trimmed `title`, if any.
pub fn title_key(raw: &RawFilm) -> Option<String> {
    lowered_key(raw, "title")
}

/// Lowercased trimmed `id`, falling back to the title key.
pub fn identity_key(raw: &RawFilm) -> Option<String> {
    lowered_key(raw, "id").or_else(|| title_key(raw))
}

/// Reads an optional integer without failing.
///
/// Integers are taken as-is and strings are trimmed and parsed in base 10.
/// Floats, booleans, null and unparseable text yield `None`.
pub fn parse_optional_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Turns the year into an integer only when its text is made of digits.
fn coerce_year(value: Option<&Value>) -> Value {
    let Some(value) = value else {
        return Value::Null;
    };
    let digits = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return value.clone(),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(year) = digits.parse::<i64>() {
            return Value::from(year);
        }
    }
    value.clone()
}

pub fn normalize_film(raw: &RawFilm) -> Film {
    let poster = text_field(raw, &["image", "movie_banner", "poster"]);
    let image = text_field(raw, &["image"]).or_else(|| poster.clone());

    Film {
        id: raw.get("id").and_then(as_text),
        title: text_field(raw, &["title", "name"]),
        year: coerce_year(first_truthy(raw, &["release_date", "releaseDate", "year"])),
        director: text_field(raw, &["director", "director_name"]).unwrap_or_default(),
        description: text_field(raw, &["description", "desc"]).unwrap_or_default(),
        image,
        poster,
        running_time: first_truthy(raw, &["running_time", "runningTime"])
            .cloned()
            .unwrap_or(Value::Null),
        rt_score: first_truthy(raw, &["rt_score", "rtScore"])
            .cloned()
            .unwrap_or(Value::Null),
        movie_banner: raw.get("movie_banner").and_then(as_text),
    }
}

/// Merges live records with fallback records.
///
/// Live records are keyed by identity; a later record replaces an earlier
/// one with the same key but keeps its position. Fallback records are only
/// added when neither their key nor their title has been seen.
pub fn merge_records(live: Vec<RawFilm>, fallback: &[RawFilm]) -> Vec<RawFilm> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, RawFilm> = HashMap::new();
    let mut titles_seen: HashSet<String> = HashSet::new();

    for raw in live {
        let Some(key) = identity_key(&raw) else {
            continue;
        };
        if let Some(title) = title_key(&raw) {
            titles_seen.insert(title);
        }
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, raw);
    }

    for extra in fallback {
        let Some(key) = identity_key(extra) else {
            continue;
        };
        let title = title_key(extra);
        if by_key.contains_key(&key) || title.as_ref().is_some_and(|t| titles_seen.contains(t)) {
            continue;
        }
        if let Some(title) = title {
            titles_seen.insert(title);
        }
        order.push(key.clone());
        by_key.insert(key, extra.clone());
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}
