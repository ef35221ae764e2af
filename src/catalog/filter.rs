//! Text search and preset filters for the film explorer.

use serde_json::Value;

use super::models::Film;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplorerFilter {
    #[default]
    All,
    /// Rotten Tomatoes score of at least 90.
    Rt90,
    /// Released before 2000.
    Classic,
    /// Released in 2000 or later.
    Modern,
}

impl ExplorerFilter {
    /// Unknown names select every film.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "rt90" => ExplorerFilter::Rt90,
            "classic" => ExplorerFilter::Classic,
            "modern" => ExplorerFilter::Modern,
            _ => ExplorerFilter::All,
        }
    }

    fn matches(&self, film: &Film) -> bool {
        match self {
            ExplorerFilter::All => true,
            ExplorerFilter::Rt90 => leading_int(&film.rt_score).is_some_and(|score| score >= 90),
            ExplorerFilter::Classic => leading_int(&film.year).is_some_and(|year| year < 2000),
            ExplorerFilter::Modern => leading_int(&film.year).is_some_and(|year| year >= 2000),
        }
    }
}

/// Reads the integer prefix of a value, so `"1986-07-01"` gives 1986.
fn leading_int(value: &Value) -> Option<i64> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    let text = text.trim_start();
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn year_text(year: &Value) -> Option<String> {
    match year {
        Value::Number(n) if n.as_i64() != Some(0) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn matches_query(film: &Film, query: &str) -> bool {
    let fields = [
        film.title.clone(),
        Some(film.description.clone()),
        Some(film.director.clone()),
        year_text(&film.year),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(query))
}

/// Films matching the free-text `query` and the preset `filter`, in catalog order.
pub fn filter_films(films: &[Film], query: Option<&str>, filter: ExplorerFilter) -> Vec<Film> {
    let query = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    films
        .iter()
        .filter(|film| query.is_empty() || matches_query(film, &query))
        .filter(|film| filter.matches(film))
        .cloned()
        .collect()
}
