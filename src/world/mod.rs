//! Aggregate statistics over the film catalog.

use serde::Serialize;

use crate::catalog::{parse_optional_int, Film};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub quote: &'static str,
    pub source: &'static str,
}

pub const QUOTES: [Quote; 6] = [
    Quote {
        quote: "Life is a winking light in the darkness.",
        source: "The Tale of the Princess Kaguya",
    },
    Quote {
        quote: "You cannot change fate. However, you can rise to meet it.",
        source: "Princess Mononoke",
    },
    Quote {
        quote: "Whenever someone creates something with all of their heart, then that creation is given a soul.",
        source: "The Cat Returns",
    },
    Quote {
        quote: "See with eyes unclouded by hate.",
        source: "Princess Mononoke",
    },
    Quote {
        quote: "Nothing that happens is ever forgotten, even if you can’t remember it.",
        source: "Spirited Away",
    },
    Quote {
        quote: "Always believe in yourself. Do this and no matter where you are, you will have nothing to fear.",
        source: "The Cat Returns",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counts {
    pub films: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub title: Option<String>,
    pub year: i64,
    pub rt_score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub counts: Counts,
    pub top_rated: Option<Film>,
    pub newest: Option<Film>,
    pub oldest: Option<Film>,
    pub timeline: Vec<TimelineEntry>,
    pub average_rt_score: Option<f64>,
    pub total_runtime_minutes: i64,
    pub first_year: Option<i64>,
    pub latest_year: Option<i64>,
    pub quotes: Vec<Quote>,
}

/// Unknown scores rank below every real one.
fn rt_score(film: &Film) -> i64 {
    parse_optional_int(&film.rt_score).unwrap_or(-1)
}

/// 0 stands for an unknown year.
fn year_value(film: &Film) -> i64 {
    parse_optional_int(&film.year).unwrap_or(0)
}

/// Maximum by `key`, keeping the first film among equals.
fn first_max<'a>(films: impl Iterator<Item = &'a Film>, key: fn(&Film) -> i64) -> Option<&'a Film> {
    films.fold(None, |best: Option<&Film>, film| match best {
        Some(current) if key(current) >= key(film) => Some(current),
        _ => Some(film),
    })
}

/// Minimum by `key`, keeping the first film among equals.
fn first_min<'a>(films: impl Iterator<Item = &'a Film>, key: fn(&Film) -> i64) -> Option<&'a Film> {
    films.fold(None, |best: Option<&Film>, film| match best {
        Some(current) if key(current) <= key(film) => Some(current),
        _ => Some(film),
    })
}

/// Rounds to one decimal from the exact binary value of `value`, so 80.35
/// (stored just below) gives 80.3.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

pub fn build_world_snapshot(films: &[Film]) -> WorldSnapshot {
    let top_rated = first_max(films.iter(), rt_score).cloned();
    let newest = first_max(films.iter(), year_value).cloned();
    let oldest = first_min(films.iter().filter(|f| year_value(f) != 0), year_value).cloned();

    let mut timeline: Vec<TimelineEntry> = films
        .iter()
        .filter(|f| year_value(f) != 0)
        .map(|f| TimelineEntry {
            title: f.title.clone(),
            year: year_value(f),
            rt_score: parse_optional_int(&f.rt_score),
        })
        .collect();
    timeline.sort_by_key(|entry| entry.year);

    let scores: Vec<i64> = films.iter().map(rt_score).filter(|s| *s >= 0).collect();
    let average_rt_score = if scores.is_empty() {
        None
    } else {
        let sum: i64 = scores.iter().sum();
        Some(round_one_decimal(sum as f64 / scores.len() as f64))
    };

    let total_runtime_minutes = films
        .iter()
        .filter_map(|f| parse_optional_int(&f.running_time))
        .sum();

    WorldSnapshot {
        counts: Counts { films: films.len() },
        top_rated,
        newest,
        oldest,
        first_year: timeline.first().map(|entry| entry.year),
        latest_year: timeline.last().map(|entry| entry.year),
        timeline,
        average_rt_score,
        total_runtime_minutes,
        quotes: QUOTES.to_vec(),
    }
}
