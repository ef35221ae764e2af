//! Mood oracle: three films for a mood, drawn from the live catalog.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::Film;

/// Number of films suggested per mood.
pub const PICKS_PER_MOOD: usize = 3;

/// Blurb words this short are too common to search descriptions with.
const MIN_KEYWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodQuote {
    pub text: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    pub key: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub picks: [&'static str; 3],
    /// CSS background the oracle page paints behind the suggestion.
    pub palette: &'static str,
    pub quote: MoodQuote,
}

pub static MOODS: [Mood; 5] = [
    Mood {
        key: "cozy",
        title: "A blanket, some tea, and…",
        blurb: "Wholesome comfort stories full of warm kitchens, gentle friendships, and sleepy forest naps.",
        picks: ["My Neighbor Totoro", "Kiki's Delivery Service", "Whisper of the Heart"],
        palette: "linear-gradient(135deg, rgba(244,212,140,0.45), rgba(124,197,179,0.4))",
        quote: MoodQuote {
            text: "Whenever someone creates something with all of their heart, then that creation is given a soul.",
            source: "— The Cat Returns",
        },
    },
    Mood {
        key: "adventure",
        title: "Pack a satchel for adventure",
        blurb: "Airships, daring rescues, and windswept horizons await in these adventurous epics.",
        picks: ["Castle in the Sky", "Nausicaä of the Valley of the Wind", "Porco Rosso"],
        palette: "linear-gradient(135deg, rgba(148,183,226,0.55), rgba(124,197,179,0.45))",
        quote: MoodQuote {
            text: "You cannot change fate. However, you can rise to meet it.",
            source: "— Princess Mononoke",
        },
    },
    Mood {
        key: "whimsical",
        title: "Lose yourself in magic",
        blurb: "Slip into dreamlike worlds where trains run through the sea and castles roam the clouds.",
        picks: ["Spirited Away", "Howl's Moving Castle", "Ponyo"],
        palette: "linear-gradient(135deg, rgba(148,183,226,0.6), rgba(219,173,255,0.4))",
        quote: MoodQuote {
            text: "Life is a winking light in the darkness.",
            source: "— The Tale of the Princess Kaguya",
        },
    },
    Mood {
        key: "melancholy",
        title: "Bittersweet reflections",
        blurb: "Tender, thoughtful stories that linger with you long after the credits roll.",
        picks: ["When Marnie Was There", "Grave of the Fireflies", "The Wind Rises"],
        palette: "linear-gradient(135deg, rgba(148,183,226,0.4), rgba(102,119,163,0.45))",
        quote: MoodQuote {
            text: "Nothing that happens is ever forgotten, even if you can’t remember it.",
            source: "— Spirited Away",
        },
    },
    Mood {
        key: "uplifting",
        title: "Hope takes flight",
        blurb: "Optimistic tales that celebrate courage, community, and the kindness of small moments.",
        picks: [
            "From Up on Poppy Hill",
            "The Secret World of Arrietty",
            "The Tale of the Princess Kaguya",
        ],
        palette: "linear-gradient(135deg, rgba(124,197,179,0.55), rgba(244,212,140,0.5))",
        quote: MoodQuote {
            text: "Always believe in yourself. Do this and no matter where you are, you will have nothing to fear.",
            source: "— The Cat Returns",
        },
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSuggestion {
    pub mood: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub palette: &'static str,
    pub quote: MoodQuote,
    pub picks: Vec<Film>,
}

pub fn mood(key: &str) -> Option<&'static Mood> {
    MOODS.iter().find(|mood| mood.key == key)
}

/// Lowercases and strips diacritics, so "Nausicaä" folds to "nausicaa".
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn folded_title(film: &Film) -> String {
    fold(film.title_str())
}

/// Suggests up to three films for `key`, or `None` for an unknown mood.
///
/// The mood's own picks come first. When some are missing from the catalog
/// the rest are filled with films whose description mentions a long word of
/// the mood's blurb.
pub fn suggest(films: &[Film], key: &str) -> Option<MoodSuggestion> {
    let mood = mood(key)?;

    let mut picks: Vec<&Film> = mood
        .picks
        .iter()
        .filter_map(|title| {
            let target = fold(title);
            films.iter().find(|film| folded_title(film) == target)
        })
        .collect();

    if picks.len() < PICKS_PER_MOOD {
        let keywords: Vec<String> = mood
            .blurb
            .split([',', ' '])
            .filter(|word| !word.is_empty())
            .map(fold)
            .filter(|word| word.chars().count() >= MIN_KEYWORD_LEN)
            .collect();

        for film in films {
            if picks.len() >= PICKS_PER_MOOD {
                break;
            }
            let description = fold(&film.description);
            if !keywords.iter().any(|k| description.contains(k.as_str())) {
                continue;
            }
            let title = folded_title(film);
            if picks.iter().any(|picked| folded_title(picked) == title) {
                continue;
            }
            picks.push(film);
        }
    }

    Some(MoodSuggestion {
        mood: mood.key,
        title: mood.title,
        blurb: mood.blurb,
        palette: mood.palette,
        quote: mood.quote,
        picks: picks.into_iter().take(PICKS_PER_MOOD).cloned().collect(),
    })
}
