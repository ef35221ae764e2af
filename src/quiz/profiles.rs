/// A personality archetype the quiz can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeProfile {
    pub key: &'static str,
    pub name: &'static str,
    /// Title of the film the archetype is drawn from.
    pub film: &'static str,
    pub quote: &'static str,
    /// Avatar used instead of the film's own picture.
    pub image: Option<&'static str>,
    pub recommended: &'static [&'static str],
}

/// Trait assigned when the answers give nothing usable.
pub const DEFAULT_TRAIT: &str = "curious";

pub static PROFILES: [ArchetypeProfile; 7] = [
    ArchetypeProfile {
        key: "calm",
        name: "The Forest Keeper",
        film: "My Neighbor Totoro",
        quote: "Everybody, try laughing. Then whatever scares you will go away.",
        image: Some("https://image.tmdb.org/t/p/w600_and_h900_bestv2/rtGDOeG9LzoerkDGZF9dnVeLppL.jpg"),
        recommended: &[
            "Kiki's Delivery Service",
            "Whisper of the Heart",
            "Only Yesterday",
            "The Secret World of Arrietty",
        ],
    },
    ArchetypeProfile {
        key: "curious",
        name: "The Wandering Explorer",
        film: "Spirited Away",
        quote: "Once you've met someone you never really forget them.",
        image: None,
        recommended: &[
            "Castle in the Sky",
            "The Cat Returns",
            "Ponyo",
            "Howl's Moving Castle",
        ],
    },
    ArchetypeProfile {
        key: "romantic",
        name: "The Dreamy Heart",
        film: "Howl's Moving Castle",
        quote: "A heart's a heavy burden.",
        image: None,
        recommended: &[
            "Whisper of the Heart",
            "From Up on Poppy Hill",
            "Porco Rosso",
            "The Wind Rises",
        ],
    },
    ArchetypeProfile {
        key: "mysterious",
        name: "The Spirit Whisperer",
        film: "Princess Mononoke",
        quote: "See with eyes unclouded by hate.",
        image: None,
        recommended: &[
            "Spirited Away",
            "When Marnie Was There",
            "Tales from Earthsea",
            "The Tale of the Princess Kaguya",
        ],
    },
    ArchetypeProfile {
        key: "kind",
        name: "The Gentle Helper",
        film: "Kiki's Delivery Service",
        quote: "We each need to find our own inspiration. Sometimes it's not easy.",
        image: None,
        recommended: &[
            "My Neighbor Totoro",
            "Ponyo",
            "The Secret World of Arrietty",
            "My Neighbors the Yamadas",
        ],
    },
    ArchetypeProfile {
        key: "brave",
        name: "The Fearless Guardian",
        film: "Nausicaä of the Valley of the Wind",
        quote: "Don't be afraid. I just want to be friends.",
        image: None,
        recommended: &[
            "Princess Mononoke",
            "Castle in the Sky",
            "Pom Poko",
            "The Boy and the Heron",
        ],
    },
    ArchetypeProfile {
        key: "determined",
        name: "The Steadfast Dreamer",
        film: "The Wind Rises",
        quote: "The wind is rising! We must try to live!",
        image: None,
        recommended: &[
            "Porco Rosso",
            "Grave of the Fireflies",
            "Whisper of the Heart",
            "Kiki's Delivery Service",
        ],
    },
];

pub fn profile(key: &str) -> Option<&'static ArchetypeProfile> {
    PROFILES.iter().find(|profile| profile.key == key)
}
