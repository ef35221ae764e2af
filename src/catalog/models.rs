use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A film after normalization.
///
/// `year`, `running_time` and `rt_score` keep whatever JSON value the
/// upstream supplied unless it could be cleanly read as an integer, so a
/// non-numeric year stays a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: Option<String>,
    pub title: Option<String>,
    pub year: Value,
    pub director: String,
    pub description: String,
    pub image: Option<String>,
    pub poster: Option<String>,
    pub running_time: Value,
    pub rt_score: Value,
    pub movie_banner: Option<String>,
}

impl Film {
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// First available picture among image, poster and banner.
    pub fn display_image(&self) -> Option<&str> {
        [&self.image, &self.poster, &self.movie_banner]
            .into_iter()
            .filter_map(|url| url.as_deref())
            .find(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film() -> Film {
        Film {
            id: Some("1".to_string()),
            title: Some("Ponyo".to_string()),
            year: Value::from(2008),
            director: "Hayao Miyazaki".to_string(),
            description: String::new(),
            image: None,
            poster: None,
            running_time: Value::Null,
            rt_score: Value::Null,
            movie_banner: None,
        }
    }

    #[test]
    fn display_image_falls_through_the_chain() {
        let mut f = film();
        assert_eq!(f.display_image(), None);

        f.movie_banner = Some("banner.jpg".to_string());
        assert_eq!(f.display_image(), Some("banner.jpg"));

        f.poster = Some(String::new());
        assert_eq!(f.display_image(), Some("banner.jpg"));

        f.poster = Some("poster.jpg".to_string());
        assert_eq!(f.display_image(), Some("poster.jpg"));

        f.image = Some("image.jpg".to_string());
        assert_eq!(f.display_image(), Some("image.jpg"));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(film()).unwrap();
        assert_eq!(json["title"], "Ponyo");
        assert_eq!(json["year"], 2008);
        assert!(json["rt_score"].is_null());
        assert!(json.get("movie_banner").is_some());
    }
}
