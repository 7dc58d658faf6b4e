use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The two kinds of content the catalog serves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl Category {
    /// Path segment the catalog uses for this category.
    pub fn api_segment(self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Series => "tv",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_segment())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Category::Movie),
            "tv" | "series" => Ok(Category::Series),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Identity of a catalog entry for user preferences.
///
/// Catalog ids are only unique within a category, so the key pairs the two.
/// Stored as `"<category>:<id>"`, e.g. `"movie:550"` or `"tv:1399"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ItemKey {
    pub category: Category,
    pub id: i64,
}

impl ItemKey {
    pub fn new(category: Category, id: i64) -> Self {
        Self { category, id }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.id)
    }
}

impl FromStr for ItemKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, id) = s
            .split_once(':')
            .ok_or_else(|| format!("item key '{}' has no category", s))?;
        let id = id
            .parse()
            .map_err(|_| format!("item key '{}' has a non-numeric id", s))?;
        Ok(Self::new(category.parse()?, id))
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ItemKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A catalog entry normalized from either a movie or a series record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: i64,
    /// In catalog order; may reference ids missing from the genre list.
    pub genre_ids: Vec<i64>,
    // Movie only
    pub runtime_minutes: Option<u32>,
    // Series only
    pub episode_runtime_minutes: Option<u32>,
    pub season_count: Option<u32>,
}

impl ContentItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category, self.id)
    }

    /// Full poster URL, given the image host prefix.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| format!("{}{}", image_base_url, p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Lightweight entry for the live search dropdown. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: Category,
    pub id: i64,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
}

impl Suggestion {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.category, self.id)
    }
}

impl From<&ContentItem> for Suggestion {
    fn from(item: &ContentItem) -> Self {
        Self {
            category: item.category,
            id: item.id,
            title: item.title.clone(),
            release_date: item.release_date,
            vote_average: Some(item.vote_average),
            poster_path: item.poster_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_key_round_trips_through_its_string_form() {
        let key = ItemKey::new(Category::Series, 1399);
        assert_eq!(key.to_string(), "tv:1399");
        assert_eq!("tv:1399".parse::<ItemKey>(), Ok(key));
    }

    #[test]
    fn item_keys_with_same_id_differ_across_categories() {
        assert_ne!(ItemKey::new(Category::Movie, 7), ItemKey::new(Category::Series, 7));
    }

    #[test]
    fn bare_numeric_key_is_rejected() {
        assert!("550".parse::<ItemKey>().is_err());
        assert!("movie:abc".parse::<ItemKey>().is_err());
        assert!("anime:1".parse::<ItemKey>().is_err());
    }

    #[test]
    fn category_accepts_aliases() {
        assert_eq!("series".parse::<Category>(), Ok(Category::Series));
        assert_eq!("Movies".parse::<Category>(), Ok(Category::Movie));
    }

    #[test]
    fn item_key_serializes_as_string() {
        let json = serde_json::to_string(&ItemKey::new(Category::Movie, 550)).unwrap();
        assert_eq!(json, "\"movie:550\"");
    }

    #[test]
    fn poster_url_joins_base_and_path() {
        let mut item = crate::api::fake::sample_item(Category::Series, 1399, "Dark");
        assert_eq!(item.poster_url("https://image.tmdb.org/t/p/w500"), None);

        item.poster_path = Some("/apbrbWs8M9lyOpJYU5WXrpFbk1Z.jpg".into());
        assert_eq!(
            item.poster_url("https://image.tmdb.org/t/p/w500").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/apbrbWs8M9lyOpJYU5WXrpFbk1Z.jpg")
        );
        assert_eq!(Suggestion::from(&item).key(), ItemKey::new(Category::Series, 1399));
    }
}
