//! Display strings derived from catalog data.

use chrono::{Datelike, NaiveDate};

use crate::models::{Category, ContentItem, Genre};

const DEFAULT_EPISODE_RUNTIME: u32 = 45;

pub fn format_year(date: Option<NaiveDate>) -> String {
    date.map(|d| d.year().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_release_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// `2h 19min` for movies; `3 seasons • 50min/ep` for series. Series without
/// data are shown as one season of 45 minute episodes.
pub fn format_duration(item: &ContentItem) -> String {
    match item.category {
        Category::Movie => match item.runtime_minutes {
            Some(runtime) if runtime > 0 => format!("{}h {}min", runtime / 60, runtime % 60),
            _ => String::new(),
        },
        Category::Series => {
            let runtime = item
                .episode_runtime_minutes
                .filter(|r| *r > 0)
                .unwrap_or(DEFAULT_EPISODE_RUNTIME);
            let seasons = item.season_count.filter(|s| *s > 0).unwrap_or(1);
            let plural = if seasons > 1 { "s" } else { "" };
            format!("{} season{} • {}min/ep", seasons, plural, runtime)
        }
    }
}

/// Names for `genre_ids` in order; ids missing from `genres` are skipped.
pub fn genre_names(genre_ids: &[i64], genres: &[Genre]) -> String {
    genre_ids
        .iter()
        .filter_map(|id| genres.iter().find(|g| g.id == *id))
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_title(item: &ContentItem) -> &str {
    if item.title.is_empty() {
        "Untitled"
    } else {
        &item.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::sample_item;

    #[test]
    fn movie_runtime_is_hours_and_minutes() {
        let mut item = sample_item(Category::Movie, 1, "Fight Club");
        item.runtime_minutes = Some(139);
        assert_eq!(format_duration(&item), "2h 19min");

        item.runtime_minutes = None;
        assert_eq!(format_duration(&item), "");
    }

    #[test]
    fn series_duration_uses_defaults() {
        let mut item = sample_item(Category::Series, 1, "Lost");
        assert_eq!(format_duration(&item), "1 season • 45min/ep");

        item.season_count = Some(6);
        item.episode_runtime_minutes = Some(42);
        assert_eq!(format_duration(&item), "6 seasons • 42min/ep");
    }

    #[test]
    fn dates_and_years() {
        let date = NaiveDate::from_ymd_opt(1999, 10, 15);
        assert_eq!(format_year(date), "1999");
        assert_eq!(format_release_date(date), "15/10/1999");
        assert_eq!(format_year(None), "N/A");
        assert_eq!(format_release_date(None), "N/A");
    }

    #[test]
    fn unknown_genre_ids_are_skipped() {
        let genres = vec![
            Genre { id: 18, name: "Drama".into() },
            Genre { id: 53, name: "Thriller".into() },
        ];
        assert_eq!(genre_names(&[53, 999, 18], &genres), "Thriller, Drama");
        assert_eq!(genre_names(&[], &genres), "");
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(display_title(&sample_item(Category::Movie, 1, "")), "Untitled");
    }
}
