//! View pipeline: tab filter, then a stable sort, over the current feed.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{Category, ContentItem, ItemKey};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Discover,
    Favorites,
    Watchlist,
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discover" => Ok(Tab::Discover),
            "favorites" => Ok(Tab::Favorites),
            "watchlist" => Ok(Tab::Watchlist),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// Feed ordering. Names outside the known set parse to `Unsorted`, which
/// keeps catalog order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    Newest,
    Oldest,
    Unsorted,
}

impl SortKey {
    pub fn parse(name: &str) -> Self {
        match name {
            "popularity" => SortKey::Popularity,
            "rating" => SortKey::Rating,
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            _ => SortKey::Unsorted,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Unsorted => "unsorted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewLayout {
    #[default]
    Grid,
    List,
}

/// Transient selection state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_category: Category,
    pub active_tab: Tab,
    pub sort_key: SortKey,
    pub view_layout: ViewLayout,
    pub selected_genre_id: Option<i64>,
    pub search_query: String,
    pub selected_detail_item: Option<ContentItem>,
}

/// Why a rendered list came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyFeed {
    NoResults,
    NoFavorites,
    EmptyWatchlist,
}

impl EmptyFeed {
    pub fn for_tab(tab: Tab) -> Self {
        match tab {
            Tab::Discover => EmptyFeed::NoResults,
            Tab::Favorites => EmptyFeed::NoFavorites,
            Tab::Watchlist => EmptyFeed::EmptyWatchlist,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EmptyFeed::NoResults => "No results found.",
            EmptyFeed::NoFavorites => "No favorites added yet.",
            EmptyFeed::EmptyWatchlist => "Your watchlist is empty.",
        }
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn date_or_epoch(item: &ContentItem) -> NaiveDate {
    item.release_date.unwrap_or_else(epoch)
}

fn compare(a: &ContentItem, b: &ContentItem, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::Popularity => b.popularity.total_cmp(&a.popularity),
        SortKey::Rating => b.vote_average.total_cmp(&a.vote_average),
        SortKey::Newest => date_or_epoch(b).cmp(&date_or_epoch(a)),
        SortKey::Oldest => date_or_epoch(a).cmp(&date_or_epoch(b)),
        SortKey::Unsorted => Ordering::Equal,
    }
}

/// Composes the displayed list. Pure; the input feed is left untouched.
pub fn render(
    items: &[ContentItem],
    tab: Tab,
    favorites: &BTreeSet<ItemKey>,
    watchlist: &BTreeSet<ItemKey>,
    sort_key: SortKey,
) -> Vec<ContentItem> {
    let mut shown: Vec<ContentItem> = items
        .iter()
        .filter(|item| match tab {
            Tab::Discover => true,
            Tab::Favorites => favorites.contains(&item.key()),
            Tab::Watchlist => watchlist.contains(&item.key()),
        })
        .cloned()
        .collect();

    // sort_by is stable, so ties keep feed order.
    shown.sort_by(|a, b| compare(a, b, sort_key));
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::sample_item;

    fn movie(id: i64, popularity: f64) -> ContentItem {
        ContentItem {
            popularity,
            ..sample_item(Category::Movie, id, &format!("movie {}", id))
        }
    }

    fn dated(id: i64, date: Option<(i32, u32, u32)>) -> ContentItem {
        ContentItem {
            release_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..movie(id, 0.0)
        }
    }

    fn ids(items: &[ContentItem]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn popularity_sorts_descending() {
        let feed = vec![movie(1, 10.0), movie(2, 50.0)];
        let shown = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Popularity);
        assert_eq!(ids(&shown), vec![2, 1]);
    }

    #[test]
    fn favorites_tab_keeps_only_favorites() {
        let feed = vec![movie(1, 10.0), movie(2, 50.0)];
        let favorites = BTreeSet::from([ItemKey::new(Category::Movie, 1)]);
        let shown = render(&feed, Tab::Favorites, &favorites, &BTreeSet::new(), SortKey::Popularity);
        assert_eq!(ids(&shown), vec![1]);
    }

    #[test]
    fn watchlist_tab_matches_on_category_too() {
        let feed = vec![movie(1, 0.0), movie(2, 0.0)];
        let watchlist = BTreeSet::from([
            ItemKey::new(Category::Series, 1),
            ItemKey::new(Category::Movie, 2),
        ]);
        let shown = render(&feed, Tab::Watchlist, &BTreeSet::new(), &watchlist, SortKey::Popularity);
        assert_eq!(ids(&shown), vec![2]);
    }

    #[test]
    fn rating_sort_is_stable_for_ties() {
        let mut feed: Vec<ContentItem> = (1..=4).map(|id| movie(id, 0.0)).collect();
        feed[0].vote_average = 7.0;
        feed[1].vote_average = 9.0;
        feed[2].vote_average = 7.0;
        feed[3].vote_average = 9.0;

        let once = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Rating);
        assert_eq!(ids(&once), vec![2, 4, 1, 3]);

        let twice = render(&once, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Rating);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_dates_sort_as_epoch() {
        let feed = vec![
            dated(1, Some((2001, 5, 1))),
            dated(2, None),
            dated(3, Some((1965, 1, 1))),
            dated(4, Some((2020, 12, 31))),
        ];

        let newest = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Newest);
        assert_eq!(ids(&newest), vec![4, 1, 2, 3]);

        let oldest = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Oldest);
        assert_eq!(ids(&oldest), vec![3, 2, 1, 4]);
    }

    #[test]
    fn missing_date_sits_exactly_at_1970() {
        let feed = vec![
            dated(1, Some((1970, 1, 2))),
            dated(2, Some((1969, 12, 31))),
            dated(3, None),
        ];

        let oldest = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::Oldest);
        assert_eq!(ids(&oldest), vec![2, 3, 1]);
        assert_eq!(date_or_epoch(&feed[2]).to_string(), "1970-01-01");
    }

    #[test]
    fn unknown_sort_key_keeps_feed_order() {
        let feed = vec![movie(1, 1.0), movie(2, 3.0), movie(3, 2.0)];
        let shown = render(&feed, Tab::Discover, &BTreeSet::new(), &BTreeSet::new(), SortKey::parse("title"));
        assert_eq!(ids(&shown), vec![1, 2, 3]);
    }

    #[test]
    fn empty_feed_reason_follows_tab() {
        assert_eq!(EmptyFeed::for_tab(Tab::Watchlist), EmptyFeed::EmptyWatchlist);
        assert!(!EmptyFeed::NoResults.message().is_empty());
    }
}
