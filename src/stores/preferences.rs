//! Persisted user preferences: favorites, watchlist, ratings and theme.
//!
//! Loaded once from a [`KeyValueStore`] and written through after every
//! mutation, one collection at a time. Storage trouble never reaches the
//! caller: a failed read falls back to the empty default and a failed write
//! is logged and otherwise ignored.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::db::KeyValueStore;
use crate::error::{BrowserError, StorageError};
use crate::models::ItemKey;

pub const RATINGS_KEY: &str = "ratings";
pub const FAVORITES_KEY: &str = "favorites";
pub const WATCHLIST_KEY: &str = "watchlist";
pub const DARK_MODE_KEY: &str = "dark_mode";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    pub favorites: BTreeSet<ItemKey>,
    pub watchlist: BTreeSet<ItemKey>,
    pub ratings: BTreeMap<ItemKey, u8>,
    pub dark_mode: bool,
}

fn read_json<S: KeyValueStore>(storage: &S, key: &str) -> Result<Option<Value>, StorageError> {
    match storage.read(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Reads a value, degrading to `None` (and so to the default) on any error.
fn read_or_default<S: KeyValueStore>(storage: &S, key: &str) -> Option<Value> {
    match read_json(storage, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read preference, using default");
            None
        }
    }
}

fn parse_key(raw: &str, collection: &str) -> Option<ItemKey> {
    match raw.parse::<ItemKey>() {
        Ok(key) => Some(key),
        Err(_) if raw.parse::<i64>().is_ok() => {
            tracing::warn!(collection, id = raw, "dropping legacy entry without category");
            None
        }
        Err(e) => {
            tracing::warn!(collection, error = %e, "dropping unreadable entry");
            None
        }
    }
}

fn parse_key_set(value: Option<Value>, collection: &str) -> BTreeSet<ItemKey> {
    let Some(Value::Array(entries)) = value else {
        return BTreeSet::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => parse_key(s, collection),
            other => parse_key(&other.to_string(), collection),
        })
        .collect()
}

fn parse_ratings(value: Option<Value>) -> BTreeMap<ItemKey, u8> {
    let Some(Value::Object(entries)) = value else {
        return BTreeMap::new();
    };
    entries
        .iter()
        .filter_map(|(raw_key, rating)| {
            let key = parse_key(raw_key, RATINGS_KEY)?;
            let rating = rating
                .as_u64()
                .and_then(|r| u8::try_from(r).ok())
                .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))?;
            Some((key, rating))
        })
        .collect()
}

fn write_through<S: KeyValueStore, T: Serialize + ?Sized>(storage: &mut S, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })
        .and_then(|json| storage.write(key, &json));

    if let Err(e) = result {
        tracing::warn!(key, error = %e, "failed to persist preference");
    }
}

/// Toggles membership of `key`, returning whether it is now present.
fn toggle(set: &mut BTreeSet<ItemKey>, key: ItemKey) -> bool {
    if set.remove(&key) {
        false
    } else {
        set.insert(key);
        true
    }
}

/// Owns the preference state and its durable backend.
///
/// Constructed once per session and handed to whoever needs it; there is no
/// global instance.
pub struct PreferenceStore<S: KeyValueStore> {
    storage: S,
    state: UserPreferences,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Loads all four collections, each falling back to its empty default.
    pub fn load(storage: S) -> Self {
        let state = UserPreferences {
            favorites: parse_key_set(read_or_default(&storage, FAVORITES_KEY), FAVORITES_KEY),
            watchlist: parse_key_set(read_or_default(&storage, WATCHLIST_KEY), WATCHLIST_KEY),
            ratings: parse_ratings(read_or_default(&storage, RATINGS_KEY)),
            dark_mode: read_or_default(&storage, DARK_MODE_KEY)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        };

        tracing::debug!(
            favorites = state.favorites.len(),
            watchlist = state.watchlist.len(),
            ratings = state.ratings.len(),
            dark_mode = state.dark_mode,
            "preferences loaded"
        );

        Self { storage, state }
    }

    pub fn state(&self) -> &UserPreferences {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn favorites(&self) -> &BTreeSet<ItemKey> {
        &self.state.favorites
    }

    pub fn watchlist(&self) -> &BTreeSet<ItemKey> {
        &self.state.watchlist
    }

    pub fn is_favorite(&self, key: &ItemKey) -> bool {
        self.state.favorites.contains(key)
    }

    pub fn in_watchlist(&self, key: &ItemKey) -> bool {
        self.state.watchlist.contains(key)
    }

    pub fn rating(&self, key: &ItemKey) -> Option<u8> {
        self.state.ratings.get(key).copied()
    }

    pub fn dark_mode(&self) -> bool {
        self.state.dark_mode
    }

    pub fn toggle_favorite(&mut self, key: ItemKey) -> bool {
        let present = toggle(&mut self.state.favorites, key);
        tracing::debug!(%key, present, "favorite toggled");
        write_through(&mut self.storage, FAVORITES_KEY, &self.state.favorites);
        present
    }

    pub fn toggle_watchlist(&mut self, key: ItemKey) -> bool {
        let present = toggle(&mut self.state.watchlist, key);
        tracing::debug!(%key, present, "watchlist toggled");
        write_through(&mut self.storage, WATCHLIST_KEY, &self.state.watchlist);
        present
    }

    /// Sets or replaces the rating for `key`. There is no way to clear one.
    pub fn set_rating(&mut self, key: ItemKey, rating: u8) -> Result<(), BrowserError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(BrowserError::InvalidRating(rating));
        }
        self.state.ratings.insert(key, rating);
        tracing::debug!(%key, rating, "rating set");
        write_through(&mut self.storage, RATINGS_KEY, &self.state.ratings);
        Ok(())
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        self.state.dark_mode = on;
        write_through(&mut self.storage, DARK_MODE_KEY, &self.state.dark_mode);
    }
}
