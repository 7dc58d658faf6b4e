//! Scriptable in-memory catalog for store tests.
//!
//! Every call is recorded under a key such as `popular:movie`,
//! `search:tv:dune`, `discover:movie:28` or `genres:tv`. Delays and failures
//! are scripted against the same keys.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::CatalogService;
use crate::error::{CatalogFetchError, CatalogOperation};
use crate::models::{Category, ContentItem, Genre};

pub(crate) fn sample_item(category: Category, id: i64, title: &str) -> ContentItem {
    ContentItem {
        id,
        category,
        title: title.to_string(),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        popularity: 0.0,
        vote_average: 0.0,
        vote_count: 0,
        genre_ids: Vec::new(),
        runtime_minutes: None,
        episode_runtime_minutes: None,
        season_count: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    calls: Mutex<Vec<String>>,
    popular: Mutex<HashMap<Category, Vec<ContentItem>>>,
    searches: Mutex<HashMap<String, Vec<ContentItem>>>,
    discover: Mutex<HashMap<i64, Vec<ContentItem>>>,
    genres: Mutex<HashMap<Category, Vec<Genre>>>,
    delays: Mutex<HashMap<String, Duration>>,
    failures: Mutex<HashSet<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_popular(self, category: Category, items: Vec<ContentItem>) -> Self {
        self.popular.lock().unwrap().insert(category, items);
        self
    }

    pub fn with_search(self, query: &str, items: Vec<ContentItem>) -> Self {
        self.searches.lock().unwrap().insert(query.to_string(), items);
        self
    }

    pub fn with_discover(self, genre_id: i64, items: Vec<ContentItem>) -> Self {
        self.discover.lock().unwrap().insert(genre_id, items);
        self
    }

    pub fn with_genres(self, category: Category, genres: Vec<Genre>) -> Self {
        self.genres.lock().unwrap().insert(category, genres);
        self
    }

    pub fn with_delay(self, call: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(call.to_string(), delay);
        self
    }

    pub fn failing(self, call: &str) -> Self {
        self.failures.lock().unwrap().insert(call.to_string());
        self
    }

    pub fn set_failing(&self, call: &str, failing: bool) {
        let mut failures = self.failures.lock().unwrap();
        if failing {
            failures.insert(call.to_string());
        } else {
            failures.remove(call);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(
        &self,
        call: String,
        operation: CatalogOperation,
        category: Category,
    ) -> Result<(), CatalogFetchError> {
        self.calls.lock().unwrap().push(call.clone());
        let delay = self.delays.lock().unwrap().get(&call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failures.lock().unwrap().contains(&call) {
            return Err(CatalogFetchError::new(operation, category, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn list_popular(&self, category: Category) -> Result<Vec<ContentItem>, CatalogFetchError> {
        self.enter(format!("popular:{}", category), CatalogOperation::ListPopular, category)
            .await?;
        Ok(self.popular.lock().unwrap().get(&category).cloned().unwrap_or_default())
    }

    async fn search(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<ContentItem>, CatalogFetchError> {
        self.enter(format!("search:{}:{}", category, query), CatalogOperation::Search, category)
            .await?;
        let scripted = self.searches.lock().unwrap().get(query).cloned();
        Ok(scripted.unwrap_or_else(|| vec![sample_item(category, 1, query)]))
    }

    async fn discover_by_genre(
        &self,
        category: Category,
        genre_id: i64,
    ) -> Result<Vec<ContentItem>, CatalogFetchError> {
        self.enter(
            format!("discover:{}:{}", category, genre_id),
            CatalogOperation::DiscoverByGenre,
            category,
        )
        .await?;
        Ok(self.discover.lock().unwrap().get(&genre_id).cloned().unwrap_or_default())
    }

    async fn list_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogFetchError> {
        self.enter(format!("genres:{}", category), CatalogOperation::ListGenres, category)
            .await?;
        Ok(self.genres.lock().unwrap().get(&category).cloned().unwrap_or_default())
    }
}
