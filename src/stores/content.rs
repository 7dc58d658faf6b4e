//! Content Store: owns the main feed and its loading/error state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::CatalogService;
use crate::models::{Category, ContentItem};
use crate::sequence::RequestSequence;

/// The operation that produced (or is producing) the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    Popular(Category),
    Search(Category, String),
    Genre(Category, i64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub items: Vec<ContentItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Only the most recently issued operation may land its result; anything it
/// superseded is dropped when it resolves. Failures clear the feed and leave
/// a short message; nothing is retried until the caller asks.
pub struct ContentStore<C> {
    catalog: Arc<C>,
    state: Mutex<FeedState>,
    last_request: Mutex<Option<FeedRequest>>,
    sequence: RequestSequence,
}

impl<C: CatalogService> ContentStore<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            state: Mutex::new(FeedState::default()),
            last_request: Mutex::new(None),
            sequence: RequestSequence::new(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> FeedState {
        self.lock_state().clone()
    }

    pub fn items(&self) -> Vec<ContentItem> {
        self.lock_state().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    pub fn last_request(&self) -> Option<FeedRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn load_popular(&self, category: Category) {
        self.run(FeedRequest::Popular(category)).await;
    }

    /// Blank or whitespace-only queries load the popular listing instead.
    pub async fn search_for(&self, category: Category, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.load_popular(category).await;
        } else {
            self.run(FeedRequest::Search(category, query.to_string())).await;
        }
    }

    /// `None` clears the genre filter and loads the popular listing.
    pub async fn filter_by_genre(&self, category: Category, genre_id: Option<i64>) {
        match genre_id {
            Some(id) => self.run(FeedRequest::Genre(category, id)).await,
            None => self.load_popular(category).await,
        }
    }

    /// Re-issues the last requested operation; a no-op before the first one.
    pub async fn retry(&self) {
        if let Some(request) = self.last_request() {
            self.run(request).await;
        }
    }

    async fn run(&self, request: FeedRequest) {
        let token = self.sequence.issue();
        {
            let mut state = self.lock_state();
            state.is_loading = true;
            state.error = None;
        }
        *self.last_request.lock().unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        tracing::debug!(?request, ?token, "feed request issued");

        let result = match &request {
            FeedRequest::Popular(category) => self.catalog.list_popular(*category).await,
            FeedRequest::Search(category, query) => self.catalog.search(*category, query).await,
            FeedRequest::Genre(category, genre_id) => {
                self.catalog.discover_by_genre(*category, *genre_id).await
            }
        };

        if !self.sequence.is_current(token) {
            tracing::debug!(?request, ?token, "discarding stale feed response");
            return;
        }

        let mut state = self.lock_state();
        state.is_loading = false;
        match result {
            Ok(items) => {
                tracing::debug!(?request, count = items.len(), "feed updated");
                state.items = items;
            }
            Err(e) => {
                tracing::warn!(error = %e, "feed request failed");
                state.items.clear();
                state.error = Some(e.user_message().to_string());
            }
        }
    }
}
