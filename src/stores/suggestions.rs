//! Debounced live search suggestions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::CatalogService;
use crate::models::{Category, Suggestion};
use crate::sequence::RequestSequence;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Default)]
struct SuggestionState {
    suggestions: Vec<Suggestion>,
    last_query: Option<(Category, String)>,
}

fn lock(state: &Mutex<SuggestionState>) -> MutexGuard<'_, SuggestionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the dropdown suggestions for the query being typed.
///
/// A fetch is only issued once the query has been left alone for the
/// debounce interval, and its result is only kept if no newer query arrived
/// in the meantime. Fetch failures just empty the list.
pub struct SuggestionEngine<C> {
    catalog: Arc<C>,
    state: Arc<Mutex<SuggestionState>>,
    sequence: RequestSequence,
    debounce: Duration,
    limit: usize,
}

impl<C: CatalogService + 'static> SuggestionEngine<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_settings(catalog, DEFAULT_DEBOUNCE, DEFAULT_LIMIT)
    }

    /// `limit` never exceeds [`DEFAULT_LIMIT`].
    pub fn with_settings(catalog: Arc<C>, debounce: Duration, limit: usize) -> Self {
        Self {
            catalog,
            state: Arc::new(Mutex::new(SuggestionState::default())),
            sequence: RequestSequence::new(),
            debounce,
            limit: limit.min(DEFAULT_LIMIT),
        }
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        lock(&self.state).suggestions.clone()
    }

    /// Feeds the latest query text.
    ///
    /// Returns the handle of the debounced fetch task when one was scheduled.
    /// Repeating the previous query is a no-op and does not restart the
    /// debounce timer. An empty query clears the list at once and cancels any
    /// pending fetch. Must be called from within a Tokio runtime.
    pub fn on_query_changed(&self, category: Category, query: &str) -> Option<JoinHandle<()>> {
        let query = query.trim().to_string();

        let token = {
            let mut state = lock(&self.state);
            let next = (category, query.clone());
            if state.last_query.as_ref() == Some(&next) {
                return None;
            }
            state.last_query = Some(next);

            let token = self.sequence.issue();
            if query.is_empty() {
                state.suggestions.clear();
                return None;
            }
            token
        };

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let sequence = self.sequence.clone();
        let debounce = self.debounce;
        let limit = self.limit;

        Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !sequence.is_current(token) {
                tracing::trace!(%query, "suggestion query superseded before fetch");
                return;
            }

            let result = catalog.search(category, &query).await;
            if !sequence.is_current(token) {
                tracing::debug!(%query, "discarding stale suggestions");
                return;
            }

            let mut state = lock(&state);
            match result {
                Ok(items) => {
                    state.suggestions = items.iter().take(limit).map(Suggestion::from).collect();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "suggestion fetch failed");
                    state.suggestions.clear();
                }
            }
        }))
    }
}
