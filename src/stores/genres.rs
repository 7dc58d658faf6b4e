//! Genre vocabulary for the active category.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::api::CatalogService;
use crate::models::{Category, Genre};
use crate::sequence::RequestSequence;

#[derive(Debug, Default)]
struct GenreState {
    requested: Option<Category>,
    loaded: Option<Category>,
    genres: Vec<Genre>,
}

fn lock(state: &Mutex<GenreState>) -> MutexGuard<'_, GenreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds one genre list at a time, replaced wholesale when the category
/// changes. While the new list is loading the previous one keeps being
/// served. A failed load leaves an empty list and is not retried.
pub struct GenreCache<C> {
    catalog: Arc<C>,
    state: Arc<Mutex<GenreState>>,
    sequence: RequestSequence,
}

impl<C: CatalogService + 'static> GenreCache<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            state: Arc::new(Mutex::new(GenreState::default())),
            sequence: RequestSequence::new(),
        }
    }

    /// The list currently being served.
    pub fn genres(&self) -> Vec<Genre> {
        lock(&self.state).genres.clone()
    }

    /// Category whose fetch last completed, successfully or not.
    pub fn loaded_category(&self) -> Option<Category> {
        lock(&self.state).loaded
    }

    /// Starts loading `category` unless it is already loaded or loading.
    /// Must be called from within a Tokio runtime.
    pub fn select_category(&self, category: Category) -> Option<JoinHandle<()>> {
        let token = {
            let mut state = lock(&self.state);
            if state.requested == Some(category) {
                return None;
            }
            state.requested = Some(category);
            self.sequence.issue()
        };

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let sequence = self.sequence.clone();

        Some(tokio::spawn(async move {
            let result = catalog.list_genres(category).await;
            if !sequence.is_current(token) {
                tracing::debug!(%category, "discarding stale genre list");
                return;
            }

            let mut state = lock(&state);
            state.loaded = Some(category);
            state.genres = match result {
                Ok(genres) => genres,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load genres");
                    Vec::new()
                }
            };
        }))
    }

    /// Genres to show for `category`, kicking off a load on a category change.
    pub fn genres_for(&self, category: Category) -> Vec<Genre> {
        self.select_category(category);
        self.genres()
    }
}
