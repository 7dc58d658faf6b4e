//! User-facing controller tying the stores together.
//!
//! Each method corresponds to one user action. Feed-loading actions are
//! async, take `&self` and resolve once the feed has settled, so a newer
//! action may be issued while an older one is still in flight; the older
//! result is then dropped. Suggestion and genre fetches run as background
//! tasks and update their stores when they land.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::CatalogService;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::formatters;
use crate::models::{AppConfig, Category, ContentItem, Genre, ItemKey, Suggestion};
use crate::stores::{ContentStore, GenreCache, PreferenceStore, SuggestionEngine};
use crate::view::{self, EmptyFeed, SortKey, Tab, ViewLayout, ViewState};

pub struct Browser<C, S: KeyValueStore> {
    content: ContentStore<C>,
    genres: GenreCache<C>,
    suggestions: SuggestionEngine<C>,
    preferences: PreferenceStore<S>,
    view: Mutex<ViewState>,
}

impl<C: CatalogService + 'static, S: KeyValueStore> Browser<C, S> {
    pub fn new(catalog: Arc<C>, preferences: PreferenceStore<S>, config: &AppConfig) -> Self {
        Self {
            content: ContentStore::new(Arc::clone(&catalog)),
            genres: GenreCache::new(Arc::clone(&catalog)),
            suggestions: SuggestionEngine::with_settings(
                catalog,
                Duration::from_millis(config.suggestion_debounce_ms),
                config.suggestion_limit,
            ),
            preferences,
            view: Mutex::new(ViewState::default()),
        }
    }

    fn lock_view(&self) -> MutexGuard<'_, ViewState> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current selections.
    pub fn view(&self) -> ViewState {
        self.lock_view().clone()
    }

    pub fn content(&self) -> &ContentStore<C> {
        &self.content
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.preferences
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.suggestions()
    }

    /// Genres currently held by the cache. Never starts a fetch.
    pub fn genres(&self) -> Vec<Genre> {
        self.genres.genres()
    }

    /// Initial load for the active category.
    ///
    /// Returns the genre fetch task, if one was started.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        let genres = self.load_genres();
        self.load_popular().await;
        genres
    }

    /// Switches category and resets the query, genre filter and suggestions
    /// without loading anything.
    pub fn set_category(&self, category: Category) {
        {
            let mut view = self.lock_view();
            view.active_category = category;
            view.search_query.clear();
            view.selected_genre_id = None;
        }
        self.suggestions.on_query_changed(category, "");
    }

    /// Starts the genre fetch for the active category unless it is already
    /// loaded or loading. Must be called from within a Tokio runtime.
    pub fn load_genres(&self) -> Option<JoinHandle<()>> {
        let category = self.lock_view().active_category;
        self.genres.select_category(category)
    }

    /// Switching category resets the query and genre filter and reloads.
    ///
    /// Returns the genre fetch task, if one was started.
    pub async fn change_category(&self, category: Category) -> Option<JoinHandle<()>> {
        self.set_category(category);
        let genres = self.load_genres();
        self.content.load_popular(category).await;
        genres
    }

    /// Popular listing for the active category, dropping any genre filter.
    pub async fn load_popular(&self) {
        let category = {
            let mut view = self.lock_view();
            view.selected_genre_id = None;
            view.active_category
        };
        self.content.load_popular(category).await;
    }

    /// Records the typed query and feeds the suggestion engine. Clearing the
    /// query reloads the popular listing.
    ///
    /// Returns the pending suggestion task, if one was scheduled.
    pub async fn set_query(&self, query: &str) -> Option<JoinHandle<()>> {
        let category = {
            let mut view = self.lock_view();
            view.search_query = query.to_string();
            view.active_category
        };
        let pending = self.suggestions.on_query_changed(category, query);
        if query.trim().is_empty() {
            self.content.load_popular(category).await;
        }
        pending
    }

    /// Runs a full search for `query` without touching suggestions.
    pub async fn search(&self, query: &str) {
        let category = {
            let mut view = self.lock_view();
            view.search_query = query.to_string();
            view.active_category
        };
        self.content.search_for(category, query).await;
    }

    pub async fn submit_search(&self) {
        let (category, query) = {
            let view = self.lock_view();
            (view.active_category, view.search_query.clone())
        };
        self.content.search_for(category, &query).await;
    }

    pub async fn pick_suggestion(&self, suggestion: &Suggestion) {
        self.search(&suggestion.title).await;
    }

    pub async fn select_genre(&self, genre_id: Option<i64>) {
        let category = {
            let mut view = self.lock_view();
            view.selected_genre_id = genre_id;
            view.active_category
        };
        self.content.filter_by_genre(category, genre_id).await;
    }

    /// The "try again" action after a failed load.
    pub async fn retry(&self) {
        self.content.retry().await;
    }

    pub fn set_tab(&self, tab: Tab) {
        self.lock_view().active_tab = tab;
    }

    pub fn set_sort_key(&self, sort_key: SortKey) {
        self.lock_view().sort_key = sort_key;
    }

    pub fn set_layout(&self, layout: ViewLayout) {
        self.lock_view().view_layout = layout;
    }

    pub fn show_details(&self, item: Option<ContentItem>) {
        self.lock_view().selected_detail_item = item;
    }

    pub fn toggle_favorite(&mut self, key: ItemKey) -> bool {
        self.preferences.toggle_favorite(key)
    }

    pub fn toggle_watchlist(&mut self, key: ItemKey) -> bool {
        self.preferences.toggle_watchlist(key)
    }

    pub fn rate(&mut self, key: ItemKey, rating: u8) -> Result<()> {
        self.preferences.set_rating(key, rating)
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let on = !self.preferences.dark_mode();
        self.preferences.set_dark_mode(on);
        on
    }

    /// The feed as it should be shown: current tab, then current sort.
    pub fn displayed(&self) -> Vec<ContentItem> {
        let (tab, sort_key) = {
            let view = self.lock_view();
            (view.active_tab, view.sort_key)
        };
        view::render(
            &self.content.items(),
            tab,
            self.preferences.favorites(),
            self.preferences.watchlist(),
            sort_key,
        )
    }

    /// Set when the feed settled without error but nothing is shown.
    pub fn empty_feed(&self) -> Option<EmptyFeed> {
        let state = self.content.snapshot();
        if state.is_loading || state.error.is_some() || !self.displayed().is_empty() {
            return None;
        }
        Some(EmptyFeed::for_tab(self.lock_view().active_tab))
    }

    pub fn genre_names(&self, item: &ContentItem) -> String {
        formatters::genre_names(&item.genre_ids, &self.genres.genres())
    }
}
