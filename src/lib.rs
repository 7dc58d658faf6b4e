//! Catalog browser core: remote catalog client, debounced suggestions, genre
//! cache, feed store, persisted preferences and the view pipeline.

pub mod api;
pub mod browser;
pub mod config;
pub mod db;
pub mod error;
pub mod formatters;
pub mod models;
pub mod sequence;
pub mod stores;
pub mod view;

pub use browser::Browser;
pub use error::{BrowserError, CatalogFetchError, Result, StorageError};
