//! Error types shared across the browser.
//!
//! [`CatalogFetchError`] is the only error the catalog boundary ever returns;
//! transport, status and decode failures are all folded into it.
//! [`StorageError`] covers the durable key-value store, and [`BrowserError`]
//! is the crate-level umbrella used by configuration and the binary.

use std::fmt;

use thiserror::Error;

use crate::models::Category;

/// The remote call a [`CatalogFetchError`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOperation {
    ListPopular,
    Search,
    DiscoverByGenre,
    ListGenres,
}

impl CatalogOperation {
    /// Short message shown in place of the feed when this operation fails.
    pub fn user_message(self) -> &'static str {
        match self {
            CatalogOperation::ListPopular => "Could not load content.",
            CatalogOperation::Search => "Could not search content.",
            CatalogOperation::DiscoverByGenre => "Could not filter by genre.",
            CatalogOperation::ListGenres => "Could not load genres.",
        }
    }
}

impl fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogOperation::ListPopular => "list popular",
            CatalogOperation::Search => "search",
            CatalogOperation::DiscoverByGenre => "discover by genre",
            CatalogOperation::ListGenres => "list genres",
        };
        f.write_str(name)
    }
}

/// A failed call against the catalog service.
#[derive(Debug, Clone, Error)]
#[error("catalog {operation} failed for {category}: {reason}")]
pub struct CatalogFetchError {
    pub operation: CatalogOperation,
    pub category: Category,
    pub reason: String,
}

impl CatalogFetchError {
    pub fn new(operation: CatalogOperation, category: Category, reason: impl Into<String>) -> Self {
        Self {
            operation,
            category,
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.operation.user_message()
    }
}

/// Read or write failure against durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored value for '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error(transparent)]
    Catalog(#[from] CatalogFetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ratings are whole stars between 1 and 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
