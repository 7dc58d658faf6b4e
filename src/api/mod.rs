//! Catalog Client: the only code that talks to the remote catalog.

pub mod tmdb;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::CatalogFetchError;
use crate::models::{Category, ContentItem, Genre};

pub use tmdb::TmdbClient;

/// One network call per method, no caching. Every returned item carries the
/// requested category.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_popular(&self, category: Category) -> Result<Vec<ContentItem>, CatalogFetchError>;

    async fn search(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<ContentItem>, CatalogFetchError>;

    async fn discover_by_genre(
        &self,
        category: Category,
        genre_id: i64,
    ) -> Result<Vec<ContentItem>, CatalogFetchError>;

    async fn list_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogFetchError>;
}
