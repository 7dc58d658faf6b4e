use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;

use super::CatalogService;
use crate::error::{BrowserError, CatalogFetchError, CatalogOperation};
use crate::models::{AppConfig, Category, ContentItem, Genre};

fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

fn opt_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn opt_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

/// Normalizes one raw record. Movies and series name their title and date
/// fields differently; both shapes end up in the same `ContentItem`.
fn parse_item(r: &Value, category: Category) -> Option<ContentItem> {
    let id = r["id"].as_i64()?;

    let (title_field, alt_title_field, date_field, alt_date_field) = match category {
        Category::Movie => ("title", "name", "release_date", "first_air_date"),
        Category::Series => ("name", "title", "first_air_date", "release_date"),
    };

    let title = opt_str(&r[title_field])
        .or_else(|| opt_str(&r[alt_title_field]))
        .unwrap_or_default();
    let release_date = r[date_field]
        .as_str()
        .or_else(|| r[alt_date_field].as_str())
        .and_then(parse_date);

    let genre_ids = r["genre_ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();

    let (runtime_minutes, episode_runtime_minutes, season_count) = match category {
        Category::Movie => (opt_u32(&r["runtime"]), None, None),
        Category::Series => (
            None,
            opt_u32(&r["episode_run_time"][0]),
            opt_u32(&r["number_of_seasons"]),
        ),
    };

    Some(ContentItem {
        id,
        category,
        title,
        overview: r["overview"].as_str().unwrap_or("").to_string(),
        poster_path: opt_str(&r["poster_path"]),
        backdrop_path: opt_str(&r["backdrop_path"]),
        release_date,
        popularity: r["popularity"].as_f64().unwrap_or(0.0),
        vote_average: r["vote_average"].as_f64().unwrap_or(0.0),
        vote_count: r["vote_count"].as_i64().unwrap_or(0),
        genre_ids,
        runtime_minutes,
        episode_runtime_minutes,
        season_count,
    })
}

/// Every item leaving here is stamped with `category`; records without an
/// id are dropped.
pub(crate) fn parse_results(data: &Value, category: Category) -> Vec<ContentItem> {
    data["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| parse_item(r, category))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_genres(data: &Value) -> Vec<Genre> {
    data["genres"]
        .as_array()
        .map(|genres| {
            genres
                .iter()
                .filter_map(|g| {
                    Some(Genre {
                        id: g["id"].as_i64()?,
                        name: g["name"].as_str().unwrap_or("").to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// HTTP client for the TMDB v3 API.
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &AppConfig) -> Result<Self, BrowserError> {
        if config.tmdb_api_key.trim().is_empty() {
            return Err(BrowserError::Config(
                "TMDB API key not set. Add it to config.json or set TMDB_API_KEY.".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BrowserError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.tmdb_api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    async fn tmdb_get(
        &self,
        operation: CatalogOperation,
        category: Category,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, CatalogFetchError> {
        tracing::debug!(%operation, %category, endpoint, "catalog request");

        let fail = |reason: String| CatalogFetchError::new(operation, category, reason);

        // Errors are stripped of their URL, which carries the API key.
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            return Err(fail(format!("HTTP {}", resp.status())));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| fail(format!("failed to parse response: {}", e.without_url())))
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn list_popular(&self, category: Category) -> Result<Vec<ContentItem>, CatalogFetchError> {
        let endpoint = format!("{}/popular", category.api_segment());
        let params = [("page", "1".to_string())];
        let data = self
            .tmdb_get(CatalogOperation::ListPopular, category, &endpoint, &params)
            .await?;
        Ok(parse_results(&data, category))
    }

    async fn search(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<ContentItem>, CatalogFetchError> {
        let endpoint = format!("search/{}", category.api_segment());
        let params = [("query", query.to_string()), ("page", "1".to_string())];
        let data = self
            .tmdb_get(CatalogOperation::Search, category, &endpoint, &params)
            .await?;
        Ok(parse_results(&data, category))
    }

    async fn discover_by_genre(
        &self,
        category: Category,
        genre_id: i64,
    ) -> Result<Vec<ContentItem>, CatalogFetchError> {
        let endpoint = format!("discover/{}", category.api_segment());
        let params = [("with_genres", genre_id.to_string())];
        let data = self
            .tmdb_get(CatalogOperation::DiscoverByGenre, category, &endpoint, &params)
            .await?;
        Ok(parse_results(&data, category))
    }

    async fn list_genres(&self, category: Category) -> Result<Vec<Genre>, CatalogFetchError> {
        let endpoint = format!("genre/{}/list", category.api_segment());
        let data = self
            .tmdb_get(CatalogOperation::ListGenres, category, &endpoint, &[])
            .await?;
        Ok(parse_genres(&data))
    }
}
