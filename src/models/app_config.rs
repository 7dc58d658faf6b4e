use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tmdb_api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_suggestion_debounce_ms")]
    pub suggestion_debounce_ms: u64,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default)]
    pub trace_level: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.into()
}

fn default_language() -> String {
    "en-US".into()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_suggestion_debounce_ms() -> u64 {
    300
}

fn default_suggestion_limit() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            request_timeout_secs: default_request_timeout_secs(),
            suggestion_debounce_ms: default_suggestion_debounce_ms(),
            suggestion_limit: default_suggestion_limit(),
            trace_level: None,
        }
    }
}
