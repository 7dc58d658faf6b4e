mod app_config;
mod content_item;

pub use app_config::{AppConfig, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL};
pub use content_item::{Category, ContentItem, Genre, ItemKey, Suggestion};
