use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::AppConfig;

pub const CONFIG_FILE: &str = "config.json";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Platform data directory for the browser, e.g. `~/.local/share/media-browser`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media-browser")
}

/// Loads `config.json` from `data_dir`, writing a default one on first run.
/// An unreadable file falls back to defaults rather than failing.
pub fn load_config(data_dir: &Path) -> Result<(AppConfig, PathBuf)> {
    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() {
        let data = std::fs::read_to_string(&config_path)?;
        let config: AppConfig = serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!(path = ?config_path, error = %e, "invalid config, using defaults");
            AppConfig::default()
        });
        Ok((config, config_path))
    } else {
        let config = AppConfig::default();
        std::fs::create_dir_all(data_dir)?;
        save_config(&config, &config_path)?;
        tracing::info!(path = ?config_path, "wrote default config");
        Ok((config, config_path))
    }
}

pub fn save_config(config: &AppConfig, config_path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    std::fs::write(config_path, data)?;
    Ok(())
}

/// Applies environment overrides on top of the file config.
pub fn apply_env(config: &mut AppConfig) {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.tmdb_api_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, path) = load_config(dir.path()).unwrap();

        assert!(path.exists());
        assert_eq!(config.suggestion_debounce_ms, 300);
        assert_eq!(config.suggestion_limit, 5);
        assert!(config.tmdb_api_key.is_empty());
    }

    #[test]
    fn saved_values_are_read_back_and_missing_fields_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"tmdb_api_key": "abc", "language": "pt-BR"}"#).unwrap();

        let (config, _) = load_config(dir.path()).unwrap();
        assert_eq!(config.tmdb_api_key, "abc");
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.request_timeout_secs, 15);

        let mut changed = config.clone();
        changed.suggestion_limit = 8;
        save_config(&changed, &path).unwrap();
        assert_eq!(load_config(dir.path()).unwrap().0.suggestion_limit, 8);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let (config, _) = load_config(dir.path()).unwrap();
        assert_eq!(config.base_url, crate::models::DEFAULT_BASE_URL);
    }
}
