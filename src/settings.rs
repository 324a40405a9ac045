use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::modules::host::WebPreferences;

pub const SETTINGS_FILE: &str = "views_settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum SearchEngine {
    #[default]
    DuckDuckGo,
    Google,
    Bing,
    Brave,
}

impl SearchEngine {
    pub fn query_url(&self, query: &str) -> String {
        let q = urlencoding::encode(query);
        match self {
            Self::DuckDuckGo => format!("https://duckduckgo.com/?q={}", q),
            Self::Google => format!("https://google.com/search?q={}", q),
            Self::Bing => format!("https://bing.com/search?q={}", q),
            Self::Brave => format!("https://search.brave.com/search?q={}", q),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Loaded by new views that are not given a URL.
    pub homepage: String,
    pub search_engine: SearchEngine,
    pub https_only: bool,
    /// Logical pixels reserved above the content area for the tab bar.
    pub toolbar_height: f64,
    pub max_closed_tabs: usize,
    pub web_preferences: WebPreferences,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: "https://duckduckgo.com".to_string(),
            search_engine: SearchEngine::default(),
            https_only: true,
            toolbar_height: 78.0,
            max_closed_tabs: 25,
            web_preferences: WebPreferences::default(),
        }
    }
}

impl Settings {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }

    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                Self::default()
            }
        }
    }

    /// Loads settings, writing the defaults out on first run so they can be edited.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        if let Err(e) = settings.save(path) {
            log::warn!("[Settings] Failed to write defaults to {:?}: {}", path, e);
        }
        settings
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&Settings::path_in(dir.path()));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(dir.path());

        let mut settings = Settings::default();
        settings.homepage = "about:blank".to_string();
        settings.search_engine = SearchEngine::Brave;
        settings.max_closed_tabs = 3;
        settings.save(&path).unwrap();

        assert!(!path.with_extension("tmp").exists());
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(&dir.path().join("nested"));

        assert_eq!(Settings::load_or_init(&path), Settings::default());
        assert!(path.exists());

        let custom = Settings { max_closed_tabs: 7, ..Settings::default() };
        custom.save(&path).unwrap();
        assert_eq!(Settings::load_or_init(&path), custom);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(dir.path());
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(dir.path());
        fs::write(&path, r#"{ "https_only": false }"#).unwrap();

        let settings = Settings::load(&path);
        assert!(!settings.https_only);
        assert_eq!(settings.toolbar_height, 78.0);
    }

    #[test]
    fn test_query_url_encodes() {
        assert_eq!(
            SearchEngine::Google.query_url("a&b"),
            "https://google.com/search?q=a%26b"
        );
    }
}
