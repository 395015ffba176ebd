use crate::error::{CatalogError, Result};
use crate::persistence::DEFAULT_DEBOUNCE;
use camper_catalog_common::catalog::DEFAULT_PAGE_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = DEFAULT_DEBOUNCE.as_millis() as u64;
const DEFAULT_API_BASE_URL: &str = "https://66b1f8e71ca8ad33d4f5f63e.mockapi.io";

const ENV_STORAGE_DIR: &str = "CAMPER_CATALOG_STORAGE_DIR";
const ENV_DEBOUNCE_MS: &str = "CAMPER_CATALOG_DEBOUNCE_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the file-backed storage slots
    pub storage_dir: Option<PathBuf>,
    pub debounce_ms: u64,
    pub page_limit: usize,
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            page_limit: DEFAULT_PAGE_LIMIT,
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

impl Config {
    /// Load the user config, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("camper-catalog").join("config.json"))
    }

    /// Storage directory, falling back to the platform data dir
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| CatalogError::Config("data directory not found".into()))?;
        Ok(data.join("camper-catalog"))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|d| !d.trim().is_empty()) {
            self.storage_dir = Some(PathBuf::from(dir));
        }

        if let Some(ms) = lookup(ENV_DEBOUNCE_MS) {
            self.debounce_ms = ms.trim().parse().map_err(|_| {
                CatalogError::Config(format!("{ENV_DEBOUNCE_MS} must be milliseconds, got `{ms}`"))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.page_limit, 4);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            storage_dir: Some(dir.path().join("slots")),
            debounce_ms: 50,
            ..Default::default()
        };

        config.save_to(&path).expect("save failed");
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_limit": 12}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.page_limit, 12);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_STORAGE_DIR, "/tmp/slots"),
            (ENV_DEBOUNCE_MS, "300"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/slots")));
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_env_bad_debounce() {
        let mut config = Config::default();
        let result = config.apply_env(|name| (name == ENV_DEBOUNCE_MS).then(|| "soon".to_string()));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
