//! Store configuration
//!
//! Constants used throughout the crate plus the small JSON-backed
//! configuration a host can use to override the storage key and the
//! default note colour.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

// ===== Persistence =====

/// Key under which the serialized note collection is stored
pub const STORAGE_KEY: &str = "noto-notes";

/// SQLite database file name inside the app data directory
pub const DATABASE_FILE_NAME: &str = "noto.db";

/// Configuration file name inside the app data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

// ===== Note Colours =====

/// Colour given to notes created without one
pub const DEFAULT_NOTE_COLOR: &str = "#ffffff";

/// Swatches offered by the note editor
pub const COLOR_SWATCHES: &[&str] = &[
    "#ffffff", "#f8f9fa", "#fff3cd", "#d4edda", "#cce5ff", "#e2e3e5", "#f8d7da",
];

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key the note collection is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Colour for notes added without one; must be one of [`COLOR_SWATCHES`]
    #[serde(default = "default_note_color")]
    pub default_color: String,
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_note_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            default_color: default_note_color(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from disk, writing the defaults if the file is missing
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found, creating default config");
            let default = Self::default();
            default.save(path).await?;
            return Ok(default);
        }

        // Missing fields fall back to their defaults; unknown values are rejected below
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to disk
    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::info!("Config saved to {:?}", path);

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Whitespace-only counts as empty
        if self.storage_key.trim().is_empty() {
            return Err(AppError::Config("storage_key must not be empty".to_string()));
        }

        if !COLOR_SWATCHES.contains(&self.default_color.as_str()) {
            return Err(AppError::Config(format!(
                "default_color {} is not one of the available swatches",
                self.default_color
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_config_created_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let config = StoreConfig::load(&path).await.unwrap();

        assert_eq!(config.storage_key, "noto-notes");
        assert_eq!(config.default_color, "#ffffff");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r##"{"default_color":"#fff3cd"}"##)
            .await
            .unwrap();

        let config = StoreConfig::load(&path).await.unwrap();

        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.default_color, "#fff3cd");
    }

    #[tokio::test]
    async fn test_config_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let config = StoreConfig {
            storage_key: "work-notes".to_string(),
            default_color: "#cce5ff".to_string(),
        };
        config.save(&path).await.unwrap();

        let loaded = StoreConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_rejects_unknown_color() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r##"{"default_color":"#123456"}"##)
            .await
            .unwrap();

        let result = StoreConfig::load(&path).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_blank_storage_key() {
        let config = StoreConfig {
            storage_key: "  ".to_string(),
            ..StoreConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
