//! Application state and initialization
//!
//! Opens everything a host needs from a single data directory: the
//! configuration file and the SQLite-backed note store.

use crate::config::{StoreConfig, CONFIG_FILE_NAME, DATABASE_FILE_NAME};
use crate::database::{create_pool, SqliteStore};
use crate::error::Result;
use crate::services::NoteStore;
use std::path::PathBuf;

/// Central application state
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub config: StoreConfig,
    pub notes: NoteStore<SqliteStore>,
}

/// Application setup - called once on startup
pub async fn setup(app_data_dir: PathBuf) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    let config = StoreConfig::load(&app_data_dir.join(CONFIG_FILE_NAME)).await?;

    let pool = create_pool(&app_data_dir.join(DATABASE_FILE_NAME)).await?;
    let notes = NoteStore::open(SqliteStore::new(pool), &config).await;

    tracing::info!("Application initialized successfully");

    Ok(AppState {
        app_data_dir,
        config,
        notes,
    })
}
