//! File-backed key-value store
//!
//! Each key is stored as one file in the root directory, named by the
//! SHA-256 of the key so arbitrary key strings map to safe file names.
//!
//! Example: key "noto-notes" is stored at "<root>/<sha256(noto-notes)>.json"

use super::KeyValueStore;
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Initialize the file store (create directory if needed)
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("File store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Get file path for a key
    fn get_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.root.join(format!("{:x}.json", hasher.finalize()))
    }

    /// Get file store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.get_path(key);

        match fs::read_to_string(&path).await {
            Ok(value) => {
                tracing::debug!("Read key {} ({} bytes)", key, value.len());
                Ok(Some(value))
            }
            // Never written is not an error
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.get_path(key);

        // Write to temp file first, then rename over the old value
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;

        // Readers see either the old value or the new one, never a partial write
        fs::rename(temp_path, &path).await?;

        tracing::debug!("Wrote key {} ({} bytes)", key, value.len());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.get_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed key {}", key);
                Ok(())
            }
            // Already gone
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("kv"));
        store.initialize().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (store, _temp) = create_test_store().await;

        assert_eq!(store.get("noto-notes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (store, _temp) = create_test_store().await;

        store.set("noto-notes", "[]").await.unwrap();
        store.set("noto-notes", r#"[{"id":"1"}]"#).await.unwrap();

        let value = store.get("noto-notes").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"1"}]"#));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let (store, _temp) = create_test_store().await;

        store.set("noto-notes", "[]").await.unwrap();

        let path = store.get_path("noto-notes");
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(path.parent().unwrap(), store.root());
    }

    #[tokio::test]
    async fn test_keys_map_to_distinct_files() {
        let (store, _temp) = create_test_store().await;

        store.set("a/b", "1").await.unwrap();
        store.set("a_b", "2").await.unwrap();

        assert_eq!(store.get("a/b").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("a_b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _temp) = create_test_store().await;

        store.set("noto-notes", "[]").await.unwrap();
        store.remove("noto-notes").await.unwrap();
        assert_eq!(store.get("noto-notes").await.unwrap(), None);

        // Removing again is fine
        store.remove("noto-notes").await.unwrap();
    }
}
