//! Note store
//!
//! Owns the note collection and funnels every change through
//! [`reduce`], writing the whole collection back to the key-value store
//! after each change.

use super::reducer::{self, reduce, Action, NotesState, Outcome};
use super::views::{self, ViewMode};
use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::{Note, NoteUpdate};
use crate::storage::KeyValueStore;
use chrono::Utc;

/// The note collection and the store it is persisted to
pub struct NoteStore<S> {
    kv: S,
    storage_key: String,
    state: NotesState,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Create an empty, still-loading store. Call [`NoteStore::load`] next.
    pub fn new(kv: S, config: &StoreConfig) -> Self {
        Self {
            kv,
            storage_key: config.storage_key.clone(),
            state: NotesState::new(config.default_color.clone()),
        }
    }

    /// Create a store and load the persisted collection
    pub async fn open(kv: S, config: &StoreConfig) -> Self {
        let mut store = Self::new(kv, config);
        store.load().await;
        store
    }

    /// Load the persisted collection, replacing whatever is in memory.
    ///
    /// Never fails: a missing value means no notes yet, and a value that
    /// cannot be read or parsed is logged and replaced by an empty
    /// collection. Afterwards memory holds exactly what storage holds.
    pub async fn load(&mut self) {
        // Unreadable or corrupt data starts an empty collection
        let notes = match self.read_persisted().await {
            Ok(notes) => notes,
            Err(e) => {
                tracing::error!("Error loading notes from {}: {}", self.storage_key, e);
                Vec::new()
            }
        };

        let count = reducer::load(&mut self.state, notes);
        tracing::info!("Loaded {} notes", count);
    }

    async fn read_persisted(&self) -> Result<Vec<Note>> {
        match self.kv.get(&self.storage_key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                tracing::info!("No saved notes under {}", self.storage_key);
                Ok(Vec::new())
            }
        }
    }

    /// Apply an action and persist the collection if it changed.
    ///
    /// A failed write leaves the in-memory change in place and returns
    /// the storage error.
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        // Rejected actions leave memory and storage alone
        let outcome = reduce(&mut self.state, action, Utc::now())?;

        // Write the whole collection, not a diff
        if outcome.persists() {
            self.persist().await?;
        }

        Ok(outcome)
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(self.state.notes())?;

        if let Err(e) = self.kv.set(&self.storage_key, &raw).await {
            tracing::error!("Failed to save notes to {}: {}", self.storage_key, e);
            return Err(e);
        }

        tracing::debug!("Saved {} notes", self.state.notes().len());
        Ok(())
    }

    /// Create a new note at the front of the collection, returning its id
    pub async fn add(
        &mut self,
        title: String,
        content: String,
        color: Option<String>,
    ) -> Result<String> {
        tracing::info!("Creating new note: {}", title);

        let outcome = self
            .dispatch(Action::Add {
                title,
                content,
                color,
            })
            .await?;

        match outcome {
            Outcome::Added(id) => {
                tracing::info!("Note created successfully: {}", id);
                Ok(id)
            }
            other => Err(AppError::Generic(format!(
                "Adding a note produced {:?}",
                other
            ))),
        }
    }

    /// Merge `changes` into a note. Returns false if the id is unknown.
    pub async fn update(&mut self, id: &str, changes: NoteUpdate) -> Result<bool> {
        tracing::debug!("Updating note: {}", id);

        self.dispatch_for_note(Action::Update {
            id: id.to_string(),
            changes,
        })
        .await
    }

    pub async fn toggle_important(&mut self, id: &str) -> Result<bool> {
        self.dispatch_for_note(Action::ToggleImportant { id: id.to_string() })
            .await
    }

    pub async fn toggle_archive(&mut self, id: &str) -> Result<bool> {
        self.dispatch_for_note(Action::ToggleArchive { id: id.to_string() })
            .await
    }

    /// Move a note to the bin (soft delete)
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        tracing::info!("Deleting note: {}", id);

        self.dispatch_for_note(Action::Delete { id: id.to_string() })
            .await
    }

    /// Bring a note back out of the bin
    pub async fn restore(&mut self, id: &str) -> Result<bool> {
        tracing::info!("Restoring note: {}", id);

        self.dispatch_for_note(Action::Restore { id: id.to_string() })
            .await
    }

    /// Permanently remove a note. Cannot be undone.
    pub async fn purge(&mut self, id: &str) -> Result<bool> {
        tracing::info!("Purging note: {}", id);

        self.dispatch_for_note(Action::Purge { id: id.to_string() })
            .await
    }

    /// Permanently remove the notes the bin shows under the current
    /// search, returning how many went
    pub async fn empty_bin(&mut self) -> Result<usize> {
        let purged = match self.dispatch(Action::EmptyBin).await? {
            Outcome::Purged(count) => count,
            _ => 0,
        };

        tracing::info!("Emptied bin: {} notes purged", purged);
        Ok(purged)
    }

    /// Put the whole collection in the order given by `ids`.
    ///
    /// `ids` must be a permutation of the current ids; anything else is
    /// rejected and the order is left alone.
    pub async fn reorder(&mut self, ids: Vec<String>) -> Result<()> {
        self.dispatch(Action::Reorder { ids }).await?;
        Ok(())
    }

    /// Drag a note from `from` to `to` within the view of `mode` under
    /// the current search. Returns false if nothing moved.
    pub async fn move_note(&mut self, mode: ViewMode, from: usize, to: usize) -> Result<bool> {
        self.dispatch_for_note(Action::Move { mode, from, to }).await
    }

    /// Set the search term. Not persisted.
    pub async fn set_search_query(&mut self, query: String) -> Result<()> {
        self.dispatch(Action::SetSearchQuery(query)).await?;
        Ok(())
    }

    async fn dispatch_for_note(&mut self, action: Action) -> Result<bool> {
        let outcome = self.dispatch(action).await?;
        Ok(outcome != Outcome::Unchanged)
    }

    /// All notes in collection order, including archived and deleted ones
    pub fn notes(&self) -> &[Note] {
        self.state.notes()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.state.get(id)
    }

    pub fn search_query(&self) -> &str {
        self.state.search_query()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Notes visible on `mode` under the current search
    pub fn view(&self, mode: ViewMode) -> Vec<&Note> {
        views::select(self.state.notes(), mode, self.state.search_query())
    }

    /// Number of notes visible on `mode` under the current search
    pub fn count(&self, mode: ViewMode) -> usize {
        views::count(self.state.notes(), mode, self.state.search_query())
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
