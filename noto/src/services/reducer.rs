//! Note state and its transition function
//!
//! Every change to the collection is an [`Action`] handled by [`reduce`].
//! `reduce` never touches storage; it reports through [`Outcome`] whether
//! the collection changed so the caller knows when to persist.
//!
//! Loading is not an action. Replacing the collection wholesale is only
//! done by the store at startup, from what storage already holds.

use super::views::{self, ViewMode};
use crate::config::DEFAULT_NOTE_COLOR;
use crate::error::{AppError, Result};
use crate::models::{Note, NoteUpdate};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// In-memory note state
#[derive(Debug, Clone)]
pub struct NotesState {
    notes: Vec<Note>,
    search_query: String,
    is_loading: bool,
    default_color: String,
}

impl NotesState {
    pub fn new(default_color: String) -> Self {
        Self {
            notes: Vec::new(),
            search_query: String::new(),
            is_loading: true,
            default_color,
        }
    }

    /// The collection in display order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// True until the persisted collection has been loaded
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }
}

impl Default for NotesState {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_COLOR.to_string())
    }
}

/// Requests the note collection understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add {
        title: String,
        content: String,
        color: Option<String>,
    },
    Update {
        id: String,
        changes: NoteUpdate,
    },
    ToggleImportant {
        id: String,
    },
    ToggleArchive {
        id: String,
    },
    /// Soft delete
    Delete {
        id: String,
    },
    Restore {
        id: String,
    },
    /// Permanent removal
    Purge {
        id: String,
    },
    /// Purge the notes currently listed in the bin, i.e. the deleted
    /// notes matching the search query
    EmptyBin,
    /// New order for the whole collection, as ids
    Reorder {
        ids: Vec<String>,
    },
    /// Drag a note from one position to another within a view.
    /// Indices refer to the view under the current search query.
    Move {
        mode: ViewMode,
        from: usize,
        to: usize,
    },
    SetSearchQuery(String),
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(String),
    /// Fields or order of the collection changed
    Changed,
    Purged(usize),
    SearchUpdated,
    /// Unknown id or nothing to do
    Unchanged,
}

impl Outcome {
    /// Whether the collection has to be written back
    pub fn persists(&self) -> bool {
        match self {
            Outcome::Added(_) | Outcome::Changed => true,
            Outcome::Purged(count) => *count > 0,
            Outcome::SearchUpdated | Outcome::Unchanged => false,
        }
    }
}

/// Replace the collection with one read from storage and clear the
/// loading flag. Returns how many notes were kept.
pub(crate) fn load(state: &mut NotesState, notes: Vec<Note>) -> usize {
    state.notes = dedupe(notes);
    state.is_loading = false;
    state.notes.len()
}

/// Apply `action` to `state` at time `now`
pub fn reduce(state: &mut NotesState, action: Action, now: DateTime<Utc>) -> Result<Outcome> {
    match action {
        Action::Add {
            title,
            content,
            color,
        } => {
            // Blank title and blank content would be an invisible card
            if title.trim().is_empty() && content.trim().is_empty() {
                return Err(AppError::EmptyNote);
            }

            // Newest first
            let color = color.unwrap_or_else(|| state.default_color.clone());
            let note = Note::new(title, content, color, now);
            let id = note.id.clone();
            state.notes.insert(0, note);

            Ok(Outcome::Added(id))
        }

        Action::Update { id, changes } => Ok(modify(state, &id, now, |note| {
            changes.apply_to(note)
        })),

        Action::ToggleImportant { id } => Ok(modify(state, &id, now, |note| {
            note.is_important = !note.is_important
        })),

        Action::ToggleArchive { id } => Ok(modify(state, &id, now, |note| {
            note.is_archived = !note.is_archived
        })),

        Action::Delete { id } => Ok(modify(state, &id, now, |note| note.is_deleted = true)),

        Action::Restore { id } => Ok(modify(state, &id, now, |note| note.is_deleted = false)),

        Action::Purge { id } => match state.notes.iter().position(|n| n.id == id) {
            Some(index) => {
                state.notes.remove(index);
                Ok(Outcome::Purged(1))
            }
            None => Ok(Outcome::Unchanged),
        },

        Action::EmptyBin => {
            // Only what the bin page shows under the current search goes
            let doomed: HashSet<String> =
                views::select(&state.notes, ViewMode::Bin, &state.search_query)
                    .into_iter()
                    .map(|n| n.id.clone())
                    .collect();

            state.notes.retain(|n| !doomed.contains(&n.id));
            Ok(Outcome::Purged(doomed.len()))
        }

        Action::Reorder { ids } => reorder(state, ids),

        Action::Move { mode, from, to } => Ok(move_within_view(state, mode, from, to)),

        Action::SetSearchQuery(query) => {
            state.search_query = query;
            Ok(Outcome::SearchUpdated)
        }
    }
}

/// Run `f` on the note with `id` and refresh its timestamp
fn modify<F>(state: &mut NotesState, id: &str, now: DateTime<Utc>, f: F) -> Outcome
where
    F: FnOnce(&mut Note),
{
    match state.get_mut(id) {
        Some(note) => {
            f(note);
            note.touch(now);
            Outcome::Changed
        }
        None => Outcome::Unchanged,
    }
}

/// Keep the first note for each id
fn dedupe(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());

    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                tracing::warn!("Dropping duplicate note id on load: {}", note.id);
            }
            fresh
        })
        .collect()
}

fn reorder(state: &mut NotesState, ids: Vec<String>) -> Result<Outcome> {
    // Every current note exactly once, nothing else
    if ids.len() != state.notes.len() {
        return Err(AppError::InvalidReorder(format!(
            "expected {} ids, got {}",
            state.notes.len(),
            ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in &ids {
        if !seen.insert(id.as_str()) {
            return Err(AppError::InvalidReorder(format!("duplicate id: {}", id)));
        }
        if state.get(id).is_none() {
            return Err(AppError::InvalidReorder(format!("unknown id: {}", id)));
        }
    }

    // Already in this order: nothing to write
    if state.notes.iter().map(|n| &n.id).eq(ids.iter()) {
        return Ok(Outcome::Unchanged);
    }

    // Rebuild from the existing notes so no field value can change
    let mut remaining = std::mem::take(&mut state.notes);
    for id in &ids {
        if let Some(index) = remaining.iter().position(|n| &n.id == id) {
            state.notes.push(remaining.swap_remove(index));
        }
    }

    Ok(Outcome::Changed)
}

fn move_within_view(state: &mut NotesState, mode: ViewMode, from: usize, to: usize) -> Outcome {
    let visible: Vec<String> = views::select(&state.notes, mode, &state.search_query)
        .into_iter()
        .map(|n| n.id.clone())
        .collect();

    if from == to || from >= visible.len() || to >= visible.len() {
        return Outcome::Unchanged;
    }

    // Pull the dragged note out of the full collection first, then find
    // where the drop target sits in what is left

    let Some(source) = state.notes.iter().position(|n| n.id == visible[from]) else {
        return Outcome::Unchanged;
    };
    let dragged = state.notes.remove(source);

    let Some(target) = state.notes.iter().position(|n| n.id == visible[to]) else {
        state.notes.insert(source, dragged);
        return Outcome::Unchanged;
    };

    // Moving down lands after the target, moving up lands before it
    let insert_at = if from < to { target + 1 } else { target };
    state.notes.insert(insert_at, dragged);

    Outcome::Changed
}
