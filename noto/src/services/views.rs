//! View selection
//!
//! Derives the ordered, visible subset of the collection for each page.
//! Views are recomputed on every read; nothing here holds state.

use crate::error::AppError;
use crate::models::Note;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four fixed pages notes are shown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    All,
    Important,
    Archive,
    Bin,
}

impl ViewMode {
    pub const ALL_MODES: [ViewMode; 4] = [
        ViewMode::All,
        ViewMode::Important,
        ViewMode::Archive,
        ViewMode::Bin,
    ];

    /// Whether `note` belongs on this page, ignoring search
    pub fn includes(self, note: &Note) -> bool {
        match self {
            // Deleted wins over every other flag
            ViewMode::All => !note.is_deleted && !note.is_archived,
            ViewMode::Important => note.is_important && !note.is_deleted && !note.is_archived,
            ViewMode::Archive => note.is_archived && !note.is_deleted,
            ViewMode::Bin => note.is_deleted,
        }
    }

    /// Route path of the page
    pub fn route(self) -> &'static str {
        match self {
            ViewMode::All => "/",
            ViewMode::Important => "/important",
            ViewMode::Archive => "/archive",
            ViewMode::Bin => "/bin",
        }
    }

    /// Page heading
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::All => "All Notes",
            ViewMode::Important => "Important Notes",
            ViewMode::Archive => "Archive",
            ViewMode::Bin => "Bin",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ViewMode::All => "all",
            ViewMode::Important => "important",
            ViewMode::Archive => "archive",
            ViewMode::Bin => "bin",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts route paths ("/", "/archive") and names ("all", "home", "Bin")
impl FromStr for ViewMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "/archive" and "archive" name the same page
        let name = trimmed.strip_prefix('/').unwrap_or(trimmed).to_lowercase();

        match name.as_str() {
            "" | "all" | "home" => Ok(ViewMode::All),
            "important" => Ok(ViewMode::Important),
            "archive" => Ok(ViewMode::Archive),
            "bin" => Ok(ViewMode::Bin),
            _ => Err(AppError::InvalidViewMode(s.to_string())),
        }
    }
}

/// Lowercased search needle, or `None` when the query is blank
fn search_needle(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Notes visible on `mode` under `query`, in collection order
pub fn select<'a>(notes: &'a [Note], mode: ViewMode, query: &str) -> Vec<&'a Note> {
    let needle = search_needle(query);

    // Page filter first, then search; order is the collection's
    notes
        .iter()
        .filter(|note| mode.includes(note))
        .filter(|note| needle.as_deref().map_or(true, |n| note.matches(n)))
        .collect()
}

/// Number of notes `select` would return
pub fn count(notes: &[Note], mode: ViewMode, query: &str) -> usize {
    let needle = search_needle(query);

    notes
        .iter()
        .filter(|note| mode.includes(note) && needle.as_deref().map_or(true, |n| note.matches(n)))
        .count()
}
