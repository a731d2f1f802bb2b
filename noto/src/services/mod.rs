//! Services module
//!
//! The note store, its transition function and the page views derived
//! from it.

pub mod notes;
pub mod reducer;
pub mod views;

pub use notes::NoteStore;
pub use reducer::{reduce, Action, NotesState, Outcome};
pub use views::{count, select, ViewMode};
