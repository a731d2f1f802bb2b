//! Noto library
//!
//! The note state core of the Noto notes client: the note model, the
//! action reducer, page views and key-value persistence.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AppError, Result};
pub use models::{Note, NoteUpdate};
pub use services::{Action, NoteStore, Outcome, ViewMode};
