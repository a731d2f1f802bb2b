//! Error types for Noto
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized for the presentation layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("A note needs a title or some content")]
    EmptyNote,

    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("Unknown view mode: {0}")]
    InvalidViewMode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_display_string() {
        let err = AppError::InvalidReorder("unknown id: 42".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#""Invalid reorder: unknown id: 42""#);
    }
}
