//! Note model
//!
//! The persisted record layout is flat camelCase JSON, one object per note.

use crate::config::DEFAULT_NOTE_COLOR;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short text note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_archived: bool,
    /// Soft-delete marker; deleted notes only show up in the bin
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

impl Note {
    /// Build a fresh note with a time-ordered id and all flags cleared
    pub fn new(title: String, content: String, color: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title,
            content,
            color,
            is_important: false,
            is_archived: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`, keeping it strictly increasing even if the
    /// clock has not moved since the last change.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }

    /// Case-insensitive substring match on title or content.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub is_important: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_deleted: Option<bool>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.color.is_none()
            && self.is_important.is_none()
            && self.is_archived.is_none()
            && self.is_deleted.is_none()
    }

    /// Merge the provided fields into `note`
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(color) = self.color {
            note.color = color;
        }
        if let Some(is_important) = self.is_important {
            note.is_important = is_important;
        }
        if let Some(is_archived) = self.is_archived {
            note.is_archived = is_archived;
        }
        if let Some(is_deleted) = self.is_deleted {
            note.is_deleted = is_deleted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_layout_is_camel_case() {
        let now = Utc::now();
        let note = Note::new("Title".to_string(), "Body".to_string(), "#ffffff".to_string(), now);

        let value = serde_json::to_value(&note).unwrap();
        let object = value.as_object().unwrap();

        for field in [
            "id",
            "title",
            "content",
            "color",
            "isImportant",
            "isArchived",
            "isDeleted",
            "createdAt",
            "updatedAt",
        ] {
            assert!(object.contains_key(field), "missing field {}", field);
        }
        assert_eq!(object.len(), 9);
    }

    #[test]
    fn test_reads_sparse_records() {
        let json = r#"{
            "id": "1700000000000",
            "createdAt": "2024-01-05T10:00:00.000Z",
            "updatedAt": "2024-01-05T10:00:00.000Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.id, "1700000000000");
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
        assert_eq!(note.color, DEFAULT_NOTE_COLOR);
        assert!(!note.is_important && !note.is_archived && !note.is_deleted);
    }

    #[test]
    fn test_touch_is_strictly_increasing() {
        let now = Utc::now();
        let mut note = Note::new(String::new(), "x".to_string(), default_color(), now);

        note.touch(now);
        assert!(note.updated_at > now);

        let previous = note.updated_at;
        note.touch(now - Duration::seconds(5));
        assert!(note.updated_at > previous);
        assert!(note.created_at <= note.updated_at);
    }

    #[test]
    fn test_matches_title_or_content() {
        let note = Note::new(
            "Grocery List".to_string(),
            "Milk and eggs".to_string(),
            default_color(),
            Utc::now(),
        );

        assert!(note.matches("grocery"));
        assert!(note.matches("eggs"));
        assert!(!note.matches("meeting"));
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut note = Note::new(
            "Old".to_string(),
            "Body".to_string(),
            default_color(),
            Utc::now(),
        );

        NoteUpdate {
            title: Some("New".to_string()),
            is_important: Some(true),
            ..NoteUpdate::default()
        }
        .apply_to(&mut note);

        assert_eq!(note.title, "New");
        assert_eq!(note.content, "Body");
        assert!(note.is_important);
        assert!(!note.is_archived);
    }
}
