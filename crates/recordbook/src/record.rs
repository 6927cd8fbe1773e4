//! Core record types for recordbook.
//!
//! A record is a keyword/description pair stamped with the time it was last
//! written. Users only ever supply the two text fields, as a
//! [`RecordDraft`]; ids and timestamps are assigned by the store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::Field;

/// Stable identifier of a record, assigned by the store on append.
///
/// Ids are never reused within a store, so a selection keyed by id stays
/// attached to the same record while other rows move around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The user-editable part of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Short keyword.
    pub keyword: String,
    /// Free-text description.
    pub description: String,
}

impl RecordDraft {
    /// Create a draft from its two fields.
    #[must_use]
    pub fn new(keyword: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            description: description.into(),
        }
    }

    /// The value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Keyword => &self.keyword,
            Field::Description => &self.description,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Keyword => &mut self.keyword,
            Field::Description => &mut self.description,
        };
        *slot = value.into();
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: RecordId,

    /// Short keyword.
    pub keyword: String,

    /// Free-text description.
    pub description: String,

    /// When the record was created or last updated.
    pub timestamp: DateTime<Utc>,
}

impl Record {
    /// Build a record from a draft.
    #[must_use]
    pub fn new(id: RecordId, draft: RecordDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            keyword: draft.keyword,
            description: draft.description,
            timestamp,
        }
    }

    /// The editable fields of this record, for pre-filling an edit form.
    #[must_use]
    pub fn draft(&self) -> RecordDraft {
        RecordDraft::new(self.keyword.clone(), self.description.clone())
    }

    /// The value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Keyword => &self.keyword,
            Field::Description => &self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::new(42).to_string(), "#42");
        assert_eq!(RecordId::new(42).get(), 42);
    }

    #[test]
    fn test_record_id_ordering() {
        assert!(RecordId::new(1) < RecordId::new(2));
    }

    #[test]
    fn test_draft_set_and_value() {
        let mut draft = RecordDraft::default();
        draft.set(Field::Keyword, "fox");
        draft.set(Field::Description, "jumps");

        assert_eq!(draft.value(Field::Keyword), "fox");
        assert_eq!(draft.value(Field::Description), "jumps");
        assert_eq!(draft, RecordDraft::new("fox", "jumps"));
    }

    #[test]
    fn test_record_new_and_draft() {
        let record = Record::new(RecordId::new(1), RecordDraft::new("cat", "meows"), sample_time());

        assert_eq!(record.keyword, "cat");
        assert_eq!(record.value(Field::Description), "meows");
        assert_eq!(record.draft(), RecordDraft::new("cat", "meows"));
    }

    #[test]
    fn test_record_serialization() {
        let record = Record::new(RecordId::new(3), RecordDraft::new("cat", "meows"), sample_time());

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":3"));
        assert!(json.contains("2024-03-01T12:30:00Z"));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_draft_deserialize() {
        let draft: RecordDraft =
            serde_json::from_str(r#"{"keyword": "owl", "description": "hoots"}"#).unwrap();
        assert_eq!(draft, RecordDraft::new("owl", "hoots"));
    }
}
