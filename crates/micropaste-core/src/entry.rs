// ABOUTME: Defines the Entry struct representing a single stored paste.
// ABOUTME: Entries carry server-generated id, secret, and creation timestamp plus user content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::request::CreateEntry;

/// A single stored paste. The `id` and `secret` are independently generated
/// ULIDs; the secret is required to mutate or delete the entry and is
/// serialized only when present, so public views simply leave it unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Ulid,
    pub title: Option<String>,
    pub body: String,
    pub expires: Option<DateTime<Utc>>,
    #[serde(rename = "private")]
    pub is_private: bool,
    /// Epoch milliseconds, immutable after creation. Together with the
    /// visibility flag this determines list ordering and acts as part of
    /// the row locator for mutations.
    pub creation_timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Entry {
    /// Build a fresh entry from a create request. Generates the id and
    /// secret and stamps the current wall-clock time; `private` defaults
    /// to false when absent. Body validation is the HTTP layer's job.
    pub fn new(req: &CreateEntry) -> Self {
        Self {
            id: Ulid::new(),
            title: req.title.clone(),
            body: req.body.clone().unwrap_or_default(),
            expires: req.expires,
            is_private: req.is_private.unwrap_or(false),
            creation_timestamp: Utc::now().timestamp_millis(),
            secret: Some(Ulid::new().to_string()),
        }
    }

    /// Copy of this entry with the secret removed, for public responses.
    pub fn without_secret(mut self) -> Self {
        self.secret = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_sets_generated_fields() {
        let req = CreateEntry {
            title: Some("hello".to_string()),
            body: Some("world".to_string()),
            expires: None,
            is_private: None,
        };
        let entry = Entry::new(&req);

        assert_eq!(entry.title.as_deref(), Some("hello"));
        assert_eq!(entry.body, "world");
        assert!(!entry.is_private);
        assert!(entry.creation_timestamp > 0);
        let secret = entry.secret.as_deref().unwrap();
        assert!(secret.parse::<Ulid>().is_ok());
        // id and secret come from separate generator calls
        assert_ne!(entry.id.to_string(), secret);
    }

    #[test]
    fn new_entries_get_distinct_ids() {
        let req = CreateEntry {
            title: None,
            body: Some("x".to_string()),
            expires: None,
            is_private: Some(true),
        };
        let a = Entry::new(&req);
        let b = Entry::new(&req);

        assert_ne!(a.id, b.id);
        assert_ne!(a.secret, b.secret);
        assert!(a.is_private);
    }

    #[test]
    fn secret_is_omitted_from_json_when_absent() {
        let req = CreateEntry {
            title: None,
            body: Some("x".to_string()),
            expires: None,
            is_private: None,
        };
        let entry = Entry::new(&req).without_secret();
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("secret").is_none());
        assert_eq!(json["private"], false);
        assert!(json["creation_timestamp"].is_i64());
    }
}
