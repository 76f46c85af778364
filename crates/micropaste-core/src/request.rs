// ABOUTME: Typed request structs for the create, update, and delete operations.
// ABOUTME: Models optional fields explicitly, including tri-state (absent/null/value) updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Request to create a new entry. `body` is required by the HTTP contract
/// but stays optional here so the handler can report its absence with a
/// specific error message instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEntry {
    pub title: Option<String>,
    pub body: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    #[serde(rename = "private", default, deserialize_with = "boolish")]
    pub is_private: Option<bool>,
}

/// Request to update an existing entry. Only supplied fields change: an
/// absent field is left unchanged, while an explicit null clears a
/// nullable one. `body` cannot be cleared, only replaced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntry {
    pub secret: Option<String>,
    #[serde(default, deserialize_with = "tristate")]
    pub title: Option<Option<String>>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "tristate")]
    pub expires: Option<Option<DateTime<Utc>>>,
    #[serde(rename = "private", default, deserialize_with = "boolish")]
    pub is_private: Option<bool>,
}

/// Request to delete an entry. Carries only the secret code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteEntry {
    pub secret: Option<String>,
}

/// Accepts JSON booleans as well as the string forms that arrive via
/// form-encoded bodies. "true", "1", and "yes" are true; anything else
/// present is false.
fn boolish<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Boolish {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Boolish>::deserialize(deserializer)? {
        None => None,
        Some(Boolish::Bool(b)) => Some(b),
        Some(Boolish::Text(s)) => Some(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )),
    })
}

/// Distinguishes a field that was present-but-null from one that was
/// absent entirely. Absent fields fall back to the serde default (None);
/// present fields deserialize to Some(inner).
fn tristate<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
