// ABOUTME: SQLite-backed entry store implementing create, list, update, and delete.
// ABOUTME: Mutations are secret-gated; public listing uses a keyset cursor with opaque tokens.

use std::path::Path;

use chrono::{DateTime, Utc};
use micropaste_core::{CreateEntry, Entry, UpdateEntry};
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use thiserror::Error;
use ulid::Ulid;

/// Fixed number of entries returned per list page.
pub const RESULTS_PER_PAGE: usize = 10;

/// Errors that can occur during entry store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry not found")]
    NotFound,

    #[error("invalid secret code")]
    InvalidSecret,

    #[error("invalid page token")]
    InvalidPageToken,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// One page of public entries plus the continuation token for the next page.
#[derive(Debug, Serialize)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    /// Fixed page-size hint, always [`RESULTS_PER_PAGE`].
    pub count: usize,
    /// Opaque token that resumes the scan after the last entry of this
    /// page; null once the scan is exhausted. Callers must not parse it.
    pub next_page: Option<String>,
}

/// Sole owner of the persistent entries table. Translates domain
/// operations into SQL and rows back into [`Entry`] values.
pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    /// Open or create the entries database at the given path. Schema
    /// creation is idempotent and runs before any request is served.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        // Newest-first public listing is a forward scan of this index,
        // the SQLite analogue of partitioning by visibility and
        // clustering by creation time.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                title TEXT,
                body TEXT NOT NULL,
                expires TEXT,
                private INTEGER NOT NULL DEFAULT 0,
                creation_timestamp INTEGER NOT NULL,
                secret TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_public_feed
                ON entries (private, creation_timestamp DESC, id DESC);",
        )?;

        tracing::info!("opened entries database at {}", path.display());

        Ok(Self { conn })
    }

    /// Insert a new entry built from the request. Returns the full entry
    /// including the secret, for one-time disclosure to the creator.
    pub fn create_entry(&self, req: &CreateEntry) -> Result<Entry, StoreError> {
        let entry = Entry::new(req);

        self.conn.execute(
            "INSERT INTO entries (id, title, body, expires, private, creation_timestamp, secret)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id.to_string(),
                entry.title,
                entry.body,
                entry.expires.map(|d| d.to_rfc3339()),
                entry.is_private,
                entry.creation_timestamp,
                entry.secret,
            ],
        )?;

        Ok(entry)
    }

    /// List public entries newest-first, ten per page. `page` is the
    /// continuation token from a previous call; absent or empty starts
    /// from the newest entry. Secrets are never included.
    pub fn list_public(&self, page: Option<&str>) -> Result<EntryPage, StoreError> {
        // Fetch one row beyond the page to learn whether more remain.
        let fetch = (RESULTS_PER_PAGE + 1) as i64;
        let mut entries = Vec::new();

        match page.filter(|p| !p.is_empty()) {
            Some(token) => {
                let (ts, id) = decode_page_token(token)?;
                let mut stmt = self.conn.prepare(
                    "SELECT id, title, body, expires, private, creation_timestamp, secret
                     FROM entries
                     WHERE private = 0
                       AND (creation_timestamp < ?1
                            OR (creation_timestamp = ?1 AND id < ?2))
                     ORDER BY creation_timestamp DESC, id DESC
                     LIMIT ?3",
                )?;
                let rows = stmt.query_map(params![ts, id.to_string(), fetch], |row| {
                    row_to_entry(row, false)
                })?;
                for row in rows {
                    entries.push(row?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, title, body, expires, private, creation_timestamp, secret
                     FROM entries
                     WHERE private = 0
                     ORDER BY creation_timestamp DESC, id DESC
                     LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![fetch], |row| row_to_entry(row, false))?;
                for row in rows {
                    entries.push(row?);
                }
            }
        }

        let next_page = if entries.len() > RESULTS_PER_PAGE {
            entries.truncate(RESULTS_PER_PAGE);
            entries.last().map(encode_page_token)
        } else {
            None
        };

        Ok(EntryPage {
            entries,
            count: RESULTS_PER_PAGE,
            next_page,
        })
    }

    /// Fetch a single entry by id, with or without its secret.
    fn get_entry(&self, id: &Ulid, with_secret: bool) -> Result<Option<Entry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, body, expires, private, creation_timestamp, secret
             FROM entries WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id.to_string()], |row| row_to_entry(row, with_secret));

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    /// Update the fields supplied in the request, leaving the rest
    /// unchanged. Requires the entry's secret code. Returns the
    /// post-update entry without its secret.
    pub fn update_entry(&self, id: &Ulid, req: &UpdateEntry) -> Result<Entry, StoreError> {
        let existing = self.get_entry(id, true)?.ok_or(StoreError::NotFound)?;
        check_secret(&existing, req.secret.as_deref())?;

        let title = match &req.title {
            Some(value) => value.clone(),
            None => existing.title.clone(),
        };
        let body = req.body.clone().unwrap_or_else(|| existing.body.clone());
        let expires = match req.expires {
            Some(value) => value,
            None => existing.expires,
        };
        let is_private = req.is_private.unwrap_or(existing.is_private);

        // The creation timestamp never changes; together with the id it
        // locates the physical row being rewritten.
        self.conn.execute(
            "UPDATE entries SET title = ?1, body = ?2, expires = ?3, private = ?4
             WHERE id = ?5 AND creation_timestamp = ?6",
            params![
                title,
                body,
                expires.map(|d| d.to_rfc3339()),
                is_private,
                id.to_string(),
                existing.creation_timestamp,
            ],
        )?;

        self.get_entry(id, false)?.ok_or(StoreError::NotFound)
    }

    /// Remove an entry after verifying its secret code. Returns the
    /// deleted entry, secret included, as confirmation.
    pub fn delete_entry(&self, id: &Ulid, secret: Option<&str>) -> Result<Entry, StoreError> {
        let existing = self.get_entry(id, true)?.ok_or(StoreError::NotFound)?;
        check_secret(&existing, secret)?;

        self.conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND creation_timestamp = ?2",
            params![id.to_string(), existing.creation_timestamp],
        )?;

        Ok(existing)
    }
}

/// Exact string match against the stored secret. Anything else, including
/// a missing secret, is rejected.
fn check_secret(entry: &Entry, supplied: Option<&str>) -> Result<(), StoreError> {
    match (entry.secret.as_deref(), supplied) {
        (Some(expected), Some(given)) if expected == given => Ok(()),
        _ => Err(StoreError::InvalidSecret),
    }
}

fn encode_page_token(entry: &Entry) -> String {
    format!("{}:{}", entry.creation_timestamp, entry.id)
}

fn decode_page_token(token: &str) -> Result<(i64, Ulid), StoreError> {
    let (ts, id) = token.split_once(':').ok_or(StoreError::InvalidPageToken)?;
    let ts = ts.parse::<i64>().map_err(|_| StoreError::InvalidPageToken)?;
    let id = id.parse::<Ulid>().map_err(|_| StoreError::InvalidPageToken)?;
    Ok((ts, id))
}

fn row_to_entry(row: &Row<'_>, with_secret: bool) -> rusqlite::Result<Entry> {
    let id: String = row.get(0)?;
    let id = id.parse::<Ulid>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let expires: Option<String> = row.get(3)?;
    let expires = match expires {
        Some(s) => Some(
            DateTime::parse_from_rfc3339(&s)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(Entry {
        id,
        title: row.get(1)?,
        body: row.get(2)?,
        expires,
        is_private: row.get(4)?,
        creation_timestamp: row.get(5)?,
        secret: if with_secret { Some(row.get(6)?) } else { None },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, EntryStore) {
        let dir = TempDir::new().unwrap();
        let store = EntryStore::open(&dir.path().join("entries.db")).unwrap();
        (dir, store)
    }

    fn create_req(body: &str) -> CreateEntry {
        CreateEntry {
            body: Some(body.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_returns_generated_fields_and_defaults_private() {
        let (_dir, store) = test_store();

        let entry = store.create_entry(&create_req("x")).unwrap();

        assert_eq!(entry.body, "x");
        assert!(!entry.is_private);
        assert!(entry.creation_timestamp > 0);
        assert!(!entry.id.to_string().is_empty());
        assert!(!entry.secret.as_deref().unwrap().is_empty());
    }

    #[test]
    fn list_excludes_private_entries_and_secrets() {
        let (_dir, store) = test_store();

        store.create_entry(&create_req("public")).unwrap();
        store
            .create_entry(&CreateEntry {
                body: Some("hidden".to_string()),
                is_private: Some(true),
                ..Default::default()
            })
            .unwrap();

        let page = store.list_public(None).unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].body, "public");
        assert!(page.entries.iter().all(|e| e.secret.is_none()));
        assert_eq!(page.count, RESULTS_PER_PAGE);
        assert!(page.next_page.is_none());
    }

    #[test]
    fn list_paginates_newest_first_in_three_pages() {
        let (_dir, store) = test_store();

        for i in 0..25 {
            store.create_entry(&create_req(&format!("entry {i}"))).unwrap();
        }

        let first = store.list_public(None).unwrap();
        assert_eq!(first.entries.len(), 10);
        let token = first.next_page.clone().expect("first page should continue");

        let second = store.list_public(Some(&token)).unwrap();
        assert_eq!(second.entries.len(), 10);
        let token = second.next_page.clone().expect("second page should continue");

        let third = store.list_public(Some(&token)).unwrap();
        assert_eq!(third.entries.len(), 5);
        assert!(third.next_page.is_none(), "scan should be exhausted");

        // The three pages cover all 25 entries exactly once, in
        // non-increasing creation order.
        let mut seen: Vec<&Entry> = Vec::new();
        seen.extend(&first.entries);
        seen.extend(&second.entries);
        seen.extend(&third.entries);
        assert_eq!(seen.len(), 25);

        let mut ids: Vec<String> = seen.iter().map(|e| e.id.to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);

        for pair in seen.windows(2) {
            assert!(pair[0].creation_timestamp >= pair[1].creation_timestamp);
        }
    }

    #[test]
    fn list_rejects_malformed_page_token() {
        let (_dir, store) = test_store();

        let err = store.list_public(Some("not a token")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidPageToken));
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let (_dir, store) = test_store();

        let created = store
            .create_entry(&CreateEntry {
                title: Some("old title".to_string()),
                body: Some("old body".to_string()),
                ..Default::default()
            })
            .unwrap();

        let updated = store
            .update_entry(
                &created.id,
                &UpdateEntry {
                    secret: created.secret.clone(),
                    title: Some(Some("new title".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("new title"));
        assert_eq!(updated.body, "old body");
        assert_eq!(updated.expires, created.expires);
        assert_eq!(updated.is_private, created.is_private);
        assert_eq!(updated.creation_timestamp, created.creation_timestamp);
        assert!(updated.secret.is_none(), "update response omits the secret");
    }

    #[test]
    fn update_clears_title_on_explicit_null() {
        let (_dir, store) = test_store();

        let created = store
            .create_entry(&CreateEntry {
                title: Some("going away".to_string()),
                body: Some("b".to_string()),
                ..Default::default()
            })
            .unwrap();

        let updated = store
            .update_entry(
                &created.id,
                &UpdateEntry {
                    secret: created.secret.clone(),
                    title: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.title.is_none());
        assert_eq!(updated.body, "b");
    }

    #[test]
    fn update_with_wrong_secret_leaves_entry_unmodified() {
        let (_dir, store) = test_store();

        let created = store.create_entry(&create_req("untouched")).unwrap();

        let err = store
            .update_entry(
                &created.id,
                &UpdateEntry {
                    secret: Some("wrong".to_string()),
                    body: Some("changed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSecret));

        let err = store
            .update_entry(
                &created.id,
                &UpdateEntry {
                    body: Some("changed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSecret));

        let page = store.list_public(None).unwrap();
        assert_eq!(page.entries[0].body, "untouched");
    }

    #[test]
    fn update_missing_entry_is_not_found() {
        let (_dir, store) = test_store();

        let err = store
            .update_entry(
                &Ulid::new(),
                &UpdateEntry {
                    secret: Some("s".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn update_round_trip_preserves_original_values() {
        let (_dir, store) = test_store();

        let created = store
            .create_entry(&CreateEntry {
                title: Some("t".to_string()),
                body: Some("b".to_string()),
                expires: Some("2027-01-01T00:00:00Z".parse().unwrap()),
                is_private: Some(false),
            })
            .unwrap();

        let updated = store
            .update_entry(
                &created.id,
                &UpdateEntry {
                    secret: created.secret.clone(),
                    title: Some(created.title.clone()),
                    body: Some(created.body.clone()),
                    expires: Some(created.expires),
                    is_private: Some(created.is_private),
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.body, created.body);
        assert_eq!(updated.expires, created.expires);
        assert_eq!(updated.is_private, created.is_private);
        assert_eq!(updated.creation_timestamp, created.creation_timestamp);
    }

    #[test]
    fn delete_removes_entry_and_returns_it_with_secret() {
        let (_dir, store) = test_store();

        let created = store.create_entry(&create_req("doomed")).unwrap();

        let deleted = store
            .delete_entry(&created.id, created.secret.as_deref())
            .unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.secret, created.secret);

        let page = store.list_public(None).unwrap();
        assert!(page.entries.is_empty());

        let err = store
            .delete_entry(&created.id, created.secret.as_deref())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn delete_with_wrong_secret_keeps_entry() {
        let (_dir, store) = test_store();

        let created = store.create_entry(&create_req("safe")).unwrap();

        let err = store.delete_entry(&created.id, Some("wrong")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSecret));

        let page = store.list_public(None).unwrap();
        assert_eq!(page.entries.len(), 1);
    }
}
