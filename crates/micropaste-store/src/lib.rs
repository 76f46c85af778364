// ABOUTME: Persistence layer for micropaste, owning the entries table and its queries.
// ABOUTME: Provides the SQLite-backed entry store with secret-gated mutations and pagination.

pub mod sqlite;

pub use sqlite::{EntryPage, EntryStore, RESULTS_PER_PAGE, StoreError};
