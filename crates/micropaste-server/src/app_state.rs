// ABOUTME: Shared application state for the micropaste HTTP server.
// ABOUTME: Holds the entry store behind a mutex and the broadcast feed of new entries.

use std::sync::Arc;

use micropaste_core::Entry;
use micropaste_store::EntryStore;
use tokio::sync::{Mutex, broadcast};

/// Capacity of the new-entry broadcast channel. Slow subscribers miss
/// events rather than exerting backpressure on creators.
const FEED_CAPACITY: usize = 64;

/// Shared application state accessible by all Axum handlers. One store
/// (one database session) per process, serialized behind a mutex, plus
/// the broadcast sender feeding the SSE endpoint.
pub struct AppState {
    pub store: Mutex<EntryStore>,
    pub feed: broadcast::Sender<Entry>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wrap an opened store together with a fresh entry feed.
    pub fn new(store: EntryStore) -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            store: Mutex::new(store),
            feed,
        }
    }
}
