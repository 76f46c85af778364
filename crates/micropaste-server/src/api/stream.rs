// ABOUTME: SSE feed handler streaming each newly created entry to subscribers.
// ABOUTME: Subscribes to the app-wide broadcast channel and converts entries to SSE events.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use micropaste_core::Entry;
use tokio_stream::wrappers::BroadcastStream;

use crate::app_state::SharedState;

/// Convert a broadcast receiver into an SSE-compatible stream. Each new
/// entry arrives as an `entry_created` event carrying the full entry JSON,
/// secret included, exactly as returned to the creator.
fn feed_stream_from_receiver(
    rx: tokio::sync::broadcast::Receiver<Entry>,
) -> impl Stream<Item = Result<SseEvent, axum::Error>> {
    BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(entry) => {
                let data = serde_json::to_string(&entry).ok()?;
                Some(Ok(SseEvent::default().event("entry_created").data(data)))
            }
            // Lagged receivers skip what they missed; delivery is best-effort.
            Err(_) => None,
        }
    })
}

/// GET /entries/feed - SSE endpoint delivering every newly created entry.
pub async fn entries_feed(State(state): State<SharedState>) -> impl IntoResponse {
    let rx = state.feed.subscribe();
    let stream = feed_stream_from_receiver(rx);

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}
