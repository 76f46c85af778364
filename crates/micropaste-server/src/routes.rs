// ABOUTME: Route definitions for the micropaste HTTP API.
// ABOUTME: Assembles the entry CRUD and feed routes into a single Axum Router with shared state.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/entries",
            get(api::entries::list_entries).post(api::entries::create_entry),
        )
        .route(
            "/entries/{id}",
            axum::routing::put(api::entries::update_entry).delete(api::entries::delete_entry),
        )
        .route("/entries/feed", get(api::stream::entries_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::Request;
    use micropaste_store::EntryStore;
    use tower::ServiceExt;

    use super::*;
    use crate::app_state::AppState;

    #[tokio::test]
    async fn health_returns_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = EntryStore::open(&dir.path().join("entries.db")).unwrap();
        let app = create_router(Arc::new(AppState::new(store)));

        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
