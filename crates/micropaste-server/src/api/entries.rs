// ABOUTME: Entry CRUD API handlers for creating, listing, updating, and deleting pastes.
// ABOUTME: Handlers normalize input shape and status codes; the store owns the semantics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use micropaste_core::{CreateEntry, DeleteEntry, UpdateEntry};
use serde::Deserialize;
use ulid::Ulid;

use crate::api::{PrettyJson, error_response, store_error_response};
use crate::app_state::SharedState;
use crate::extract::JsonOrForm;

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// POST /entries - Register a new entry. Requires a non-empty `body`;
/// `title`, `expires`, and `private` are optional. The response includes
/// the secret code, disclosed only this once, and the entry is published
/// to the live feed.
pub async fn create_entry(
    State(state): State<SharedState>,
    JsonOrForm(req): JsonOrForm<CreateEntry>,
) -> Response {
    if req.body.as_deref().is_none_or(str::is_empty) {
        return error_response(StatusCode::BAD_REQUEST, "'body' parameter is not provided");
    }

    let entry = {
        let store = state.store.lock().await;
        match store.create_entry(&req) {
            Ok(entry) => entry,
            Err(e) => return store_error_response(e),
        }
    };

    // Best-effort publish; a create never fails because nobody is listening.
    let _ = state.feed.send(entry.clone());

    PrettyJson(entry).into_response()
}

/// GET /entries - A paginated list of public entries sorted by creation
/// date in descending order. `page` is the opaque continuation token from
/// a previous response.
pub async fn list_entries(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let store = state.store.lock().await;
    match store.list_public(query.page.as_deref()) {
        Ok(page) => PrettyJson(page).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// PUT /entries/{id} - Update an existing entry. Accepts the same fields
/// as create plus the required `secret` code for that entry.
pub async fn update_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonOrForm(req): JsonOrForm<UpdateEntry>,
) -> Response {
    if req.secret.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "'secret' parameter is required to update entry",
        );
    }

    let id = match id.parse::<Ulid>() {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "invalid entry id"),
    };

    let store = state.store.lock().await;
    match store.update_entry(&id, &req) {
        Ok(entry) => PrettyJson(entry).into_response(),
        Err(e) => store_error_response(e),
    }
}

/// DELETE /entries/{id} - Remove an existing entry. Requires the secret
/// code; responds with the removed entry as confirmation.
pub async fn delete_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    JsonOrForm(req): JsonOrForm<DeleteEntry>,
) -> Response {
    if req.secret.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "'secret' parameter is required to delete entry",
        );
    }

    let id = match id.parse::<Ulid>() {
        Ok(id) => id,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "invalid entry id"),
    };

    let store = state.store.lock().await;
    match store.delete_entry(&id, req.secret.as_deref()) {
        Ok(entry) => PrettyJson(entry).into_response(),
        Err(e) => store_error_response(e),
    }
}
