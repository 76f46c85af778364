// ABOUTME: HTTP server for micropaste, providing the entries REST API and SSE feed.
// ABOUTME: Uses Axum with a shared entry store and a broadcast channel for new entries.

pub mod api;
pub mod app_state;
pub mod config;
pub mod extract;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, MicropasteConfig};
pub use routes::create_router;
