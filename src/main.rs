// ABOUTME: Entry point for the micropaste binary.
// ABOUTME: Loads configuration, opens the entry store, and starts the HTTP server.

use std::sync::Arc;

use micropaste_server::{AppState, MicropasteConfig, create_router};
use micropaste_store::EntryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "micropaste=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let config = MicropasteConfig::from_env()?;

    // Schema creation happens inside open(), before any request is served
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = EntryStore::open(&config.db_path)?;

    let state = Arc::new(AppState::new(store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("micropaste listening on {}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
