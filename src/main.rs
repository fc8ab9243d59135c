//! Notes viewer - a profile page and note reader for dev-notes APIs.
//!
//! This is the main entry point for the viewer web server.
//! The application is organized into the following modules:
//!
//! - `resolver`: Metadata URL resolution (query, overrides, stored preference)
//! - `fetch`: Direct fetch with `/proxy` fallback
//! - `markdown`: Restricted Markdown rendering and front-matter stripping
//! - `viewer` / `presentation` / `templates`: Page assembly and HTML
//! - `notes` / `api`: The server's own notes API
//! - `proxy`: The relay used for cross-origin fallbacks

use std::fs;
use std::sync::Arc;

use notes_viewer::{app, config::ServerConfig, store::SledStore, AppState};
use tracing::info;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    fs::create_dir_all(&config.notes_dir).ok();

    let store = SledStore::open(&config.db_path).expect("Failed to open settings database");

    let addr = config.addr;
    info!(public_url = %config.public_url, "notes viewer running at http://{}", addr);
    info!(notes_dir = %config.notes_dir.display(), "serving notes API");
    if config.proxy.allow_private {
        info!("proxy: private and loopback targets ALLOWED");
    }

    let state = Arc::new(
        AppState::new(config, Arc::new(store)).expect("Failed to build HTTP clients"),
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app(state)).await.expect("Server error");
}
