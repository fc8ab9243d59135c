//! Notes viewer library - re-exports for testing and external use.
//!
//! The viewer resolves a metadata URL, fetches the profile and the notes
//! list from it (falling back to the local `/proxy` relay when a direct
//! request fails) and renders the selected note from a restricted Markdown
//! dialect. The same server also publishes its own notes directory through
//! the metadata/notes API.

use axum::{
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod markdown;
pub mod models;
pub mod notes;
pub mod presentation;
pub mod proxy;
pub mod resolver;
pub mod store;
pub mod templates;
pub mod url_validator;
pub mod viewer;

use config::ServerConfig;
use fetch::Fetcher;
use resolver::ConfigResolver;
use store::MetaStore;
use viewer::Viewer;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn MetaStore>,
    pub viewer: Viewer,
    /// Client used by the relay.
    pub proxy_client: reqwest::Client,
}

/// Timeout for every outbound request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound client. Redirects are only followed when private targets are
/// allowed, so a redirect cannot bypass target validation.
fn outbound_client(allow_private: bool) -> Result<reqwest::Client, reqwest::Error> {
    let redirect = if allow_private {
        reqwest::redirect::Policy::default()
    } else {
        reqwest::redirect::Policy::none()
    };
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .redirect(redirect)
        .build()
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn MetaStore>) -> Result<Self, reqwest::Error> {
        let page = config.public_url.clone();
        let fetcher = Fetcher::with_client(outbound_client(config.proxy.allow_private)?, page.clone())
            .with_policy(config.proxy.clone());
        let viewer = Viewer::new(fetcher, page);
        let proxy_client = outbound_client(config.proxy.allow_private)?;

        Ok(Self {
            config,
            store,
            viewer,
            proxy_client,
        })
    }

    /// Resolver for one request: its query first, then the process-wide chain.
    pub fn resolver(&self, query: &HashMap<String, String>) -> ConfigResolver {
        ConfigResolver::standard(
            self.config.public_url.clone(),
            query,
            &self.config.overrides,
            self.store.clone(),
        )
    }
}

// ============================================================================
// Router
// ============================================================================

/// The notes API is readable from any origin. The viewer and the relay are not.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(api::health))
        .route("/metadata", get(api::metadata))
        .route("/notes", get(api::list_notes))
        .route("/notes/{slug}", get(api::get_note))
        .layer(CorsLayer::permissive())
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Viewer
        .route("/", get(handlers::index))
        .route("/settings", post(handlers::save_settings))
        // Relay
        .route("/proxy", get(proxy::proxy))
        // Notes API
        .merge(api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use fetch::{Resource, ResourceFormat};
pub use markdown::{escape_html, render, strip_front_matter};
pub use models::{Contact, FileList, Metadata, NoteListItem, NotesListResponse, OtherLink, Profile};
pub use presentation::{display_name, note_title, ContactLink, NoteEntry, ProfileCard};
pub use resolver::{derive_origin, normalize_url, CandidateSource, FixedValue, Overrides, StoredValue};
pub use store::{MemoryStore, SledStore};
