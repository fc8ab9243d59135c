//! HTTP route handlers for the viewer page.

use crate::resolver::{LEGACY_API_QUERY_PARAM, META_QUERY_PARAM};
use crate::templates::render_viewer;
use crate::AppState;
use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub const NOTE_QUERY_PARAM: &str = "note";

fn has_value(query: &HashMap<String, String>, key: &str) -> bool {
    query.get(key).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

// ============================================================================
// Index Handler
// ============================================================================

pub async fn index(
    Query(query): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let meta_url = state.resolver(&query).resolve();
    let selected = query.get(NOTE_QUERY_PARAM).map(String::as_str);

    let page = state.viewer.load(&meta_url, selected).await;

    // Keep an explicitly requested source on note links.
    let explicit = has_value(&query, META_QUERY_PARAM) || has_value(&query, LEGACY_API_QUERY_PARAM);
    let meta_param = explicit.then_some(meta_url.as_str());

    Html(render_viewer(&page, meta_param))
}

// ============================================================================
// Settings Handler
// ============================================================================

#[derive(Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub meta: String,
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingsForm>,
) -> Redirect {
    let url = form.meta.trim();
    if !url.is_empty() {
        let resolver = state.resolver(&HashMap::new());
        resolver.save(url);
        info!(url, "saved metadata URL");
    }
    Redirect::to("/")
}
