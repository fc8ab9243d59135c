//! Notes API: metadata document, notes catalog and raw note files.
//!
//! These routes publish the server's own content directory in the format
//! the viewer consumes, so a fresh install resolves `<origin>/metadata`
//! against itself.

use crate::models::{Contact, FileList, Metadata, NotesListResponse, Profile};
use crate::notes::{load_all_notes, load_note, read_raw, to_list_item};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::warn;

pub const METADATA_VERSION: &str = "1.0.0";
pub const PROFILE_FILE: &str = "profile.json";
const DEFAULT_PROFILE_NAME: &str = "Dev Notes";

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "ts": Utc::now().to_rfc3339() }))
}

/// `profile.json` from the content directory, or a minimal default.
pub fn load_profile(notes_dir: &FsPath, website: &str) -> Profile {
    let path = notes_dir.join(PROFILE_FILE);
    match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(profile) => return profile,
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring malformed profile"),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot read profile"),
    }

    Profile {
        name: Some(DEFAULT_PROFILE_NAME.to_string()),
        avatar: None,
        contact: Some(Contact {
            website: Some(website.to_string()),
            ..Contact::default()
        }),
    }
}

pub async fn metadata(State(state): State<Arc<AppState>>) -> Json<Metadata> {
    let config = &state.config;
    let base = config.public_url.as_str().trim_end_matches('/');
    let last_updated = load_all_notes(&config.notes_dir, false)
        .first()
        .map(|n| n.date);

    Json(Metadata {
        version: Some(METADATA_VERSION.to_string()),
        profile: Some(load_profile(&config.notes_dir, base)),
        file_list: Some(FileList {
            url: Some(config.notes_url()),
            format: Some("json".to_string()),
            last_updated: last_updated.or_else(|| Some(Utc::now())),
        }),
    })
}

pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<NotesListResponse> {
    let notes_url = state.config.notes_url();
    let items: Vec<_> = load_all_notes(&state.config.notes_dir, false)
        .iter()
        .map(|n| to_list_item(n, &notes_url))
        .collect();

    Json(NotesListResponse {
        count: items.len(),
        items,
    })
}

/// Raw note text with its frontmatter, for published notes only.
pub async fn get_note(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let dir = &state.config.notes_dir;
    let content = load_note(dir, &slug).and_then(|_| read_raw(dir, &slug));

    match content {
        Some(text) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/markdown; charset=utf-8")],
            text,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Note not found").into_response(),
    }
}
