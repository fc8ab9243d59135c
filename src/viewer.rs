//! Page orchestration: profile, notes list and the selected note.
//!
//! The metadata and notes-list loads are independent. A failure in one is
//! logged and shown in its own pane without stopping the other.

use crate::error::{FetchError, ViewerError};
use crate::fetch::Fetcher;
use crate::markdown::{render, strip_front_matter};
use crate::models::{Metadata, NoteListItem};
use crate::presentation::{note_title, NoteEntry, ProfileCard};
use crate::resolver::derive_origin;
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

const DEFAULT_NOTES_PATH: &str = "/notes";

#[derive(Debug, Clone, PartialEq)]
pub struct NoteView {
    pub url: String,
    pub title: String,
    pub html: String,
}

#[derive(Debug)]
pub struct ViewerPage {
    pub meta_url: String,
    pub profile: Result<ProfileCard, ViewerError>,
    pub notes: Result<Vec<NoteEntry>, ViewerError>,
    pub note: Option<Result<NoteView, ViewerError>>,
}

impl ViewerPage {
    /// URL of the note being displayed, if any.
    pub fn selected_url(&self) -> Option<&str> {
        match &self.note {
            Some(Ok(view)) => Some(&view.url),
            _ => None,
        }
    }
}

// ============================================================================
// Endpoint Resolution
// ============================================================================

/// `fileList.url` resolved against the metadata URL, else
/// `<metadata origin>/notes`.
pub fn notes_endpoint(
    meta: Option<&Metadata>,
    meta_url: &str,
    page: &Url,
) -> Result<String, ViewerError> {
    let file_list = meta
        .and_then(|m| m.file_list.as_ref())
        .and_then(|f| f.url.as_deref())
        .filter(|u| !u.trim().is_empty());

    match file_list {
        Some(reference) => Url::parse(meta_url)
            .and_then(|base| base.join(reference))
            .or_else(|_| Url::parse(reference))
            .map(String::from)
            .map_err(|_| ViewerError::Endpoint(reference.to_string())),
        None => {
            let origin = derive_origin(meta_url, page);
            Url::parse(&origin)
                .and_then(|o| o.join(DEFAULT_NOTES_PATH))
                .map(String::from)
                .map_err(|_| ViewerError::Endpoint(origin))
        }
    }
}

fn item_url(item: NoteListItem, endpoint: &str) -> String {
    match item.url.filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            urlencoding::encode(&item.slug)
        ),
    }
}

/// Note URLs in server order.
///
/// Accepts a plain array of URLs or a `{count, items}` catalog. Any other
/// shape yields no notes.
pub fn note_urls(listing: Value, endpoint: &str) -> Vec<String> {
    let entries = match listing {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(url) => Some(url),
            Value::Object(_) => serde_json::from_value::<NoteListItem>(entry)
                .ok()
                .map(|item| item_url(item, endpoint)),
            _ => None,
        })
        .collect()
}

/// The listed URL equal to `selected`, else the first entry.
pub fn select(entries: &[NoteEntry], selected: Option<&str>) -> Option<String> {
    let requested = selected.map(str::trim).filter(|s| !s.is_empty());
    if let Some(url) = requested {
        match entries.iter().find(|e| e.url == url) {
            Some(entry) => return Some(entry.url.clone()),
            None => warn!(url, "ignoring note outside the loaded list"),
        }
    }
    entries.first().map(|entry| entry.url.clone())
}

// ============================================================================
// Viewer
// ============================================================================

#[derive(Clone)]
pub struct Viewer {
    fetcher: Fetcher,
    page: Url,
}

impl Viewer {
    pub fn new(fetcher: Fetcher, page: Url) -> Self {
        Self { fetcher, page }
    }

    pub async fn load_metadata(&self, meta_url: &str) -> Result<Metadata, FetchError> {
        self.fetcher.fetch_json(meta_url).await
    }

    pub async fn load_notes(
        &self,
        meta: Option<&Metadata>,
        meta_url: &str,
    ) -> Result<Vec<NoteEntry>, ViewerError> {
        let endpoint = notes_endpoint(meta, meta_url, &self.page)?;
        let listing: Value = self.fetcher.fetch_json(&endpoint).await?;
        Ok(note_urls(listing, &endpoint)
            .into_iter()
            .map(NoteEntry::new)
            .collect())
    }

    pub async fn open_note(&self, url: &str) -> Result<NoteView, ViewerError> {
        let text = self.fetcher.fetch_text(url).await?;
        Ok(NoteView {
            url: url.to_string(),
            title: note_title(url),
            html: render(strip_front_matter(&text)),
        })
    }

    /// Load everything the page shows.
    ///
    /// Only notes from the loaded list can be opened. `selected` outside the
    /// list falls back to the first note.
    pub async fn load(&self, meta_url: &str, selected: Option<&str>) -> ViewerPage {
        let meta = self.load_metadata(meta_url).await;
        if let Err(e) = &meta {
            error!(meta_url, error = %e, "cannot load metadata");
        }

        let notes = self.load_notes(meta.as_ref().ok(), meta_url).await;
        match &notes {
            Ok(entries) => info!(meta_url, count = entries.len(), "loaded notes list"),
            Err(e) => error!(meta_url, error = %e, "cannot load notes list"),
        }

        let target = notes.as_ref().ok().and_then(|entries| select(entries, selected));

        let note = match target {
            Some(url) => {
                let result = self.open_note(&url).await;
                if let Err(e) = &result {
                    error!(url = %url, error = %e, "cannot load note");
                }
                Some(result)
            }
            None => None,
        };

        ViewerPage {
            meta_url: meta_url.to_string(),
            profile: meta
                .map(|m| ProfileCard::from_metadata(&m))
                .map_err(ViewerError::from),
            notes,
            note,
        }
    }
}
