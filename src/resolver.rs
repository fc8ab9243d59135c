//! Metadata URL resolution.
//!
//! The effective metadata endpoint comes from an ordered chain of candidate
//! sources: request query, process-wide overrides, persisted preference and
//! finally `<page origin>/metadata`. The first non-blank candidate wins.

use crate::store::MetaStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub const META_QUERY_PARAM: &str = "meta";
pub const LEGACY_API_QUERY_PARAM: &str = "api";

pub const META_OVERRIDE_VAR: &str = "NOTES_META_URL";
pub const LEGACY_API_OVERRIDE_VAR: &str = "DEV_NOTES_API";

/// Store key written by `save`.
pub const META_STORE_KEY: &str = "notesMetaUrl";
pub const LEGACY_META_STORE_KEY: &str = "devNotesMeta";
/// Keys from the older "API base" setting. Read, never written.
pub const LEGACY_API_STORE_KEYS: [&str; 2] = ["devNotesApi", "notesApiBase"];

const DEFAULT_META_PATH: &str = "/metadata";

// ============================================================================
// Candidate Sources
// ============================================================================

/// A single link in the resolution chain.
pub trait CandidateSource: Send + Sync {
    fn describe(&self) -> String;
    fn candidate(&self) -> Option<String>;
}

/// A value captured up front: a query parameter or an override variable.
pub struct FixedValue {
    label: String,
    value: Option<String>,
}

impl FixedValue {
    pub fn new(label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl CandidateSource for FixedValue {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn candidate(&self) -> Option<String> {
        self.value.clone()
    }
}

/// A persisted preference, read lazily when the chain reaches it.
pub struct StoredValue {
    store: Arc<dyn MetaStore>,
    key: &'static str,
}

impl StoredValue {
    pub fn new(store: Arc<dyn MetaStore>, key: &'static str) -> Self {
        Self { store, key }
    }
}

impl CandidateSource for StoredValue {
    fn describe(&self) -> String {
        format!("store:{}", self.key)
    }

    fn candidate(&self) -> Option<String> {
        match self.store.get(self.key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = self.key, error = %e, "cannot read stored metadata URL");
                None
            }
        }
    }
}

/// Snapshot of the process-wide override variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub meta_url: Option<String>,
    pub legacy_api: Option<String>,
}

impl Overrides {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            meta_url: lookup(META_OVERRIDE_VAR),
            legacy_api: lookup(LEGACY_API_OVERRIDE_VAR),
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

pub struct ConfigResolver {
    page: Url,
    sources: Vec<Box<dyn CandidateSource>>,
    store: Arc<dyn MetaStore>,
}

impl ConfigResolver {
    /// A resolver with an explicit source chain.
    pub fn new(page: Url, store: Arc<dyn MetaStore>) -> Self {
        Self {
            page,
            sources: Vec::new(),
            store,
        }
    }

    pub fn with_source(mut self, source: impl CandidateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The standard chain: query, overrides, persisted keys.
    pub fn standard(
        page: Url,
        query: &HashMap<String, String>,
        overrides: &Overrides,
        store: Arc<dyn MetaStore>,
    ) -> Self {
        let mut resolver = Self::new(page, store.clone())
            .with_source(FixedValue::new(
                "query:meta",
                query.get(META_QUERY_PARAM).cloned(),
            ))
            .with_source(FixedValue::new(
                "query:api",
                query.get(LEGACY_API_QUERY_PARAM).cloned(),
            ))
            .with_source(FixedValue::new(
                format!("env:{}", META_OVERRIDE_VAR),
                overrides.meta_url.clone(),
            ))
            .with_source(FixedValue::new(
                format!("env:{}", LEGACY_API_OVERRIDE_VAR),
                overrides.legacy_api.clone(),
            ))
            .with_source(StoredValue::new(store.clone(), META_STORE_KEY))
            .with_source(StoredValue::new(store.clone(), LEGACY_META_STORE_KEY));

        for key in LEGACY_API_STORE_KEYS {
            resolver = resolver.with_source(StoredValue::new(store.clone(), key));
        }

        resolver
    }

    pub fn default_meta_url(&self) -> String {
        default_meta_url(&self.page)
    }

    /// The effective metadata URL. Never fails.
    pub fn resolve(&self) -> String {
        for source in &self.sources {
            let Some(value) = source.candidate() else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            let url = normalize_url(trimmed, &self.page);
            debug!(source = %source.describe(), url = %url, "resolved metadata URL");
            return url;
        }

        let url = self.default_meta_url();
        debug!(url = %url, "using default metadata URL");
        url
    }

    /// Persist a preferred metadata URL. Store failures are logged and dropped.
    pub fn save(&self, url: &str) {
        let normalized = normalize_url(url, &self.page);
        if let Err(e) = self.store.set(META_STORE_KEY, &normalized) {
            warn!(error = %e, "cannot persist metadata URL");
        }
    }

    pub fn derive_origin(&self, meta_url: &str) -> String {
        derive_origin(meta_url, &self.page)
    }
}

// ============================================================================
// URL Helpers
// ============================================================================

pub fn page_origin(page: &Url) -> String {
    page.origin().ascii_serialization()
}

pub fn default_meta_url(page: &Url) -> String {
    format!("{}{}", page_origin(page), DEFAULT_META_PATH)
}

fn strip_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

/// Resolve `raw` against the page URL and drop one trailing slash.
///
/// Blank input falls back to the default metadata URL; input that cannot be
/// resolved is returned as given.
pub fn normalize_url(raw: &str, page: &Url) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_meta_url(page);
    }

    match page.join(trimmed) {
        Ok(url) => strip_trailing_slash(url.as_str()).to_string(),
        Err(e) => {
            debug!(input = raw, error = %e, "keeping unparseable metadata URL as-is");
            raw.to_string()
        }
    }
}

/// Scheme, host and port of `meta_url`, or the page origin when that URL
/// does not parse or has an opaque origin.
pub fn derive_origin(meta_url: &str, page: &Url) -> String {
    match Url::parse(meta_url.trim()) {
        Ok(url) if url.origin().is_tuple() => url.origin().ascii_serialization(),
        _ => page_origin(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn page() -> Url {
        Url::parse("http://viewer.local:3000/").unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn overrides(meta: Option<&str>, legacy: Option<&str>) -> Overrides {
        Overrides {
            meta_url: meta.map(String::from),
            legacy_api: legacy.map(String::from),
        }
    }

    struct FailingStore;

    impl MetaStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Encoding)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Encoding)
        }
    }

    #[test]
    fn test_query_wins_over_everything() {
        let store = Arc::new(MemoryStore::with(&[(META_STORE_KEY, "https://stored.example/metadata")]));
        let resolver = ConfigResolver::standard(
            page(),
            &query(&[("meta", "https://query.example/metadata")]),
            &overrides(Some("https://env.example/metadata"), None),
            store,
        );
        assert_eq!(resolver.resolve(), "https://query.example/metadata");
    }

    #[test]
    fn test_override_wins_over_store() {
        let store = Arc::new(MemoryStore::with(&[(META_STORE_KEY, "https://stored.example/metadata")]));
        let resolver = ConfigResolver::standard(
            page(),
            &HashMap::new(),
            &overrides(Some("https://env.example/metadata"), None),
            store,
        );
        assert_eq!(resolver.resolve(), "https://env.example/metadata");
    }

    #[test]
    fn test_store_then_default() {
        let store = Arc::new(MemoryStore::with(&[(LEGACY_META_STORE_KEY, "https://old.example/meta/")]));
        let resolver =
            ConfigResolver::standard(page(), &HashMap::new(), &Overrides::default(), store);
        assert_eq!(resolver.resolve(), "https://old.example/meta");

        let resolver = ConfigResolver::standard(
            page(),
            &HashMap::new(),
            &Overrides::default(),
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(resolver.resolve(), "http://viewer.local:3000/metadata");
    }

    #[test]
    fn test_legacy_sources_in_order() {
        let store = Arc::new(MemoryStore::with(&[("devNotesApi", "https://api-base.example")]));
        let resolver = ConfigResolver::standard(
            page(),
            &query(&[("api", "  ")]),
            &overrides(None, Some("https://legacy-env.example/metadata")),
            store.clone(),
        );
        assert_eq!(resolver.resolve(), "https://legacy-env.example/metadata");

        let resolver =
            ConfigResolver::standard(page(), &HashMap::new(), &Overrides::default(), store);
        assert_eq!(resolver.resolve(), "https://api-base.example");
    }

    #[test]
    fn test_legacy_query_param() {
        let resolver = ConfigResolver::standard(
            page(),
            &query(&[("meta", ""), ("api", "https://api.example/metadata")]),
            &Overrides::default(),
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(resolver.resolve(), "https://api.example/metadata");
    }

    #[test]
    fn test_custom_chain() {
        let resolver = ConfigResolver::new(page(), Arc::new(MemoryStore::new()))
            .with_source(FixedValue::new("first", None))
            .with_source(FixedValue::new("second", Some(" /custom/meta/ ".into())));
        assert_eq!(resolver.resolve(), "http://viewer.local:3000/custom/meta");
    }

    #[test]
    fn test_normalize_url() {
        let page = page();
        assert_eq!(normalize_url("https://a.example/x/", &page), "https://a.example/x");
        assert_eq!(normalize_url("https://a.example", &page), "https://a.example");
        assert_eq!(normalize_url("/meta", &page), "http://viewer.local:3000/meta");
        assert_eq!(normalize_url("", &page), "http://viewer.local:3000/metadata");
        assert_eq!(normalize_url("http://[broken", &page), "http://[broken");
    }

    #[test]
    fn test_save_normalizes_and_writes_primary_key() {
        let store = Arc::new(MemoryStore::new());
        let resolver =
            ConfigResolver::standard(page(), &HashMap::new(), &Overrides::default(), store.clone());
        resolver.save("https://saved.example/metadata/");

        assert_eq!(
            store.get(META_STORE_KEY).unwrap().as_deref(),
            Some("https://saved.example/metadata")
        );
        assert_eq!(store.get(LEGACY_META_STORE_KEY).unwrap(), None);
        assert_eq!(resolver.resolve(), "https://saved.example/metadata");
    }

    #[test]
    fn test_store_failures_are_swallowed() {
        let resolver = ConfigResolver::standard(
            page(),
            &HashMap::new(),
            &Overrides::default(),
            Arc::new(FailingStore),
        );
        resolver.save("https://x.example/metadata");
        assert_eq!(resolver.resolve(), "http://viewer.local:3000/metadata");
    }

    #[test]
    fn test_derive_origin() {
        let page = page();
        assert_eq!(
            derive_origin("https://api.example:8443/v1/metadata", &page),
            "https://api.example:8443"
        );
        assert_eq!(derive_origin("not a url", &page), "http://viewer.local:3000");
        assert_eq!(derive_origin("data:text/plain,hi", &page), "http://viewer.local:3000");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let o = Overrides::from_lookup(|name| match name {
            META_OVERRIDE_VAR => Some("https://m.example".into()),
            _ => None,
        });
        assert_eq!(o.meta_url.as_deref(), Some("https://m.example"));
        assert_eq!(o.legacy_api, None);
    }
}
