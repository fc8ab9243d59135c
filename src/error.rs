//! Error types shared across the viewer.
//!
//! Fetch failures are split into the failure of a single attempt
//! (`AttemptError`) and the terminal failure of the direct-then-proxy
//! sequence (`FetchError`).

use crate::url_validator::UrlValidationError;
use thiserror::Error;

/// Why a single HTTP attempt (direct or proxied) failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The transport failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body could not be decoded in the expected format.
    #[error("invalid body: {0}")]
    Decode(String),
}

impl AttemptError {
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Terminal failure of a fetch operation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Both the direct request and the proxy fallback failed.
    #[error("proxy {proxy} for {url} (direct attempt: {direct})")]
    Proxy {
        url: String,
        direct: AttemptError,
        proxy: AttemptError,
    },

    /// The target failed the outbound policy; nothing was requested.
    #[error("refusing to fetch {url}: {reason}")]
    Blocked {
        url: String,
        reason: UrlValidationError,
    },

    /// The proxy URL could not be built from the page origin.
    #[error("cannot build proxy URL for {url}: {reason}")]
    ProxyUrl { url: String, reason: String },

    /// The payload arrived but does not have the expected shape.
    #[error("unexpected document shape from {url}: {reason}")]
    Shape { url: String, reason: String },
}

impl FetchError {
    /// HTTP status reported by the proxy, if it answered at all.
    pub fn proxy_status(&self) -> Option<u16> {
        match self {
            FetchError::Proxy { proxy, .. } => proxy.status(),
            _ => None,
        }
    }
}

/// Failure of the persistent settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Sled(#[from] sled::Error),

    #[error("stored value is not UTF-8")]
    Encoding,
}

/// Errors raised while assembling the viewer page.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot resolve notes endpoint from {0}")]
    Endpoint(String),
}
