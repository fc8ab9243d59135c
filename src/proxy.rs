//! Same-origin relay used when the browser cannot reach a host directly.
//!
//! `GET /proxy?url=<target>` validates the target, forwards the caller's
//! `Accept` header and mirrors status, content type and body.

use crate::url_validator::{validate_proxy_target, UrlValidationError};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing url parameter")]
    MissingUrl,

    #[error(transparent)]
    Rejected(#[from] UrlValidationError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingUrl => StatusCode::BAD_REQUEST,
            ProxyError::Rejected(
                UrlValidationError::InvalidUrl(_) | UrlValidationError::UnsupportedScheme,
            ) => StatusCode::BAD_REQUEST,
            ProxyError::Rejected(
                UrlValidationError::HostNotAllowed(_) | UrlValidationError::InternalIpAddress(_),
            ) => StatusCode::FORBIDDEN,
            ProxyError::Rejected(UrlValidationError::DnsResolutionFailed(_))
            | ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

pub async fn proxy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let target = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ProxyError::MissingUrl)?;

    let url = validate_proxy_target(target.trim(), &state.config.proxy)
        .await
        .inspect_err(|e| warn!(upstream = %target, error = %e, "proxy target rejected"))?;

    let mut request = state.proxy_client.get(url.as_str());
    if let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        request = request.header(reqwest::header::ACCEPT, accept);
    }

    let upstream = request
        .send()
        .await
        .inspect_err(|e| warn!(upstream = %url, error = %e, "proxy upstream failed"))?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();
    let body = upstream.bytes().await?;

    debug!(upstream = %url, status = status.as_u16(), bytes = body.len(), "proxied");
    Ok((status, [(header::CONTENT_TYPE, content_type)], body.to_vec()).into_response())
}
