//! Resource fetching with a same-origin proxy fallback.
//!
//! Every request is tried directly first. A transport error, a non-2xx
//! status or an undecodable body triggers exactly one retry through
//! `<page origin>/proxy?url=<target>`, which relays the request from the
//! server side.
//!
//! A fetcher built `with_policy` checks every target outside the page origin
//! against the relay's policy before the direct attempt, so the viewer never
//! reaches a host the relay would refuse.

use crate::error::{AttemptError, FetchError};
use crate::url_validator::{validate_proxy_target, ProxyPolicy};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const PROXY_PATH: &str = "/proxy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Json,
    Text,
}

impl ResourceFormat {
    pub fn accept(self) -> &'static str {
        match self {
            ResourceFormat::Json => "application/json",
            ResourceFormat::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Json(Value),
    Text(String),
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    page: Url,
    policy: Option<ProxyPolicy>,
}

impl Fetcher {
    pub fn new(page: Url) -> Self {
        Self::with_client(Client::new(), page)
    }

    pub fn with_client(client: Client, page: Url) -> Self {
        Self {
            client,
            page,
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: ProxyPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    fn is_page_origin(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|u| u.origin() == self.page.origin())
            .unwrap_or(false)
    }

    async fn guard(&self, url: &str) -> Result<(), FetchError> {
        let Some(policy) = &self.policy else {
            return Ok(());
        };
        if self.is_page_origin(url) {
            return Ok(());
        }
        validate_proxy_target(url, policy)
            .await
            .map(|_| ())
            .map_err(|reason| {
                warn!(url, error = %reason, "fetch target rejected");
                FetchError::Blocked {
                    url: url.to_string(),
                    reason,
                }
            })
    }

    /// The relay URL used when a direct request fails.
    pub fn proxy_url(&self, target: &str) -> Result<Url, FetchError> {
        let mut proxy = self.page.join(PROXY_PATH).map_err(|e| FetchError::ProxyUrl {
            url: target.to_string(),
            reason: e.to_string(),
        })?;
        proxy.query_pairs_mut().clear().append_pair("url", target);
        Ok(proxy)
    }

    async fn attempt(&self, url: &str, format: ResourceFormat) -> Result<Resource, AttemptError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, format.accept())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        match format {
            ResourceFormat::Json => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map(Resource::Json)
                    .map_err(|e| AttemptError::Decode(e.to_string()))
            }
            ResourceFormat::Text => Ok(Resource::Text(response.text().await?)),
        }
    }

    pub async fn fetch_resource(
        &self,
        url: &str,
        format: ResourceFormat,
    ) -> Result<Resource, FetchError> {
        self.guard(url).await?;

        let direct = match self.attempt(url, format).await {
            Ok(resource) => return Ok(resource),
            Err(e) => e,
        };

        warn!(url, error = %direct, "direct fetch failed, retrying through proxy");
        let proxy_url = self.proxy_url(url)?;

        match self.attempt(proxy_url.as_str(), format).await {
            Ok(resource) => {
                debug!(url, "proxy fetch succeeded");
                Ok(resource)
            }
            Err(proxy) => Err(FetchError::Proxy {
                url: url.to_string(),
                direct,
                proxy,
            }),
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        match self.fetch_resource(url, ResourceFormat::Json).await? {
            Resource::Json(value) => serde_json::from_value(value).map_err(|e| FetchError::Shape {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Resource::Text(_) => Err(FetchError::Shape {
                url: url.to_string(),
                reason: "expected JSON".to_string(),
            }),
        }
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        match self.fetch_resource(url, ResourceFormat::Text).await? {
            Resource::Text(text) => Ok(text),
            Resource::Json(_) => Err(FetchError::Shape {
                url: url.to_string(),
                reason: "expected text".to_string(),
            }),
        }
    }
}
