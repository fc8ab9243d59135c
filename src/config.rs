//! Server configuration from the environment.

use crate::resolver::Overrides;
use crate::url_validator::ProxyPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_NOTES_DIR: &str = "content";
pub const DEFAULT_DB_PATH: &str = ".notes_viewer_db";

pub const ADDR_VAR: &str = "NOTES_VIEWER_ADDR";
pub const PUBLIC_URL_VAR: &str = "NOTES_VIEWER_PUBLIC_URL";
pub const NOTES_DIR_VAR: &str = "NOTES_DIR";
pub const DB_PATH_VAR: &str = "NOTES_VIEWER_DB";
pub const PROXY_ALLOWED_HOSTS_VAR: &str = "NOTES_PROXY_ALLOWED_HOSTS";
pub const PROXY_ALLOW_PRIVATE_VAR: &str = "NOTES_PROXY_ALLOW_PRIVATE";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Where browsers reach this server. Stands in for the page location.
    pub public_url: Url,
    pub notes_dir: PathBuf,
    pub db_path: PathBuf,
    pub proxy: ProxyPolicy,
    pub overrides: Overrides,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    Addr { var: &'static str, value: String },
    #[error("{var}: invalid URL {value:?}")]
    Url { var: &'static str, value: String },
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr_str = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_str.trim().parse().map_err(|_| ConfigError::Addr {
            var: ADDR_VAR,
            value: addr_str.clone(),
        })?;

        let public_str = get(PUBLIC_URL_VAR).unwrap_or_else(|| format!("http://{}", addr));
        let public_url = Url::parse(public_str.trim()).map_err(|_| ConfigError::Url {
            var: PUBLIC_URL_VAR,
            value: public_str.clone(),
        })?;

        let allowed_hosts = get(PROXY_ALLOWED_HOSTS_VAR)
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            addr,
            public_url,
            notes_dir: PathBuf::from(get(NOTES_DIR_VAR).unwrap_or_else(|| DEFAULT_NOTES_DIR.into())),
            db_path: PathBuf::from(get(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.into())),
            proxy: ProxyPolicy {
                allowed_hosts,
                allow_private: get(PROXY_ALLOW_PRIVATE_VAR)
                    .map(|v| is_truthy(&v))
                    .unwrap_or(false),
            },
            overrides: Overrides::from_lookup(|name| get(name)),
        })
    }

    /// `<public url>/notes`, as advertised in the metadata document.
    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.public_url.as_str().trim_end_matches('/'))
    }
}
