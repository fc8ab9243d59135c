//! Target validation for the `/proxy` relay.
//!
//! The relay fetches arbitrary URLs on behalf of the browser, so targets are
//! checked before any request goes out:
//! - only `http` and `https`
//! - optional host allowlist (exact host or subdomain)
//! - internal addresses (private ranges, loopback, link-local) blocked
//!   unless the deployment explicitly allows them
//! - DNS rebinding protection: resolved addresses are checked too

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Only HTTP(S) URLs can be proxied")]
    UnsupportedScheme,
    #[error("Host not in allowlist: {0}")]
    HostNotAllowed(String),
    #[error("Internal IP addresses are not allowed: {0}")]
    InternalIpAddress(String),
    #[error("DNS resolution failed: {0}")]
    DnsResolutionFailed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyPolicy {
    /// Empty means any host.
    pub allowed_hosts: Vec<String>,
    pub allow_private: bool,
}

fn is_internal_ipv4(ip: &Ipv4Addr) -> bool {
    let o = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        // Shared address space (100.64.0.0/10)
        || (o[0] == 100 && (o[1] & 0xC0) == 64)
        // IETF protocol assignments (192.0.0.0/24)
        || (o[0] == 192 && o[1] == 0 && o[2] == 0)
}

fn is_internal_ipv6(ip: &Ipv6Addr) -> bool {
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.to_ipv4_mapped().map(|v4| is_internal_ipv4(&v4)).unwrap_or(false)
        // Unique local (fc00::/7)
        || (ip.segments()[0] & 0xFE00) == 0xFC00
        // Link-local (fe80::/10)
        || (ip.segments()[0] & 0xFFC0) == 0xFE80
}

pub fn is_internal_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_ipv4(v4),
        IpAddr::V6(v6) => is_internal_ipv6(v6),
    }
}

fn is_host_allowed(host: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let host = host.to_lowercase();
    allowed.iter().any(|a| {
        let a = a.to_lowercase();
        host == a || host.ends_with(&format!(".{}", a))
    })
}

/// Checks that need no network access.
pub fn check_url(url_str: &str, policy: &ProxyPolicy) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str).map_err(|e| UrlValidationError::InvalidUrl(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    let host = url
        .host_str()
        .ok_or_else(|| UrlValidationError::InvalidUrl("No host in URL".to_string()))?;

    if !is_host_allowed(host, &policy.allowed_hosts) {
        return Err(UrlValidationError::HostNotAllowed(host.to_string()));
    }

    if !policy.allow_private {
        let literal = match url.host() {
            Some(url::Host::Ipv4(v4)) => Some(IpAddr::V4(v4)),
            Some(url::Host::Ipv6(v6)) => Some(IpAddr::V6(v6)),
            _ => None,
        };
        if let Some(ip) = literal.filter(is_internal_ip) {
            return Err(UrlValidationError::InternalIpAddress(ip.to_string()));
        }
    }

    Ok(url)
}

/// Full validation, resolving the host when internal addresses are blocked.
pub async fn validate_proxy_target(
    url_str: &str,
    policy: &ProxyPolicy,
) -> Result<Url, UrlValidationError> {
    let url = check_url(url_str, policy)?;
    if policy.allow_private {
        return Ok(url);
    }

    let host = url.host_str().unwrap_or_default().to_string();
    let port = url.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host.trim_matches(|c| c == '[' || c == ']'), port))
        .await
        .map_err(|e| UrlValidationError::DnsResolutionFailed(e.to_string()))?;

    for addr in addrs {
        if is_internal_ip(&addr.ip()) {
            return Err(UrlValidationError::InternalIpAddress(addr.ip().to_string()));
        }
    }

    Ok(url)
}
