//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP. The header is whatever the
/// client sent unless a proxy in front rewrites it.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // First entry is the original client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Best-effort client address extractor
///
/// Never rejects. `peer` is the socket address (present when the server was
/// started with connect info); `forwarded` is the first `X-Forwarded-For`
/// entry, which the client controls unless a trusted proxy sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp {
    pub peer: Option<IpAddr>,
    pub forwarded: Option<IpAddr>,
}

impl ClientIp {
    /// Address to attribute the request to
    ///
    /// `X-Forwarded-For` is only consulted when `trust_forwarded_for` is set.
    pub fn resolve(&self, trust_forwarded_for: bool) -> Option<IpAddr> {
        if trust_forwarded_for {
            self.forwarded.or(self.peer)
        } else {
            self.peer
        }
    }

    /// Rate-limit key for a caller whose identity is not known
    pub fn limiter_key(&self, trust_forwarded_for: bool) -> String {
        match self.resolve(trust_forwarded_for) {
            Some(ip) => format!("ip:{ip}"),
            None => "ip:unknown".to_string(),
        }
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(ClientIp {
            peer,
            forwarded: extract_client_ip(&parts.headers, None),
        })
    }
}
