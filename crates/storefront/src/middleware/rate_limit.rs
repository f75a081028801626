//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `auth_rate_limiter`: strict limits for login and registration (~10/min)
//! - `api_rate_limiter`: relaxed limits for product, catalog and cart routes (~120/min)

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Single-address proxy headers checked after `x-forwarded-for`.
const FALLBACK_IP_HEADERS: [&str; 2] = ["x-real-ip", "fly-client-ip"];

/// Key extractor for the per-client limit.
///
/// Proxy-supplied address headers are honored only when `trust_proxy_headers`
/// is set; otherwise the TCP peer address is the key.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    /// Create an extractor, optionally trusting proxy address headers.
    #[must_use]
    pub const fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }

    fn proxy_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        // First hop of X-Forwarded-For
        let forwarded_for = || {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        header_ip("cf-connecting-ip")
            .or_else(forwarded_for)
            .or_else(|| FALLBACK_IP_HEADERS.iter().find_map(|name| header_ip(name)))
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = Self::proxy_ip(req)
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. `per_second(6)` and `burst_size(5)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy_headers))
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for general API: ~120 requests per minute per IP.
///
/// Configuration: 1 request every 500ms (replenish), burst of 50.
///
/// # Panics
///
/// This function will not panic. `per_millisecond(500)` and `burst_size(50)`
/// are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy_headers))
        .per_millisecond(500)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_millisecond(500) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}
