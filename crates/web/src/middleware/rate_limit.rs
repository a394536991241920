//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `auth_rate_limiter`: strict limits for login and registration (~10/min)
//! - `api_rate_limiter`: relaxed limits for JSON endpoints (~60/min)
//!
//! Clients are keyed by peer address. Proxy headers are only honored when
//! `BASKET_TRUST_PROXY_HEADERS` is set, since any client can forge them.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor for the client IP.
///
/// With `trust_proxy_headers` the order is `X-Forwarded-For` (first entry),
/// `X-Real-IP`, then the socket address from `ConnectInfo`. Without it only
/// the socket address counts.
#[derive(Clone, Copy, Debug)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = forwarded_ip(req)
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    let headers = req.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for the JSON API: ~60 requests per minute per IP.
///
/// Autocomplete fires on keystrokes, hence the large burst.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn api_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(1)
        .burst_size(30)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(30) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: true,
    };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: false,
    };

    fn request(headers: &[(&str, &str)], peer: Option<[u8; 4]>) -> Request<()> {
        let mut builder = Request::builder().uri("/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut req = builder.body(()).unwrap();
        if let Some(peer) = peer {
            req.extensions_mut()
                .insert(ConnectInfo(SocketAddr::from((peer, 5000))));
        }
        req
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_direct_mode_ignores_forged_headers() {
        let peer = [192, 0, 2, 1];
        let first = request(&[("x-forwarded-for", "203.0.113.9")], Some(peer));
        let second = request(
            &[("x-forwarded-for", "203.0.113.10"), ("x-real-ip", "198.51.100.4")],
            Some(peer),
        );

        assert_eq!(DIRECT.extract(&first).unwrap(), ip("192.0.2.1"));
        assert_eq!(DIRECT.extract(&second).unwrap(), ip("192.0.2.1"));
    }

    #[test]
    fn test_direct_mode_needs_peer_address() {
        let req = request(&[("x-forwarded-for", "203.0.113.9")], None);
        assert!(DIRECT.extract(&req).is_err());
    }

    #[test]
    fn test_proxy_mode_prefers_first_forwarded_address() {
        let req = request(
            &[
                ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
                ("x-real-ip", "198.51.100.4"),
            ],
            Some([10, 0, 0, 1]),
        );
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("203.0.113.9"));
    }

    #[test]
    fn test_proxy_mode_falls_back_to_real_ip_then_peer() {
        let req = request(
            &[("x-forwarded-for", "garbage"), ("x-real-ip", "198.51.100.4")],
            None,
        );
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("198.51.100.4"));

        let req = request(&[], Some([192, 0, 2, 1]));
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("192.0.2.1"));
    }

    #[test]
    fn test_no_address_is_an_error() {
        assert!(BEHIND_PROXY.extract(&request(&[], None)).is_err());
    }
}
