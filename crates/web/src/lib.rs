//! Basket web application library.
//!
//! The binary in `main.rs` is a thin wrapper around [`app`]; integration
//! tests build the same router with an in-memory session store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::state::AppState;

/// Fingerprinted assets never change under the same name.
const STATIC_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
///
/// Layers, innermost first: security headers, sessions, request ID, tracing.
/// `rate_limit` wraps `/auth` and `/api` in per-IP limiters; those need
/// `ConnectInfo`, so callers without a real socket pass `false`.
pub fn app<S>(state: AppState, store: S, rate_limit: bool) -> Router
where
    S: SessionStore + Clone,
{
    let config = state.config().clone();

    let mut auth = routes::auth_routes();
    let mut api = routes::api_routes();
    if rate_limit {
        let trust = config.trust_proxy_headers;
        auth = auth.layer(middleware::auth_rate_limiter(trust));
        api = api.layer(middleware::api_rate_limiter(trust));
    }

    let static_files = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        ))
        .service(ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")));

    Router::new()
        .merge(routes::routes(config.import_max_bytes))
        .nest("/auth", auth)
        .nest("/api", api)
        .nest_service("/static", static_files)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(middleware::session_layer(store, &config))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
