//! Request-time scanner detection.
//!
//! Runs the User-Agent classifier on every non-asset request and records a
//! matching event. Requests are never blocked or altered, and a store failure
//! is logged without affecting the response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use lazy_static::lazy_static;
use regex::Regex;

use super::state::AppState;
use crate::security::{forwarded_client, RequestInfo};

lazy_static! {
    /// Static file extensions skipped by detection, matched anywhere in the path.
    static ref STATIC_ASSET: Option<Regex> = Regex::new(
        r"(?i)\.(?:html?|css|js|jpe?g|webp|png|gif|svg|ttf|woff2?|ico|csv|docx?|xlsx?|zip|webmanifest)"
    )
    .ok();
}

/// Prefixes inspected even when they look like static files.
const ALWAYS_INSPECTED: [&str; 2] = ["/api", "/trpc"];

/// Whether a path is a framework internal or static asset.
///
/// `/api` and `/trpc` routes are never assets. A `.js` match that continues
/// as `.json` does not count.
pub fn is_static_asset(path: &str) -> bool {
    if ALWAYS_INSPECTED.iter().any(|prefix| path.starts_with(prefix)) {
        return false;
    }
    if path.starts_with("/_next") {
        return true;
    }
    STATIC_ASSET.as_ref().is_some_and(|re| {
        re.find_iter(path).any(|m| {
            let json = m.as_str().eq_ignore_ascii_case(".js")
                && path[m.end()..]
                    .get(..2)
                    .is_some_and(|rest| rest.eq_ignore_ascii_case("on"));
            !json
        })
    })
}

/// Client address: first `X-Forwarded-For` entry, else the socket peer.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(forwarded_client)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Detection middleware, installed with `axum::middleware::from_fn_with_state`.
pub async fn detect_scanners(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.classifier.enabled && !is_static_asset(request.uri().path()) {
        record_detection(&state, &request);
    }
    next.run(request).await
}

fn record_detection(state: &AppState, request: &Request) {
    let headers = request.headers();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_address(headers, peer);

    let info = RequestInfo {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        ip: ip.as_deref(),
        path: request.uri().path(),
        method: request.method().as_str(),
    };

    let Some(detection) = state.classifier.detect(&info) else {
        return;
    };

    tracing::debug!(
        rule = detection.rule.name,
        path = info.path,
        "scanner detected"
    );
    if let Err(e) = state.store.append(detection.event) {
        tracing::error!("Failed to record detection: {}", e);
    }
}
