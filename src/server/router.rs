//! Request routing
//!
//! The health probe is answered here; every other request goes through the
//! document handler.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::{Method, Request, Response, Version};

use super::state::AppState;
use crate::config::HttpConfig;
use crate::documents;
use crate::http::{self, Rejection};
use crate::logger::{self, AccessLogEntry};
use crate::storage::DocumentStore;

pub async fn handle_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();
    entry.user_agent = req
        .headers()
        .get(hyper::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    logger::log_debug(&format!("[Headers] Count: {}", req.headers().len()));

    let response = dispatch(req, &state.config.http, &state.store).await;

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Answer the health probe, otherwise run the document handler.
///
/// # Arguments
///
/// * `req` - The incoming request
/// * `http_config` - Body limit, health path and `Server` header value
/// * `store` - Storage the document handler runs against
async fn dispatch<S: DocumentStore>(
    req: Request<Incoming>,
    http_config: &HttpConfig,
    store: &S,
) -> Response<Full<Bytes>> {
    if http_config.health_enabled()
        && req.method() == Method::GET
        && req.uri().path() == http_config.health_path
    {
        return http::build_health_response();
    }

    let request = match http::to_document_request(req, http_config.max_body_size).await {
        Ok(r) => r,
        Err(Rejection::TooLarge) => return http::build_413_response(),
        Err(Rejection::Unreadable(e)) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::build_400_response("Failed to read request body");
        }
    };

    match documents::handle(request, store).await {
        Ok(resp) => http::build_document_response(resp, &http_config.server_name),
        Err(e) => http::build_500_response(&e),
    }
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
