//! Wire request → `DocumentRequest`
//!
//! Reads the body up to the configured limit and decodes the query string.

use std::collections::HashMap;

use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::Request;

use crate::documents::DocumentRequest;
use crate::logger;

/// Why a request never reached the document handler
#[derive(Debug)]
pub enum Rejection {
    TooLarge,
    Unreadable(String),
}

/// Validate Content-Length header against max body size
/// Returns true if the declared length is over the limit
pub fn declared_too_large<B>(req: &Request<B>, max_body_size: u64) -> bool {
    let Some(content_length) = req.headers().get(hyper::header::CONTENT_LENGTH) else {
        return false;
    };
    match content_length.to_str().map(str::parse::<u64>) {
        Ok(Ok(size)) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            true
        }
        Ok(Ok(_)) => false,
        _ => {
            logger::log_warning("Invalid Content-Length header, skipping size check");
            false
        }
    }
}

/// Decode `application/x-www-form-urlencoded` pairs; the first occurrence of a key wins
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = query {
        for (key, value) in url::form_urlencoded::parse(q.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}

/// Collect the body and build the handler request.
/// An empty body is reported as absent.
pub async fn to_document_request(
    req: Request<Incoming>,
    max_body_size: u64,
) -> Result<DocumentRequest, Rejection> {
    if declared_too_large(&req, max_body_size) {
        return Err(Rejection::TooLarge);
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => return Err(Rejection::TooLarge),
        Err(e) => return Err(Rejection::Unreadable(e.to_string())),
    };

    let mut request = DocumentRequest::new(parts.method);
    request.query = parse_query(parts.uri.query());
    if !bytes.is_empty() {
        request.body = Some(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(request)
}
