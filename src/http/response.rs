//! HTTP response building module
//!
//! Turns handler responses and front-door failures into hyper responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

use crate::documents::DocumentResponse;
use crate::error::HandlerError;
use crate::logger;

/// Write a handler response to the wire with the `Server` header added
///
/// Handler bodies are always text, so the body is written as-is.
pub fn build_document_response(resp: DocumentResponse, server_name: &str) -> Response<Full<Bytes>> {
    debug_assert!(!resp.is_base64_encoded);

    let mut builder = Response::builder()
        .status(resp.status)
        .header(SERVER, server_name);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(resp.headers);
    }

    builder.body(Full::new(Bytes::from(resp.body))).unwrap_or_else(|e| {
        log_build_error("document", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 500 response for a failed handler call. The error text is passed through.
pub fn build_500_response(err: &HandlerError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Request failed: {err}"));
    build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}

/// Build 400 response for a body that could not be read off the wire
pub fn build_400_response(message: &str) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::BAD_REQUEST, message)
}

/// Build liveness probe response
pub fn build_health_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from_static(br#"{"status":"ok"}"#)))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(kind: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {kind} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use http_body_util::BodyExt;
    use hyper::header::{HeaderMap, HeaderValue};

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn document_response(body: &str) -> DocumentResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        DocumentResponse {
            status: StatusCode::OK,
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    #[tokio::test]
    async fn test_document_response_keeps_headers_and_body() {
        let resp = build_document_response(document_response(r#"{"count":0}"#), "docintake");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[SERVER], "docintake");
        assert_eq!(body_string(resp).await, r#"{"count":0}"#);
    }

    #[tokio::test]
    async fn test_500_passes_error_text_through() {
        let err = HandlerError::Storage(StorageError::MissingUrl("DATABASE_URL".to_string()));
        let resp = build_500_response(&err);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "environment variable DATABASE_URL is not set");
    }

    #[tokio::test]
    async fn test_health_and_413() {
        let resp = build_health_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, r#"{"status":"ok"}"#);

        assert_eq!(build_413_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(build_400_response("bad").status(), StatusCode::BAD_REQUEST);
    }
}
