//! Document request handler
//!
//! One dispatch on the request method:
//! - `OPTIONS`: CORS preflight, no storage access
//! - `POST`: store one upload and return its id
//! - `GET`: list uploads, by submitter email or the 50 most recent
//! - anything else: 405
//!
//! Storage and body-parsing failures are returned as `HandlerError` for the
//! caller to turn into a 5xx.

mod types;

use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};
use hyper::{Method, StatusCode};
use serde::Serialize;

use crate::error::Result;
use crate::logger;
use crate::storage::{DocumentFilter, DocumentStore, RECENT_LIMIT};

pub use types::{DocumentRequest, DocumentResponse, ErrorBody};
use types::{DocumentList, DocumentSummary, UploadAccepted, UploadForm, UPLOAD_MESSAGE};

pub async fn handle<S: DocumentStore>(
    request: DocumentRequest,
    store: &S,
) -> Result<DocumentResponse> {
    match request.method {
        Method::OPTIONS => Ok(preflight()),
        Method::POST => upload(request, store).await,
        Method::GET => list(&request, store).await,
        _ => json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorBody {
                error: "Method not allowed".to_string(),
            },
        ),
    }
}

async fn upload<S: DocumentStore>(request: DocumentRequest, store: &S) -> Result<DocumentResponse> {
    let form: UploadForm = serde_json::from_str(request.body.as_deref().unwrap_or("{}"))?;
    let document = form.into_new_document()?;

    let document_id = store.insert(&document).await?;
    logger::log_document_stored(
        document_id,
        document.document_type.as_deref().unwrap_or_default(),
    );

    json_response(
        StatusCode::OK,
        &UploadAccepted {
            success: true,
            document_id,
            message: UPLOAD_MESSAGE,
        },
    )
}

async fn list<S: DocumentStore>(request: &DocumentRequest, store: &S) -> Result<DocumentResponse> {
    let filter = match request.email_filter() {
        Some(email) => DocumentFilter::ByEmail(email.to_string()),
        None => DocumentFilter::Recent {
            limit: RECENT_LIMIT,
        },
    };

    let rows = store.list(&filter).await?;
    let documents: Vec<DocumentSummary> = rows.into_iter().map(DocumentSummary::from).collect();
    logger::log_documents_listed(
        documents.len(),
        matches!(filter, DocumentFilter::ByEmail(_)),
    );

    json_response(
        StatusCode::OK,
        &DocumentList {
            count: documents.len(),
            documents,
        },
    )
}

fn preflight() -> DocumentResponse {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, X-User-Email"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));

    DocumentResponse {
        status: StatusCode::OK,
        headers,
        body: String::new(),
        is_base64_encoded: false,
    }
}

/// JSON response with the CORS origin header every non-preflight response carries
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<DocumentResponse> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    Ok(DocumentResponse {
        status,
        headers,
        body: serde_json::to_string(body)?,
        is_base64_encoded: false,
    })
}
