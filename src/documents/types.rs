// Request, response and body types for the document handler

use std::collections::HashMap;

use chrono::{NaiveDateTime, Timelike};
use hyper::header::HeaderMap;
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HandlerError, Result};
use crate::storage::{DocumentRow, NewDocument};

/// Characters of `file_data` kept in the placeholder reference
pub const PLACEHOLDER_CHARS: usize = 100;

pub const UPLOAD_MESSAGE: &str = "Документ успешно загружен";

/// Transport-independent request
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub method: Method,
    pub body: Option<String>,
    pub query: HashMap<String, String>,
}

impl DocumentRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            query: HashMap::new(),
        }
    }

    /// `email` filter; an empty value counts as absent
    pub fn email_filter(&self) -> Option<&str> {
        self.query
            .get("email")
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
impl DocumentRequest {
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }
}

/// Transport-independent response
#[derive(Debug, Clone)]
pub struct DocumentResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    pub is_base64_encoded: bool,
}

/// POST body: any JSON object, fields read without type checks
///
/// A missing field becomes `""` and an explicit `null` is stored as NULL.
/// Numbers and booleans are stored as their JSON text. Arrays and objects
/// have no text form and are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct UploadForm {
    fields: Map<String, Value>,
}

impl UploadForm {
    pub fn into_new_document(mut self) -> Result<NewDocument> {
        let file_data = self.text("file_data")?.unwrap_or_default();
        Ok(NewDocument {
            user_name: self.text("user_name")?,
            user_email: self.text("user_email")?,
            user_phone: self.text("user_phone")?,
            document_type: self.text("document_type")?,
            file_name: self.text("file_name")?,
            file_url: placeholder_reference(&file_data),
        })
    }

    fn text(&mut self, field: &'static str) -> Result<Option<String>> {
        match self.fields.remove(field) {
            None => Ok(Some(String::new())),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(Value::Array(_) | Value::Object(_)) => Err(HandlerError::UnsupportedField(field)),
        }
    }
}

/// Stand-in for a real object URL: a data URI holding only the head of the payload
pub fn placeholder_reference(file_data: &str) -> String {
    let head: String = file_data.chars().take(PLACEHOLDER_CHARS).collect();
    format!("data:application/pdf;base64,{head}...")
}

#[derive(Debug, Serialize)]
pub struct UploadAccepted {
    pub success: bool,
    pub document_id: i64,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub document_type: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_at: Option<String>,
}

impl From<DocumentRow> for DocumentSummary {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            user_name: row.user_name,
            user_email: row.user_email,
            document_type: row.document_type,
            file_name: row.file_name,
            uploaded_at: row.uploaded_at.as_ref().map(isoformat),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` appended only when there are sub-second digits
pub fn isoformat(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
