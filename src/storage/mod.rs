//! Document storage
//!
//! `DocumentStore` is the seam between the request handler and the database.
//! The production implementation is [`PgDocumentStore`]; tests use an
//! in-memory store that records every call.

#[cfg(test)]
pub mod memory;
mod postgres;

use std::future::Future;

use chrono::NaiveDateTime;

use crate::error::StorageError;

pub use postgres::PgDocumentStore;

/// Size of the unfiltered listing
pub const RECENT_LIMIT: i64 = 50;

/// Row to append to `documents`; `id` and `uploaded_at` come from storage
///
/// `None` is written as SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
    pub document_type: Option<String>,
    pub file_name: Option<String>,
    pub file_url: String,
}

/// Listed columns of a stored document
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub document_type: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_at: Option<NaiveDateTime>,
}

/// Which documents a listing returns. Both variants are newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Every document submitted with this email, no limit
    ByEmail(String),
    /// The most recent documents across all submitters
    Recent { limit: i64 },
}

pub trait DocumentStore {
    /// Append one document and return its generated id
    fn insert(&self, document: &NewDocument) -> impl Future<Output = Result<i64, StorageError>>;

    fn list(
        &self,
        filter: &DocumentFilter,
    ) -> impl Future<Output = Result<Vec<DocumentRow>, StorageError>>;
}
