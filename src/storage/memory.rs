// In-memory document store for tests
// Mirrors the database's ordering and id assignment and counts every call

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::{DocumentFilter, DocumentRow, DocumentStore, NewDocument};
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(DocumentRow, NewDocument)>>,
    inserts: AtomicUsize,
    lists: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of store operations performed
    pub fn calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst) + self.lists.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Everything inserted for a document id, `user_phone` and `file_url` included
    pub fn stored(&self, id: i64) -> Option<NewDocument> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|(row, _)| row.id == id)
            .map(|(_, doc)| doc.clone())
    }

    /// Stored `file_url` for a document id
    pub fn file_url(&self, id: i64) -> Option<String> {
        self.stored(id).map(|doc| doc.file_url)
    }

    /// Each insert lands one second after the previous one
    fn timestamp_for(id: i64) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        base + TimeDelta::seconds(id)
    }
}

impl DocumentStore for MemoryStore {
    async fn insert(&self, document: &NewDocument) -> Result<i64, StorageError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let id = i64::try_from(rows.len()).unwrap() + 1;
        rows.push((
            DocumentRow {
                id,
                user_name: document.user_name.clone(),
                user_email: document.user_email.clone(),
                document_type: document.document_type.clone(),
                file_name: document.file_name.clone(),
                uploaded_at: Some(Self::timestamp_for(id)),
            },
            document.clone(),
        ));
        Ok(id)
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRow>, StorageError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<DocumentRow> = rows
            .iter()
            .map(|(row, _)| row)
            .filter(|row| match filter {
                DocumentFilter::ByEmail(email) => row.user_email.as_deref() == Some(email.as_str()),
                DocumentFilter::Recent { .. } => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        if let DocumentFilter::Recent { limit } = filter {
            matching.truncate(usize::try_from(*limit).unwrap());
        }
        Ok(matching)
    }
}
