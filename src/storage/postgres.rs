// PostgreSQL document store
// One connection per operation, closed on every exit path

use sqlx::{Connection, PgConnection};

use super::{DocumentFilter, DocumentRow, DocumentStore, NewDocument};
use crate::error::StorageError;
use crate::logger;

const SCHEMA: &str = include_str!("schema.sql");

const INSERT_DOCUMENT: &str = "INSERT INTO documents \
     (user_name, user_email, user_phone, document_type, file_name, file_url) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id::BIGINT";

const LIST_BY_EMAIL: &str = "SELECT id::BIGINT AS id, user_name, user_email, \
     document_type, file_name, uploaded_at::TIMESTAMP AS uploaded_at FROM documents \
     WHERE user_email = $1 ORDER BY uploaded_at DESC";

const LIST_RECENT: &str = "SELECT id::BIGINT AS id, user_name, user_email, \
     document_type, file_name, uploaded_at::TIMESTAMP AS uploaded_at FROM documents \
     ORDER BY uploaded_at DESC LIMIT $1";

/// Store backed by the `documents` table
///
/// Holds only the name of the environment variable carrying the connection
/// string. The value is looked up again on every call and never cached.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    url_env: String,
}

impl PgDocumentStore {
    pub fn new(url_env: impl Into<String>) -> Self {
        Self {
            url_env: url_env.into(),
        }
    }

    async fn connect(&self) -> Result<PgConnection, StorageError> {
        let url = std::env::var(&self.url_env)
            .map_err(|_| StorageError::MissingUrl(self.url_env.clone()))?;
        PgConnection::connect(&url)
            .await
            .map_err(StorageError::Connect)
    }

    /// Create the `documents` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let outcome = sqlx::query(SCHEMA).execute(&mut conn).await;
        release(conn).await;
        outcome.map_err(StorageError::Query)?;
        logger::log_schema_ready();
        Ok(())
    }
}

/// Close the connection, logging a failed close
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        logger::log_warning(&format!("Failed to close database connection: {e}"));
    }
}

impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: &NewDocument) -> Result<i64, StorageError> {
        let mut conn = self.connect().await?;
        let outcome = sqlx::query_scalar::<_, i64>(INSERT_DOCUMENT)
            .bind(&document.user_name)
            .bind(&document.user_email)
            .bind(&document.user_phone)
            .bind(&document.document_type)
            .bind(&document.file_name)
            .bind(&document.file_url)
            .fetch_one(&mut conn)
            .await;
        release(conn).await;
        outcome.map_err(StorageError::Query)
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRow>, StorageError> {
        let mut conn = self.connect().await?;
        let outcome = match filter {
            DocumentFilter::ByEmail(email) => {
                sqlx::query_as::<_, DocumentRow>(LIST_BY_EMAIL)
                    .bind(email)
                    .fetch_all(&mut conn)
                    .await
            }
            DocumentFilter::Recent { limit } => {
                sqlx::query_as::<_, DocumentRow>(LIST_RECENT)
                    .bind(*limit)
                    .fetch_all(&mut conn)
                    .await
            }
        };
        release(conn).await;
        outcome.map_err(StorageError::Query)
    }
}
