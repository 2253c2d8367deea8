// Shared server state

use std::sync::atomic::AtomicUsize;

use crate::config::Config;
use crate::storage::PgDocumentStore;

/// Read-only after startup apart from the connection counter
pub struct AppState {
    pub config: Config,
    pub store: PgDocumentStore,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = PgDocumentStore::new(config.database.url_env.clone());
        Self {
            config,
            store,
            active_connections: AtomicUsize::new(0),
        }
    }
}
