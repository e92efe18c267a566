//! Manifest record stores
//!
//! The lookup endpoint resolves an id to a [`ManifestRecord`] through the
//! [`RecordStore`] trait. Backends:
//! - SQLite (local document store, writable)
//! - Firestore (REST, read-only)
//! - In-memory (tests and local demos)

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use crate::manifest::ManifestRecord;
use serde::Serialize;
use std::sync::Arc;

pub mod firestore;
pub mod memory;
pub mod sqlite;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Read side of a record store; shared by every in-flight request
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend identifier (e.g., "sqlite", "firestore")
    fn backend(&self) -> &'static str;

    /// Fetch the record stored under `id`; `Ok(None)` if there is none
    async fn fetch(&self, id: &str) -> Result<Option<ManifestRecord>>;
}

/// Write side, for backends that own their data
pub trait RecordWriter {
    /// Insert or replace the record under `id`
    fn put(&self, id: &str, record: &ManifestRecord) -> Result<()>;

    /// Delete the record under `id`, returning whether it existed
    fn remove(&self, id: &str) -> Result<bool>;

    /// All stored records ordered by id
    fn list(&self) -> Result<Vec<StoredRecord>>;
}

/// A record together with its id, as listed by a writable store
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub id: String,
    #[serde(flatten)]
    pub record: ManifestRecord,
    pub updated_at: Option<String>,
}

/// Construct the configured backend.
///
/// Fails with a configuration error when the backend cannot be set up
/// (e.g., Firestore credentials are missing); the caller decides whether
/// that is fatal.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.sqlite_path)?;
            store.initialize()?;
            Arc::new(store)
        }
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(config.firestore.clone())?),
        StoreBackend::Memory => Arc::new(MemoryStore::demo()),
    };
    tracing::info!("Opened {} record store", store.backend());
    Ok(store)
}
