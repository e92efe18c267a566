//! Otaplist Core Library
//!
//! Builds Apple OTA install manifests (`itms-services` PLIST documents) and
//! looks up manifest records from a document store.
//!
//! # Features
//! - XML escaping and a byte-exact PLIST manifest template
//! - `RecordStore` abstraction with SQLite, Firestore and in-memory backends
//! - YAML configuration with environment overrides

pub mod config;
pub mod error;
pub mod manifest;
pub mod store;

pub use config::{Config, FirestoreConfig, ServerConfig, StoreBackend, StoreConfig};
pub use error::{Error, OtaError, Result};
pub use manifest::{build_plist, escape_xml, ManifestRecord, PLIST_CONTENT_TYPE};
pub use store::{
    open_store, FirestoreStore, MemoryStore, RecordStore, RecordWriter, SqliteStore, StoredRecord,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "otaplist";

/// Default data directory name
pub const DATA_DIR_NAME: &str = "otaplist";
