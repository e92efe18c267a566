//! SQLite-backed record store

use super::{RecordStore, RecordWriter, StoredRecord};
use crate::error::{OtaError, Result};
use crate::manifest::ManifestRecord;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA_VERSION: i32 = 1;

const CREATE_TABLES: &str = r#"
-- One manifest record per id
CREATE TABLE IF NOT EXISTS manifests (
    id TEXT PRIMARY KEY,
    ipa_url TEXT NOT NULL,
    bundle_id TEXT NOT NULL,
    version TEXT NOT NULL,
    app_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// Record store on a local SQLite file
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open database at path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initialize database schema
    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(CREATE_TABLES)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fetch_blocking(conn: &Connection, id: &str) -> Result<Option<ManifestRecord>> {
        let record = conn
            .query_row(
                "SELECT ipa_url, bundle_id, version, app_name FROM manifests WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ManifestRecord {
                        ipa_url: row.get(0)?,
                        bundle_id: row.get(1)?,
                        version: row.get(2)?,
                        app_name: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

#[async_trait::async_trait]
impl RecordStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch(&self, id: &str) -> Result<Option<ManifestRecord>> {
        let conn = Arc::clone(&self.conn);
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|e| e.into_inner());
            Self::fetch_blocking(&conn, &id)
        })
        .await
        .map_err(|e| OtaError::Internal(format!("SQLite lookup task failed: {}", e)))?
    }
}

impl RecordWriter for SqliteStore {
    fn put(&self, id: &str, record: &ManifestRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.lock().execute(
            "INSERT INTO manifests (id, ipa_url, bundle_id, version, app_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(id) DO UPDATE SET
                ipa_url = excluded.ipa_url,
                bundle_id = excluded.bundle_id,
                version = excluded.version,
                app_name = excluded.app_name,
                updated_at = excluded.updated_at",
            params![
                id,
                record.ipa_url,
                record.bundle_id,
                record.version,
                record.app_name,
                now
            ],
        )?;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let rows = self
            .lock()
            .execute("DELETE FROM manifests WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, ipa_url, bundle_id, version, app_name, updated_at
             FROM manifests ORDER BY id",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    record: ManifestRecord {
                        ipa_url: row.get(1)?,
                        bundle_id: row.get(2)?,
                        version: row.get(3)?,
                        app_name: row.get(4)?,
                    },
                    updated_at: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(version: &str) -> ManifestRecord {
        ManifestRecord::new(
            "https://example.com/a.ipa",
            "com.sample.testapp",
            version,
            "Test App",
        )
    }

    #[tokio::test]
    async fn test_put_then_fetch() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();

        store.put("demo123", &record("1.0")).unwrap();
        assert_eq!(store.fetch("demo123").await.unwrap(), Some(record("1.0")));
        assert_eq!(store.fetch("missing-id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();

        store.put("app", &record("1.0")).unwrap();
        store.put("app", &record("1.1")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.version, "1.1");
        assert!(listed[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();

        store.put("app", &record("1.0")).unwrap();
        assert!(store.remove("app").unwrap());
        assert!(!store.remove("app").unwrap());
        assert!(store.fetch("app").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifests.sqlite");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.initialize().unwrap();
            store.put("kept", &record("3.0")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        store.initialize().unwrap();
        assert_eq!(store.fetch("kept").await.unwrap(), Some(record("3.0")));
    }
}
