//! In-memory record store

use super::{RecordStore, RecordWriter, StoredRecord};
use crate::error::Result;
use crate::manifest::ManifestRecord;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Record store backed by a map; contents are lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, ManifestRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the `demo123` sample record
    pub fn demo() -> Self {
        Self::default().with_record(
            "demo123",
            ManifestRecord::new(
                "https://example.com/downloads/my_app.ipa",
                "com.sample.testapp",
                "1.0",
                "テストアプリ",
            ),
        )
    }

    /// Builder-style insert
    pub fn with_record(self, id: impl Into<String>, record: ManifestRecord) -> Self {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.into(), record);
        self
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, id: &str) -> Result<Option<ManifestRecord>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(id).cloned())
    }
}

impl RecordWriter for MemoryStore {
    fn put(&self, id: &str, record: &ManifestRecord) -> Result<()> {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool> {
        Ok(self
            .records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some())
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .iter()
            .map(|(id, record)| StoredRecord {
                id: id.clone(),
                record: record.clone(),
                updated_at: None,
            })
            .collect())
    }
}
