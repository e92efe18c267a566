//! Firestore REST record store
//!
//! Reads manifest documents from
//! `artifacts/{app_id}/public/data/manifests/{id}` in the project's default
//! database. Documents carry the four fields as Firestore string values.

use super::RecordStore;
use crate::config::FirestoreConfig;
use crate::error::{OtaError, Result};
use crate::manifest::ManifestRecord;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Read-only client for manifest documents in Firestore
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Value {
    string_value: Option<String>,
}

impl Document {
    fn string_field(&self, name: &str) -> Option<String> {
        self.fields.get(name)?.string_value.clone()
    }

    fn into_record(self) -> Option<ManifestRecord> {
        Some(ManifestRecord {
            ipa_url: self.string_field("ipaUrl")?,
            bundle_id: self.string_field("bundleId")?,
            version: self.string_field("version")?,
            app_name: self.string_field("appName")?,
        })
    }
}

impl FirestoreStore {
    /// Create a client, checking that credentials are usable
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| OtaError::Config("Firestore project_id is not set".to_string()))?;

        if config.access_token.is_none() && config.api_key.is_none() {
            return Err(OtaError::Config(
                "Firestore requires an access_token or api_key".to_string(),
            ));
        }

        Url::parse(&config.base_url).map_err(|e| {
            OtaError::Config(format!("Invalid Firestore base_url {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .user_agent(concat!("otaplist/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            project_id,
        })
    }

    /// Document URL for `id`; the id is always a single path segment.
    ///
    /// `.` and `..` are rejected since URL normalization would drop them and
    /// address the collection instead of a document.
    pub fn document_url(&self, id: &str) -> Result<Url> {
        if is_dot_segment(id) {
            return Err(OtaError::Validation(format!(
                "Invalid manifest id: {:?}",
                id
            )));
        }

        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| OtaError::Config(format!("Invalid Firestore base_url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| OtaError::Config("Firestore base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                "artifacts",
                self.config.app_id.as_str(),
                "public",
                "data",
                "manifests",
                id,
            ]);

        if let Some(ref key) = self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }

        Ok(url)
    }
}

fn is_dot_segment(id: &str) -> bool {
    id == "." || id == ".."
}

#[async_trait::async_trait]
impl RecordStore for FirestoreStore {
    fn backend(&self) -> &'static str {
        "firestore"
    }

    async fn fetch(&self, id: &str) -> Result<Option<ManifestRecord>> {
        // No document can be named `.` or `..`
        if is_dot_segment(id) {
            return Ok(None);
        }

        let url = self.document_url(id)?;
        let mut request = self.client.get(url);
        if let Some(ref token) = self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                OtaError::Upstream("Firestore request timed out".to_string())
            } else if e.is_connect() {
                OtaError::Upstream(format!("Cannot reach Firestore: {}", e))
            } else {
                OtaError::Upstream(format!("Firestore request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(OtaError::Upstream(format!(
                "Firestore returned HTTP {}",
                status.as_u16()
            )));
        }

        let document: Document = response.json().await.map_err(|e| {
            OtaError::Upstream(format!("Malformed Firestore document: {}", e))
        })?;

        let record = document.into_record();
        if record.is_none() {
            tracing::warn!("Firestore document {} lacks manifest fields", id);
        }
        Ok(record)
    }
}
