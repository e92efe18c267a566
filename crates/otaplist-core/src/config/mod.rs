//! Configuration management

use crate::error::{OtaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Route of the query-parameter manifest endpoint
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Route of the id lookup endpoint
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            manifest_path: default_manifest_path(),
            lookup_path: default_lookup_path(),
        }
    }
}

fn default_bind() -> String {
    std::env::var("OTAPLIST_BIND").unwrap_or_else(|_| "127.0.0.1:8787".to_string())
}

fn default_manifest_path() -> String {
    "/api/manifest".to_string()
}

fn default_lookup_path() -> String {
    "/api/manifest/lookup".to_string()
}

/// Which record store backs the lookup endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Firestore,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = OtaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            other => Err(OtaError::Config(format!("Unknown store backend: {}", other))),
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// SQLite database file for the `sqlite` backend
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    #[serde(default)]
    pub firestore: FirestoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            sqlite_path: default_sqlite_path(),
            firestore: FirestoreConfig::default(),
        }
    }
}

fn default_backend() -> StoreBackend {
    std::env::var("OTAPLIST_STORE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(StoreBackend::Sqlite)
}

fn default_sqlite_path() -> PathBuf {
    std::env::var("OTAPLIST_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::DATA_DIR_NAME)
                .join("manifests.sqlite")
        })
}

/// Firestore REST configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    #[serde(default = "default_project_id")]
    pub project_id: Option<String>,

    /// Application namespace under `artifacts/`
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// OAuth bearer token
    #[serde(default = "default_access_token")]
    pub access_token: Option<String>,

    /// Web API key, sent as `key=`
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// REST root (override for the emulator)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            app_id: default_app_id(),
            access_token: default_access_token(),
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_project_id() -> Option<String> {
    non_empty_env("FIREBASE_PROJECT_ID")
}

fn default_app_id() -> String {
    non_empty_env("OTAPLIST_APP_ID").unwrap_or_else(|| "default-app-id".to_string())
}

fn default_access_token() -> Option<String> {
    non_empty_env("FIREBASE_ACCESS_TOKEN")
}

fn default_api_key() -> Option<String> {
    non_empty_env("FIREBASE_API_KEY")
}

fn default_base_url() -> String {
    non_empty_env("FIRESTORE_BASE_URL")
        .unwrap_or_else(|| "https://firestore.googleapis.com/v1".to_string())
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load config from a specific file, falling back to defaults if it is absent
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
