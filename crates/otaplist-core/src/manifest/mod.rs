//! Manifest records and PLIST generation

mod escape;
mod plist;

pub use escape::escape_xml;
pub use plist::{build_plist, ASSET_KIND, METADATA_KIND, PLIST_CONTENT_TYPE};

use crate::error::{OtaError, Result};
use serde::{Deserialize, Serialize};

/// Required URL prefix; OTA installers refuse plain-HTTP packages
pub const HTTPS_PREFIX: &str = "https://";

/// The four fields an OTA manifest is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    /// HTTPS URL of the `.ipa` package
    pub ipa_url: String,

    /// Reverse-DNS bundle identifier
    pub bundle_id: String,

    pub version: String,

    /// Human-readable title shown by the installer
    pub app_name: String,
}

impl ManifestRecord {
    pub fn new(
        ipa_url: impl Into<String>,
        bundle_id: impl Into<String>,
        version: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            ipa_url: ipa_url.into(),
            bundle_id: bundle_id.into(),
            version: version.into(),
            app_name: app_name.into(),
        }
    }

    /// Check that every field is present and the package URL uses HTTPS
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("ipaUrl", &self.ipa_url),
            ("bundleId", &self.bundle_id),
            ("version", &self.version),
            ("appName", &self.app_name),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(OtaError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !self.ipa_url.starts_with(HTTPS_PREFIX) {
            return Err(OtaError::Validation(
                "ipaUrl must use HTTPS scheme".to_string(),
            ));
        }

        Ok(())
    }

    /// Render this record as an OTA manifest document
    pub fn to_plist(&self) -> String {
        build_plist(&self.ipa_url, &self.bundle_id, &self.version, &self.app_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ManifestRecord {
        ManifestRecord::new(
            "https://example.com/a.ipa",
            "com.sample.testapp",
            "1.0",
            "Test App",
        )
    }

    #[test]
    fn test_validate_accepts_https() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_http() {
        let mut record = sample();
        record.ipa_url = "http://x.com/a.ipa".to_string();
        let err = record.validate().unwrap_err();
        assert!(matches!(err, OtaError::Validation(_)));
        assert!(err.to_string().contains("HTTPS"));
    }

    #[test]
    fn test_validate_prefix_is_case_sensitive() {
        let mut record = sample();
        record.ipa_url = "HTTPS://example.com/a.ipa".to_string();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let record = ManifestRecord::new("", "com.x", "", "App");
        let err = record.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ipaUrl"));
        assert!(msg.contains("version"));
        assert!(!msg.contains("bundleId"));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ipaUrl"], "https://example.com/a.ipa");
        assert_eq!(json["bundleId"], "com.sample.testapp");
        assert_eq!(json["appName"], "Test App");

        let back: ManifestRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_to_plist_matches_builder() {
        let record = sample();
        assert_eq!(
            record.to_plist(),
            build_plist(
                "https://example.com/a.ipa",
                "com.sample.testapp",
                "1.0",
                "Test App"
            )
        );
    }
}
