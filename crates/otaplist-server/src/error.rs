//! Error responses for the manifest endpoints

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Content type of every error body
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Failures a manifest request can end in.
///
/// Each maps to a fixed status and body; internal details stay in the
/// server log.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// One of ipaUrl, bundleId, version, appName is absent or empty.
    #[error("missing required query parameters")]
    MissingParameters,

    /// ipaUrl does not start with `https://`.
    #[error("ipaUrl must use HTTPS scheme")]
    InsecureScheme,

    /// The lookup endpoint was called without an `id`.
    #[error("missing id parameter")]
    MissingId,

    /// No record exists for the id.
    #[error("manifest not found: {0}")]
    NotFound(String),

    /// The lookup failed: store error, no store configured, or a panic
    /// while serving it.
    #[error("record store error: {0}")]
    Upstream(String),

    /// Unexpected failure while producing the manifest.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ManifestError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameters | Self::InsecureScheme | Self::MissingId => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body
    pub fn body(&self) -> String {
        match self {
            Self::MissingParameters => {
                "Error: Missing required query parameters (ipaUrl, bundleId, version, appName)."
                    .to_string()
            }
            Self::InsecureScheme => "Error: ipaUrl must use HTTPS scheme.".to_string(),
            Self::MissingId => "Error: Missing required query parameter \"id\".".to_string(),
            Self::NotFound(id) => format!("Error: Manifest data not found for ID: {}", id),
            Self::Upstream(_) => {
                "Internal Server Error while fetching or generating PLIST.".to_string()
            }
            Self::Internal(_) => "Internal Server Error during PLIST generation.".to_string(),
        }
    }
}

impl IntoResponse for ManifestError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(detail) | Self::Internal(detail) => {
                tracing::error!("Manifest request failed: {}", detail);
            }
            _ => tracing::debug!("Rejected manifest request: {}", self),
        }

        (
            self.status_code(),
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(TEXT_CONTENT_TYPE),
            )],
            self.body(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ManifestError::MissingParameters.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ManifestError::InsecureScheme.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ManifestError::MissingId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ManifestError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ManifestError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ManifestError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_bodies_do_not_leak_details() {
        let body = ManifestError::Upstream("connection refused to 10.0.0.3".into()).body();
        assert!(!body.contains("10.0.0.3"));

        let body = ManifestError::Internal("secret".into()).body();
        assert!(!body.contains("secret"));
    }

    #[test]
    fn test_not_found_body_names_id() {
        assert_eq!(
            ManifestError::NotFound("missing-id".into()).body(),
            "Error: Manifest data not found for ID: missing-id"
        );
    }

    #[test]
    fn test_error_response_is_plain_text() {
        let response = ManifestError::MissingId.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            TEXT_CONTENT_TYPE
        );
    }
}
