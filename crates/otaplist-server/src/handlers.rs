//! Manifest request handlers

use crate::error::ManifestError;
use crate::server::AppState;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use otaplist_core::manifest::HTTPS_PREFIX;
use otaplist_core::{ManifestRecord, PLIST_CONTENT_TYPE};

/// Decoded query string; the first non-empty occurrence of a key wins
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self(pairs)
    }

    /// Value for `key`, treating an empty value as absent
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

fn plist_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PLIST_CONTENT_TYPE),
        )],
        body,
    )
        .into_response()
}

/// Read the four manifest fields from the query string
fn record_from_query(params: &QueryParams) -> Result<ManifestRecord, ManifestError> {
    let (Some(ipa_url), Some(bundle_id), Some(version), Some(app_name)) = (
        params.get("ipaUrl"),
        params.get("bundleId"),
        params.get("version"),
        params.get("appName"),
    ) else {
        return Err(ManifestError::MissingParameters);
    };

    if !ipa_url.starts_with(HTTPS_PREFIX) {
        return Err(ManifestError::InsecureScheme);
    }

    Ok(ManifestRecord::new(ipa_url, bundle_id, version, app_name))
}

/// `?ipaUrl=..&bundleId=..&version=..&appName=..`
pub async fn manifest_from_query(RawQuery(query): RawQuery) -> Response {
    let params = QueryParams::parse(query.as_deref());
    match record_from_query(&params) {
        Ok(record) => {
            tracing::debug!("Serving manifest for {}", record.bundle_id);
            plist_response(record.to_plist())
        }
        Err(e) => e.into_response(),
    }
}

async fn lookup(state: &AppState, params: &QueryParams) -> Result<String, ManifestError> {
    let id = params.get("id").ok_or(ManifestError::MissingId)?;

    let store = state
        .store
        .as_ref()
        .ok_or_else(|| ManifestError::Upstream("record store is not configured".to_string()))?;

    let record = store
        .fetch(id)
        .await
        .map_err(|e| ManifestError::Upstream(format!("{} lookup of {}: {}", store.backend(), id, e)))?
        .ok_or_else(|| ManifestError::NotFound(id.to_string()))?;

    tracing::debug!("Serving manifest {} for {}", id, record.bundle_id);
    Ok(record.to_plist())
}

/// `?id=..`, resolved through the record store
pub async fn manifest_by_id(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let params = QueryParams::parse(query.as_deref());
    match lookup(&state, &params).await {
        Ok(body) => plist_response(body),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> &'static str {
    "ok"
}
