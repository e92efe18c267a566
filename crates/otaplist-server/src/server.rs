//! HTTP server wiring

use crate::error::ManifestError;
use crate::handlers;
use anyhow::{bail, Result};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use otaplist_core::{RecordStore, ServerConfig};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const HEALTH_PATH: &str = "/health";

/// Shared state for the handlers
#[derive(Clone, Default)]
pub struct AppState {
    /// Store for id lookups; `None` when it could not be initialized
    pub store: Option<Arc<dyn RecordStore>>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn RecordStore>>) -> Self {
        Self { store }
    }
}

fn panic_detail(err: Box<dyn Any + Send + 'static>) -> String {
    err.downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string())
}

/// Panic on the query route: generation failure
fn query_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    ManifestError::Internal(panic_detail(err)).into_response()
}

/// Panic on the lookup route: fetch-or-generate failure
fn lookup_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    ManifestError::Upstream(format!("lookup panicked: {}", panic_detail(err))).into_response()
}

fn check_route(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        bail!("Route must start with '/': {}", path);
    }
    if path == HEALTH_PATH {
        bail!("Route {} is reserved", HEALTH_PATH);
    }
    Ok(())
}

/// Build the router serving both manifest endpoints.
///
/// Every response, errors included, carries `Access-Control-Allow-Origin: *`.
pub fn router(config: &ServerConfig, state: AppState) -> Result<Router> {
    check_route(&config.manifest_path)?;
    check_route(&config.lookup_path)?;
    if config.manifest_path == config.lookup_path {
        bail!(
            "manifest_path and lookup_path must differ: {}",
            config.manifest_path
        );
    }

    let app = Router::new()
        .route(
            &config.manifest_path,
            any(handlers::manifest_from_query).layer(CatchPanicLayer::custom(query_panic_response)),
        )
        .route(
            &config.lookup_path,
            any(handlers::manifest_by_id).layer(CatchPanicLayer::custom(lookup_panic_response)),
        )
        .route(HEALTH_PATH, get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                )),
        )
        .with_state(state);

    Ok(app)
}

/// Bind `config.bind` and serve until the process exits
pub async fn start_server(config: &ServerConfig, store: Option<Arc<dyn RecordStore>>) -> Result<()> {
    let app = router(config, AppState::new(store))?;
    let addr: SocketAddr = config.bind.parse()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "Serving manifests on http://{}{} and http://{}{}",
        addr,
        config.manifest_path,
        addr,
        config.lookup_path
    );
    axum::serve(listener, app).await?;

    Ok(())
}
