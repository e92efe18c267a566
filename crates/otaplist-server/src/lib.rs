//! Otaplist HTTP server
//!
//! Serves OTA install manifests in two flavours: built straight from query
//! parameters, or looked up by id in a record store.

mod error;
mod handlers;
mod server;

pub use error::{ManifestError, TEXT_CONTENT_TYPE};
pub use server::{router, start_server, AppState};
