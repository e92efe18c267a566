//! Manifest server command

use crate::app::ServeArgs;
use anyhow::Result;
use otaplist_core::{open_store, Config};

pub async fn run(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(backend) = args.store {
        config.store.backend = backend;
    }

    let store = match open_store(&config.store) {
        Ok(store) => Some(store),
        Err(e) if args.require_store => return Err(e.into()),
        Err(e) => {
            tracing::warn!("Record store unavailable, id lookups will fail: {}", e);
            None
        }
    };

    otaplist_server::start_server(&config.server, store).await
}
