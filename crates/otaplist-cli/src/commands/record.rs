//! Record management for the local SQLite store

use crate::app::{RecordAction, RecordArgs};
use anyhow::Result;
use otaplist_core::{
    Config, ManifestRecord, OtaError, RecordStore, RecordWriter, SqliteStore,
};

pub async fn run(args: RecordArgs, config: &Config) -> Result<()> {
    let store = SqliteStore::open(&config.store.sqlite_path)?;
    store.initialize()?;

    match args.action {
        RecordAction::Add { id, fields } => {
            let record = ManifestRecord::from(fields);
            record.validate()?;
            store.put(&id, &record)?;
            println!("Saved record '{}' ({} {})", id, record.bundle_id, record.version);
        }
        RecordAction::Get { id } => {
            let record = store
                .fetch(&id)
                .await?
                .ok_or_else(|| OtaError::NotFound(id.clone()))?;
            println!("{}", record.to_plist());
        }
        RecordAction::List { json } => {
            let records = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No records");
            } else {
                for r in records {
                    println!(
                        "{}: {} {} ({})",
                        r.id, r.record.bundle_id, r.record.version, r.record.ipa_url
                    );
                }
            }
        }
        RecordAction::Remove { id } => {
            if !store.remove(&id)? {
                return Err(OtaError::NotFound(id).into());
            }
            println!("Removed record '{}'", id);
        }
    }
    Ok(())
}
