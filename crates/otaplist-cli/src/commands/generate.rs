//! One-off manifest generation

use crate::app::{GenerateArgs, ManifestFields};
use anyhow::Result;
use otaplist_core::ManifestRecord;

impl From<ManifestFields> for ManifestRecord {
    fn from(fields: ManifestFields) -> Self {
        ManifestRecord::new(fields.ipa_url, fields.bundle_id, fields.version, fields.app_name)
    }
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let record = ManifestRecord::from(args.fields);
    record.validate()?;

    let plist = record.to_plist();
    match args.output {
        Some(path) => {
            std::fs::write(&path, &plist)?;
            eprintln!("Wrote manifest to {}", path.display());
        }
        None => println!("{}", plist),
    }
    Ok(())
}
