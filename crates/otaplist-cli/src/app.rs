//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use otaplist_core::StoreBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "otaplist")]
#[command(author, version, about = "Serve and generate iOS OTA install manifests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "OTAPLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the manifest HTTP server
    Serve(ServeArgs),

    /// Print a manifest for the given fields
    Generate(GenerateArgs),

    /// Manage records in the local SQLite store
    Record(RecordArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind, e.g. 0.0.0.0:8787
    #[arg(long)]
    pub bind: Option<String>,

    /// Record store backend
    #[arg(long, value_parser = parse_backend)]
    pub store: Option<StoreBackend>,

    /// Exit instead of serving when the record store cannot be opened
    #[arg(long)]
    pub require_store: bool,
}

fn parse_backend(s: &str) -> Result<StoreBackend, String> {
    s.parse().map_err(|e: otaplist_core::OtaError| e.to_string())
}

/// The four manifest fields
#[derive(Args)]
pub struct ManifestFields {
    /// HTTPS URL of the .ipa package
    #[arg(long)]
    pub ipa_url: String,

    /// Bundle identifier, e.g. com.example.app
    #[arg(long)]
    pub bundle_id: String,

    /// Bundle version
    #[arg(long = "bundle-version")]
    pub version: String,

    /// Title shown by the installer
    #[arg(long)]
    pub app_name: String,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub fields: ManifestFields,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub action: RecordAction,
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add or replace a record
    Add {
        id: String,
        #[command(flatten)]
        fields: ManifestFields,
    },
    /// Print the manifest for a record
    Get { id: String },
    /// List all records
    #[command(alias = "ls")]
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a record
    #[command(alias = "rm")]
    Remove { id: String },
}
