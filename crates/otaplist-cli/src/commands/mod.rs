//! CLI command handlers

pub mod generate;
pub mod record;
pub mod serve;
