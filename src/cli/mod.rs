//! CLI subcommand implementations for the wordvault binary.

pub mod doctor;
pub mod export_cmd;
pub mod output;
