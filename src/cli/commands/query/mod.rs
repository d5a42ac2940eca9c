pub mod handler;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

pub use handler::handle_query_command;

#[derive(Args)]
pub struct QueryCommands {
    /// Query payload files; each file stem becomes the ref id
    #[arg(short, long = "file", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Start of the time range (RFC 3339), defaults to six hours before --to
    #[arg(long, value_parser = parse_instant)]
    pub from: Option<DateTime<Utc>>,

    /// End of the time range (RFC 3339), defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub to: Option<DateTime<Utc>>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", value, e))
}
