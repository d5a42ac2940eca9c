use super::commands::health::HealthCommands;
use super::commands::query::QueryCommands;
use super::commands::resource::ResourceCommands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odata-datasource")]
#[command(about = "Run table queries, health checks and metadata lookups against an OData service")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Service root URL, overrides the config file and ODATA_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the service root answers
    Health(HealthCommands),
    /// Run one or more query payloads against the service
    Query(QueryCommands),
    /// Call a datasource resource such as `metadata`
    Resource(ResourceCommands),
}
