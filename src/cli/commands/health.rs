use anyhow::Result;
use clap::Args;
use colored::*;

use odata_datasource::ODataSource;
use odata_datasource::datasource::HealthStatus;

#[derive(Args)]
pub struct HealthCommands {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Returns whether the datasource is healthy
pub async fn health_command(datasource: &ODataSource, args: HealthCommands) -> Result<bool> {
    let result = datasource.check_health().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match result.status {
            HealthStatus::Ok => println!("{} {}", "OK".green().bold(), result.message),
            HealthStatus::Error => println!("{} {}", "ERROR".red().bold(), result.message),
        }
    }

    Ok(result.status == HealthStatus::Ok)
}
