use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use odata_datasource::ODataSource;

#[derive(Args)]
pub struct ResourceCommands {
    /// Resource path, e.g. `metadata`
    pub path: String,

    /// Pretty print JSON bodies
    #[arg(short, long)]
    pub pretty: bool,
}

pub async fn resource_command(datasource: &ODataSource, args: ResourceCommands) -> Result<()> {
    let response = datasource
        .call_resource(&args.path)
        .await
        .with_context(|| format!("Resource call '{}' failed", args.path))?;

    if response.status != 200 {
        println!("{} {}", "Status".yellow(), response.status);
        return Ok(());
    }

    if args.pretty {
        let json: serde_json::Value = serde_json::from_slice(&response.body)
            .context("Resource body is not valid JSON")?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", String::from_utf8_lossy(&response.body));
    }
    Ok(())
}
