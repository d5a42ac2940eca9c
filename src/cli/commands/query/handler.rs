//! Query command handler

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use colored::*;
use std::fs;
use std::time::Instant;

use odata_datasource::ODataSource;
use odata_datasource::api::TimeRange;
use odata_datasource::datasource::DataQuery;

use super::{OutputFormat, QueryCommands};

/// Run every payload file as one batch; returns whether all queries succeeded
pub async fn handle_query_command(datasource: &ODataSource, args: QueryCommands) -> Result<bool> {
    let to = args.to.unwrap_or_else(Utc::now);
    let from = args.from.unwrap_or(to - Duration::hours(6));
    if from > to {
        anyhow::bail!("--from ({}) is after --to ({})", from, to);
    }
    let time_range = TimeRange::new(from, to);

    let mut queries = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let json = fs::read(path)
            .with_context(|| format!("Failed to read query file: {}", path.display()))?;
        let ref_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        queries.push(DataQuery::new(ref_id, json, time_range));
    }

    let start = Instant::now();
    let result = datasource.query_data(&queries).await;
    log::info!(
        "Ran {} queries in {:.2}ms",
        queries.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let mut all_ok = true;
    for (ref_id, response) in &result.responses {
        match response {
            Ok(frame) => match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(frame)?),
                OutputFormat::Table => {
                    println!("{} {}", "Query".cyan().bold(), ref_id.bold());
                    print!("{}", frame.to_table_string());
                    println!();
                }
            },
            Err(e) => {
                all_ok = false;
                eprintln!("{} {}: {}", "Query failed".red().bold(), ref_id, e);
            }
        }
    }

    Ok(all_ok)
}
