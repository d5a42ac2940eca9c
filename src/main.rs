use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use odata_datasource::ODataSource;
use odata_datasource::config::Config;

mod cli;

use cli::{Cli, Commands};
use cli::commands::health::health_command;
use cli::commands::query::handle_query_command;
use cli::commands::resource::resource_command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(path) = &cli.log_file {
        // Truncate on each run
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(log_file)));
    }
    logger.init();

    let config = Config::load(cli.config.as_deref())?;
    let instance = config.instance_settings(cli.url.as_deref())?;
    info!("Starting odata-datasource against {}", instance.url);

    let datasource = ODataSource::from_settings(&instance)?;

    let success = match cli.command {
        Commands::Health(args) => health_command(&datasource, args).await?,
        Commands::Query(args) => handle_query_command(&datasource, args).await?,
        Commands::Resource(args) => {
            resource_command(&datasource, args).await?;
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
