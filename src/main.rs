use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;

use cli::{Cli, Commands};
use cli::commands::{handle_config_command, handle_duplicate_command, handle_interactive_command};
use contentful_duplicate::config::Config;

const LOG_FILE: &str = "contentful-duplicate.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Log to file, truncated on each run
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting contentful-duplicate {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;

    match cli.command {
        Commands::Duplicate(args) => handle_duplicate_command(args, &config).await,
        Commands::Interactive(args) => handle_interactive_command(args, &config).await,
        Commands::Config(args) => handle_config_command(args, &config),
    }
}
