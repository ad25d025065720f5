//! `config`: inspect the persistent defaults

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use contentful_duplicate::config::{Config, TARGET_TOKEN_ENV, TOKEN_ENV, env_value};

#[derive(Args, Debug)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Show the effective configuration
    Show,
    /// Print the location of the config file
    Path,
    /// Write the default configuration if no config file exists yet
    Init,
}

fn token_status(name: &str) -> String {
    match env_value(name) {
        Some(_) => "set".green().to_string(),
        None => "not set".dimmed().to_string(),
    }
}

pub fn handle_config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            let rendered = toml::to_string_pretty(config).context("Failed to render config")?;
            println!("{}", rendered.trim_end());
            println!();
            println!("{} {}", TOKEN_ENV, token_status(TOKEN_ENV));
            println!("{} {}", TARGET_TOKEN_ENV, token_status(TARGET_TOKEN_ENV));
        }
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
        }
        ConfigSubcommands::Init => {
            let path = Config::get_config_path()?;
            if path.exists() {
                println!("Config file already exists at {}", path.display().to_string().cyan());
            } else {
                Config::default().save_to(&path)?;
                println!("{} Wrote defaults to {}", "✓".green(), path.display().to_string().cyan());
            }
        }
    }
    Ok(())
}
