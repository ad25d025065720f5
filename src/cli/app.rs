use super::commands::{ConfigCommands, DuplicateCommands, InteractiveCommands};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "contentful-duplicate")]
#[command(about = "Duplicate Contentful entries, and every entry they reference, into an environment")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Duplicate entries using command-line flags
    Duplicate(DuplicateCommands),
    /// Answer a series of prompts, then duplicate
    Interactive(InteractiveCommands),
    /// Inspect the configuration file
    Config(ConfigCommands),
}
