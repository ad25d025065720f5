pub mod config;
pub mod duplicate;
pub mod interactive;

pub use config::{ConfigCommands, handle_config_command};
pub use duplicate::{DuplicateCommands, handle_duplicate_command};
pub use interactive::{InteractiveCommands, handle_interactive_command};
