//! `interactive`: collect the job parameters through prompts

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use is_terminal::IsTerminal;

use super::duplicate::{DuplicateCommands, JobRequest, run_request};
use crate::cli::ui::prompts::{
    prompt_choice, prompt_confirmation, prompt_optional, prompt_protected_confirmation, prompt_required, prompt_secret,
};
use contentful_duplicate::config::{Config, SPACE_ID_ENV, TOKEN_ENV, env_value};

const ENVIRONMENT_CHOICES: &[&str] = &["develop", "staging", "master"];

#[derive(Args, Debug)]
pub struct InteractiveCommands {
    /// Print every original → duplicate id pair once the job finishes
    #[arg(long)]
    pub show_mapping: bool,
}

/// Well-known environments plus whatever the config file names
fn environment_choices(config: &Config) -> Vec<String> {
    let mut choices: Vec<String> = ENVIRONMENT_CHOICES.iter().map(|s| s.to_string()).collect();
    for configured in [Some(&config.environment), config.target_environment.as_ref()]
        .into_iter()
        .flatten()
    {
        if !choices.contains(configured) {
            choices.push(configured.clone());
        }
    }
    choices
}

pub async fn handle_interactive_command(args: InteractiveCommands, config: &Config) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("The interactive mode needs a terminal. Use `contentful-duplicate duplicate` instead");
    }

    let default_space = config.space_id.clone().or_else(|| env_value(SPACE_ID_ENV));
    let space_id = prompt_required("* Enter your Contentful Space ID", default_space.as_deref())?;

    let token = match env_value(TOKEN_ENV) {
        Some(token) => {
            println!("{} Using management token from {}", "ℹ".blue(), TOKEN_ENV);
            token
        }
        None => prompt_secret("* Enter your Contentful Personal Access Token")?,
    };

    let entries = prompt_required(
        "* Enter the entry / entries ID you wish to duplicate (use commas to separate multiple IDs)",
        None,
    )?;
    let exclude = prompt_optional(&format!(
        "Enter the entry / entries ID you wish to {} (use commas to separate multiple IDs)",
        "exclude".underline()
    ))?;

    let choices = environment_choices(config);
    let environment = prompt_choice(
        "* Enter the source environment (environment the entry / entries are located)",
        &choices,
        Some(config.environment.as_str()),
    )?;
    let target_environment = prompt_choice(
        "* Enter the target environment (environment you wish to duplicate to)",
        &choices,
        config.target_environment.as_deref().or(Some(environment.as_str())),
    )?;

    let publish_choices = vec!["false".to_string(), "true".to_string()];
    let publish = prompt_choice("* Do you wish to publish the duplicated entries?", &publish_choices, None)? == "true";

    let prefix = prompt_optional("Enter a prefix (leave blank if not desired)")?;
    let suffix = prompt_optional("Enter a suffix (leave blank if not desired)")?;
    let regex_pattern = prompt_optional("Enter a regex pattern you wish to replace (leave blank if not desired)")?;
    let replace_str = prompt_optional(
        "Enter a value you wish to use in place of your regex pattern (leave blank if not desired)",
    )?;

    let answers = DuplicateCommands {
        space_id: Some(space_id),
        entries,
        exclude,
        environment: Some(environment),
        target_environment: Some(target_environment),
        token: Some(token),
        publish,
        prefix,
        suffix,
        regex_pattern,
        replace_str,
        show_mapping: args.show_mapping,
        ..Default::default()
    };

    let request = JobRequest::resolve(&answers, config)?;
    let confirmed = if request.targets_protected_environment() {
        prompt_protected_confirmation(&request.settings.target_environment)?
    } else {
        prompt_confirmation(
            &format!(
                "Duplicate [{}] from '{}' to '{}'?",
                request.job.entry_ids.join(", "),
                request.settings.environment,
                request.settings.target_environment
            ),
            true,
        )?
    };
    if !confirmed {
        println!("{}", "Aborted, nothing was duplicated.".yellow());
        return Ok(());
    }

    run_request(request, args.show_mapping, config).await
}
