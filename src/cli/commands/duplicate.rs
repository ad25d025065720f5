//! `duplicate`: run a job from command-line flags

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use is_terminal::IsTerminal;
use log::info;
use uuid::Uuid;

use crate::cli::ui::output::print_report;
use crate::cli::ui::prompts::prompt_protected_confirmation;
use crate::cli::ui::with_spinner;
use contentful_duplicate::api::{ClientManager, ConnectionSettings};
use contentful_duplicate::config::{Config, SPACE_ID_ENV, TARGET_TOKEN_ENV, TOKEN_ENV, env_value};
use contentful_duplicate::duplicate::publish::is_protected_environment;
use contentful_duplicate::duplicate::{DuplicationJob, NamingRule, run_job};

#[derive(Args, Debug, Clone, Default)]
pub struct DuplicateCommands {
    /// Contentful space id (falls back to the config file, then CONTENTFUL_SPACE_ID)
    #[arg(short, long)]
    pub space_id: Option<String>,

    /// Entry ids to duplicate, comma separated
    #[arg(short, long)]
    pub entries: String,

    /// Entry ids to leave untouched, comma separated
    #[arg(short = 'x', long, default_value = "")]
    pub exclude: String,

    /// Source environment [default: from config, else "develop"]
    #[arg(long)]
    pub environment: Option<String>,

    /// Target environment [default: from config, else the source environment]
    #[arg(short, long)]
    pub target_environment: Option<String>,

    /// Duplicate into another space
    #[arg(long)]
    pub target_space_id: Option<String>,

    /// Management token (falls back to CONTENTFUL_MANAGEMENT_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Management token for the target space (falls back to CONTENTFUL_TARGET_MANAGEMENT_TOKEN)
    #[arg(long)]
    pub target_token: Option<String>,

    /// Publish duplicates whose originals are published
    #[arg(short, long)]
    pub publish: bool,

    /// Only duplicate the listed entries; their references keep pointing at the originals
    #[arg(long)]
    pub single_level: bool,

    /// Text prepended to every duplicated name
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Text appended to every duplicated name
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Regex whose first match in each name is replaced (needs --replace-str)
    #[arg(long, default_value = "")]
    pub regex_pattern: String,

    /// Replacement for --regex-pattern
    #[arg(long, default_value = "")]
    pub replace_str: String,

    /// Field treated as an entry name; repeat to set several, in priority order
    #[arg(long = "name-field")]
    pub name_fields: Vec<String>,

    /// Skip the protected environment confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print every original → duplicate id pair once the job finishes
    #[arg(long)]
    pub show_mapping: bool,
}

/// Everything needed to start a job, resolved from flags, config and environment
#[derive(Debug)]
pub struct JobRequest {
    pub settings: ConnectionSettings,
    pub job: DuplicationJob,
}

/// Split a comma separated id list, trimming items and dropping empty ones
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.trim().is_empty())
}

impl JobRequest {
    pub fn resolve(args: &DuplicateCommands, config: &Config) -> Result<Self> {
        let entry_ids = parse_id_list(&args.entries);
        if entry_ids.is_empty() {
            bail!("No entry ids given. Pass them with --entries id1,id2");
        }

        let space_id = non_empty(&args.space_id)
            .or_else(|| non_empty(&config.space_id))
            .or_else(|| env_value(SPACE_ID_ENV))
            .with_context(|| {
                format!("No space id. Pass --space-id, set space_id in the config file or export {}", SPACE_ID_ENV)
            })?;

        let access_token = non_empty(&args.token)
            .or_else(|| env_value(TOKEN_ENV))
            .with_context(|| format!("No management token. Pass --token or export {}", TOKEN_ENV))?;

        let environment = non_empty(&args.environment).unwrap_or_else(|| config.environment.clone());
        let target_environment = non_empty(&args.target_environment)
            .or_else(|| non_empty(&config.target_environment))
            .unwrap_or_else(|| environment.clone());

        let naming = NamingRule::new(args.prefix.as_str(), args.suffix.as_str())
            .with_replacement(&args.regex_pattern, &args.replace_str)
            .with_context(|| format!("Invalid regex pattern '{}'", args.regex_pattern))?;

        let name_fields = if args.name_fields.is_empty() {
            config.name_fields.clone()
        } else {
            args.name_fields.clone()
        };

        let job = DuplicationJob::new(entry_ids)
            .exclude(parse_id_list(&args.exclude))
            .single_level(args.single_level)
            .publish(args.publish)
            .naming(naming)
            .name_fields(name_fields)
            .protected_environments(config.protected_environments.clone());

        let settings = ConnectionSettings {
            base_url: config.api.base_url.clone(),
            space_id,
            access_token,
            environment,
            target_environment,
            target_space_id: non_empty(&args.target_space_id),
            target_access_token: non_empty(&args.target_token).or_else(|| env_value(TARGET_TOKEN_ENV)),
        };

        Ok(Self { settings, job })
    }

    pub fn targets_protected_environment(&self) -> bool {
        is_protected_environment(&self.settings.target_environment, &self.job.protected_environments)
    }
}

pub async fn handle_duplicate_command(args: DuplicateCommands, config: &Config) -> Result<()> {
    let request = JobRequest::resolve(&args, config)?;

    if request.targets_protected_environment() && !args.yes {
        if !std::io::stdin().is_terminal() {
            bail!(
                "Target environment '{}' is protected. Re-run with --yes to confirm",
                request.settings.target_environment
            );
        }
        if !prompt_protected_confirmation(&request.settings.target_environment)? {
            println!("{}", "Aborted, nothing was duplicated.".yellow());
            return Ok(());
        }
    }

    run_request(request, args.show_mapping, config).await
}

/// Connect, run the job and print its report
pub async fn run_request(request: JobRequest, show_mapping: bool, config: &Config) -> Result<()> {
    let job_id = Uuid::new_v4();
    info!(
        "Job {}: space '{}', {} -> {}",
        job_id, request.settings.space_id, request.settings.environment, request.settings.target_environment
    );

    let manager = with_spinner(
        "Connecting to Contentful...",
        ClientManager::connect(&request.settings, config.resilience()),
    )
    .await?;

    println!(
        "{} Start duplicating entries [{}]",
        "ℹ".blue(),
        request.job.entry_ids.join(", ")
    );

    let report = with_spinner(
        "Duplicating entries...",
        run_job(&request.job, manager.source(), manager.target()),
    )
    .await
    .with_context(|| format!("Job {} failed", job_id))?;

    print_report(&report, show_mapping);
    info!("Job {} finished with {} warning(s)", job_id, report.warnings.len());

    Ok(())
}
