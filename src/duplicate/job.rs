//! Job configuration and the driver that runs a whole job

use super::engine::Duplicator;
use super::patch;
use super::publish::is_protected_environment;
use super::rename::NamingRule;
use super::report::{DuplicationReport, JobWarning};
use super::scanner;
use super::session::DuplicationSession;
use crate::api::ContentStore;
use crate::error::DuplicateResult;
use log::{info, warn};
use std::collections::HashSet;

/// Field ids treated as an entry's name when none are configured
pub const DEFAULT_NAME_FIELDS: &[&str] = &["name", "title", "entryTitle", "internalName"];

/// Environments that never receive published content by default
pub const DEFAULT_PROTECTED_ENVIRONMENTS: &[&str] = &["master"];

/// Parameters of one duplication run, fixed for its duration
#[derive(Debug, Clone)]
pub struct DuplicationJob {
    pub entry_ids: Vec<String>,
    pub exclude: HashSet<String>,
    /// Duplicate only the roots; their links keep pointing at the originals
    pub single_level: bool,
    pub publish: bool,
    pub naming: NamingRule,
    /// Candidate name fields, in priority order
    pub name_fields: Vec<String>,
    pub protected_environments: Vec<String>,
}

impl DuplicationJob {
    pub fn new<I, S>(entry_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entry_ids: entry_ids.into_iter().map(Into::into).collect(),
            exclude: HashSet::new(),
            single_level: false,
            publish: false,
            naming: NamingRule::default(),
            name_fields: DEFAULT_NAME_FIELDS.iter().map(|s| s.to_string()).collect(),
            protected_environments: DEFAULT_PROTECTED_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn single_level(mut self, single_level: bool) -> Self {
        self.single_level = single_level;
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn naming(mut self, naming: NamingRule) -> Self {
        self.naming = naming;
        self
    }

    pub fn name_fields(mut self, name_fields: Vec<String>) -> Self {
        self.name_fields = name_fields;
        self
    }

    pub fn protected_environments(mut self, environments: Vec<String>) -> Self {
        self.protected_environments = environments;
        self
    }

    pub fn is_excluded(&self, entry_id: &str) -> bool {
        self.exclude.contains(entry_id)
    }

    pub fn is_name_field(&self, field: &str) -> bool {
        self.name_fields.iter().any(|name| name == field)
    }
}

/// Run a complete job.
///
/// Validates the target schema before anything is created, then duplicates
/// the roots strictly one after another: each root's subtree and its patch
/// pass finish before the next root starts.
pub async fn run_job(
    job: &DuplicationJob,
    source: &dyn ContentStore,
    target: &dyn ContentStore,
) -> DuplicateResult<DuplicationReport> {
    info!(
        "Duplicating [{}] from '{}' to '{}'",
        job.entry_ids.join(", "),
        source.environment_name(),
        target.environment_name()
    );

    let mut session = DuplicationSession::new();
    if job.publish && is_protected_environment(target.environment_name(), &job.protected_environments) {
        session.warn(JobWarning::ProtectedEnvironment {
            environment: target.environment_name().to_string(),
        });
    }

    let target_types = scanner::verify_target_schema(source, target, job).await?;
    let duplicator = Duplicator::new(job, source, target, target_types);

    let mut roots = Vec::with_capacity(job.entry_ids.len());
    for root_id in &job.entry_ids {
        let outcome = duplicator.duplicate_root(&mut session, root_id).await?;
        roots.push(outcome);
    }

    // picks up anything a later root made resolvable
    patch::run_patch_pass(&mut session, target).await?;

    let (id_map, loop_references, mut warnings, stats) = session.into_parts();
    let unresolved: Vec<_> = loop_references.into_iter().filter(|r| !r.completed).collect();
    for reference in &unresolved {
        let warning = JobWarning::UnresolvedLoopReference {
            parent_id: reference.parent_id.clone(),
            child_id: reference.child_id.clone(),
            path: reference.path.to_string(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    info!(
        "Job finished: {} created, {} published, {} drafts, {} links patched",
        stats.created, stats.published, stats.drafts, stats.loop_references_patched
    );

    Ok(DuplicationReport {
        roots,
        stats,
        id_map: id_map
            .iter()
            .map(|(original, duplicate)| (original.to_string(), duplicate.to_string()))
            .collect(),
        unresolved,
        warnings,
    })
}
