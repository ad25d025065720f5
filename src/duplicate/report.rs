//! Outcome of a duplication job and the non-fatal conditions it met

use super::session::LoopReference;
use std::fmt;

/// Non-fatal conditions surfaced to the user once the job finishes
#[derive(Debug, Clone, PartialEq)]
pub enum JobWarning {
    /// Publishing was requested but the target is protected; everything stays draft
    ProtectedEnvironment { environment: String },
    /// An entry was reached a second time; the link is patched after the root completes
    LoopReference {
        parent_id: String,
        parent_name: Option<String>,
        child_id: String,
        child_name: Option<String>,
    },
    /// A required asset is absent from the target, so the duplicate stays draft
    MissingRequiredAsset {
        entry_id: String,
        duplicate_id: String,
        field: String,
        asset_id: Option<String>,
    },
    /// The target rejected the publish call; the duplicate stays draft
    PublishFailed {
        entry_id: String,
        duplicate_id: String,
        message: String,
    },
    /// A deferred link rewrite never happened; the duplicate still points at the original
    UnresolvedLoopReference {
        parent_id: String,
        child_id: String,
        path: String,
    },
}

fn labelled(id: &str, name: &Option<String>) -> String {
    match name {
        Some(name) => format!("[{} - ID #{}]", name, id),
        None => format!("[ID #{}]", id),
    }
}

impl fmt::Display for JobWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobWarning::ProtectedEnvironment { environment } => write!(
                f,
                "For protection of the [{}] environment, publishing is not allowed. Content is still created but is saved as [Draft].",
                environment
            ),
            JobWarning::LoopReference { parent_id, parent_name, child_id, child_name } => write!(
                f,
                "Content loop found between entry {} and entry {}.",
                labelled(parent_id, parent_name),
                labelled(child_id, child_name)
            ),
            JobWarning::MissingRequiredAsset { entry_id, duplicate_id, field, asset_id } => match asset_id {
                Some(asset_id) => write!(
                    f,
                    "Duplicate #{} of entry #{} saved as [Draft]: required asset #{} in field '{}' does not exist in the target environment.",
                    duplicate_id, entry_id, asset_id, field
                ),
                None => write!(
                    f,
                    "Duplicate #{} of entry #{} saved as [Draft]: required asset field '{}' is empty.",
                    duplicate_id, entry_id, field
                ),
            },
            JobWarning::PublishFailed { entry_id, duplicate_id, message } => write!(
                f,
                "Unable to publish duplicate #{} of entry #{}. This is likely due to some validation error on the content: {}",
                duplicate_id, entry_id, message
            ),
            JobWarning::UnresolvedLoopReference { parent_id, child_id, path } => write!(
                f,
                "Reference from entry #{} to entry #{} at '{}' still points at the original entry.",
                parent_id, child_id, path
            ),
        }
    }
}

/// How a root entry of the job was handled
#[derive(Debug, Clone, PartialEq)]
pub enum RootStatus {
    Duplicated,
    /// Reached earlier in this job (as a child of a previous root, or listed twice)
    AlreadyDuplicated,
    Excluded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub original_id: String,
    pub duplicate_id: Option<String>,
    pub name: Option<String>,
    pub published: bool,
    pub status: RootStatus,
}

/// Counters kept while the job runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicationStats {
    pub created: usize,
    pub published: usize,
    pub drafts: usize,
    pub loop_references_patched: usize,
}

/// Everything a caller needs to present the result of a job
#[derive(Debug, Clone, Default)]
pub struct DuplicationReport {
    pub roots: Vec<RootOutcome>,
    pub stats: DuplicationStats,
    /// original id → duplicate id, in creation order
    pub id_map: Vec<(String, String)>,
    pub unresolved: Vec<LoopReference>,
    pub warnings: Vec<JobWarning>,
}

impl DuplicationReport {
    pub fn duplicate_of(&self, original_id: &str) -> Option<&str> {
        self.id_map
            .iter()
            .find(|(original, _)| original == original_id)
            .map(|(_, duplicate)| duplicate.as_str())
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.warnings.is_empty()
    }
}
