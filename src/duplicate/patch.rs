//! Deferred rewrite of links that were left pointing at originals

use super::links;
use super::report::JobWarning;
use super::session::DuplicationSession;
use crate::api::ContentStore;
use crate::error::{DuplicateError, DuplicateResult};
use log::{debug, info, warn};

/// Result of one patch pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatchSummary {
    pub patched: usize,
    pub pending: usize,
}

/// Rewrite every pending loop reference whose parent and child both have duplicates.
///
/// Each reference is handled with its own fetch and update of the parent
/// duplicate. References that cannot be resolved yet stay pending. Running the
/// pass again is harmless: completed references are skipped.
pub async fn run_patch_pass(
    session: &mut DuplicationSession,
    target: &dyn ContentStore,
) -> DuplicateResult<PatchSummary> {
    let mut summary = PatchSummary::default();

    for index in session.pending_loop_references() {
        let Some(reference) = session.loop_reference(index).cloned() else {
            continue;
        };

        let Some(parent_duplicate) = session.duplicate_of(&reference.parent_id).map(str::to_string) else {
            debug!("Parent {} has no duplicate yet, leaving reference pending", reference.parent_id);
            summary.pending += 1;
            continue;
        };
        let Some(child_duplicate) = session.duplicate_of(&reference.child_id).map(str::to_string) else {
            debug!("Child {} has no duplicate yet, leaving reference pending", reference.child_id);
            summary.pending += 1;
            continue;
        };

        let mut entry = target
            .get_entry(&parent_duplicate)
            .await
            .map_err(|source| DuplicateError::Fetch {
                id: parent_duplicate.clone(),
                source,
            })?;

        match links::link_at(&entry.fields, &reference.path) {
            Some(link) if link.sys.id == child_duplicate => {
                session.complete_loop_reference(index);
                summary.patched += 1;
                continue;
            }
            Some(link) if link.sys.id == reference.child_id => {}
            found => {
                warn!(
                    "Duplicate {} no longer links to {} at {} (found {:?}), leaving it untouched",
                    parent_duplicate,
                    reference.child_id,
                    reference.path,
                    found.map(|link| link.sys.id)
                );
                summary.pending += 1;
                continue;
            }
        }

        links::set_link_target(&mut entry.fields, &reference.path, &child_duplicate);
        let was_published = entry.is_published();

        let updated = target
            .update_entry(&entry)
            .await
            .map_err(|source| DuplicateError::Patch {
                id: parent_duplicate.clone(),
                source,
            })?;

        if was_published {
            // the live version must carry the rewritten link as well
            if let Err(err) = target.publish_entry(&updated).await {
                session.warn(JobWarning::PublishFailed {
                    entry_id: reference.parent_id.clone(),
                    duplicate_id: parent_duplicate.clone(),
                    message: err.to_string(),
                });
            }
        }

        info!(
            "Patched {} at {}: {} -> {}",
            parent_duplicate, reference.path, reference.child_id, child_duplicate
        );
        session.complete_loop_reference(index);
        summary.patched += 1;
    }

    Ok(summary)
}
