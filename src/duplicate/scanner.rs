//! Read-only walk of the reference graph to check the target schema up front

use super::job::DuplicationJob;
use super::links;
use crate::api::{ContentStore, ContentType};
use crate::error::{DuplicateError, DuplicateResult};
use log::{debug, info};
use std::collections::{BTreeSet, HashSet};

/// Content type ids reachable from the job's roots through entry links.
///
/// Follows the same links the duplication does: excluded ids are neither
/// fetched nor descended into, and links held in name fields are not
/// followed. Every entry is fetched at most once.
pub async fn collect_content_types(
    source: &dyn ContentStore,
    job: &DuplicationJob,
) -> DuplicateResult<BTreeSet<String>> {
    let mut content_types = BTreeSet::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<String> = job.entry_ids.iter().rev().cloned().collect();

    while let Some(entry_id) = stack.pop() {
        if job.is_excluded(&entry_id) || !seen.insert(entry_id.clone()) {
            continue;
        }

        let entry = source
            .get_entry(&entry_id)
            .await
            .map_err(|source| DuplicateError::Fetch {
                id: entry_id.clone(),
                source,
            })?;

        if let Some(content_type) = entry.content_type_id() {
            content_types.insert(content_type.to_string());
        }

        let children = links::entry_links(&entry.fields)
            .into_iter()
            .filter(|slot| !job.is_name_field(&slot.path.field));
        // reversed so the first link is visited first
        for slot in children.rev() {
            let child = slot.link.sys.id;
            if !job.is_excluded(&child) && !seen.contains(&child) {
                stack.push(child);
            }
        }
    }

    debug!("Scanned {} entries, found {} content types", seen.len(), content_types.len());
    Ok(content_types)
}

/// Required ids with no matching content type in `available`, sorted
pub fn missing_content_types(required: &BTreeSet<String>, available: &[ContentType]) -> Vec<String> {
    let available: HashSet<&str> = available.iter().map(ContentType::id).collect();
    required
        .iter()
        .filter(|id| !available.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Fail with [`DuplicateError::MissingContentTypes`] unless the target has every
/// content type the job will create. Returns the target's content types.
pub async fn verify_target_schema(
    source: &dyn ContentStore,
    target: &dyn ContentStore,
    job: &DuplicationJob,
) -> DuplicateResult<Vec<ContentType>> {
    let required = collect_content_types(source, job).await?;

    let available = target
        .get_content_types()
        .await
        .map_err(|source| DuplicateError::ContentTypes {
            environment: target.environment_name().to_string(),
            source,
        })?;

    let missing = missing_content_types(&required, &available);
    if !missing.is_empty() {
        return Err(DuplicateError::MissingContentTypes(missing));
    }

    info!(
        "Target environment '{}' has all {} required content types",
        target.environment_name(),
        required.len()
    );
    Ok(available)
}
