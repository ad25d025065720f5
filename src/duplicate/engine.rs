//! Recursive duplication of an entry and everything it links to

use super::job::DuplicationJob;
use super::links::{self, FieldPath, LinkSlot};
use super::patch;
use super::publish::{DraftReason, PublishDecision, PublishGate, is_protected_environment};
use super::report::{JobWarning, RootOutcome, RootStatus};
use super::session::DuplicationSession;
use crate::api::models::Fields;
use crate::api::{ContentStore, ContentType, Entry};
use crate::error::{DuplicateError, DuplicateResult, StoreError};
use futures::future::{BoxFuture, FutureExt};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashMap;

/// The entry that linked to the one being duplicated, and where
#[derive(Debug, Clone)]
pub struct Referrer {
    pub parent_id: String,
    pub path: FieldPath,
}

/// Duplicates entries from `source` into `target` under the rules of one job
pub struct Duplicator<'a> {
    job: &'a DuplicationJob,
    source: &'a dyn ContentStore,
    target: &'a dyn ContentStore,
    target_types: HashMap<String, ContentType>,
    target_protected: bool,
}

impl<'a> Duplicator<'a> {
    /// `target_types` are the content types of the target environment
    pub fn new(
        job: &'a DuplicationJob,
        source: &'a dyn ContentStore,
        target: &'a dyn ContentStore,
        target_types: Vec<ContentType>,
    ) -> Self {
        let target_protected = is_protected_environment(target.environment_name(), &job.protected_environments);
        let target_types = target_types
            .into_iter()
            .map(|content_type| (content_type.id().to_string(), content_type))
            .collect();

        Self {
            job,
            source,
            target,
            target_types,
            target_protected,
        }
    }

    /// Duplicate one job root and its whole subtree, then run the deferred
    /// patch pass for the references that subtree left behind.
    pub async fn duplicate_root(
        &self,
        session: &mut DuplicationSession,
        root_id: &str,
    ) -> DuplicateResult<RootOutcome> {
        if self.job.is_excluded(root_id) {
            info!("Skipping excluded root entry {}", root_id);
            return Ok(RootOutcome {
                original_id: root_id.to_string(),
                duplicate_id: None,
                name: None,
                published: false,
                status: RootStatus::Excluded,
            });
        }

        if session.is_visited(root_id) {
            info!("Entry {} was already duplicated earlier in this job", root_id);
            return Ok(self.already_duplicated(session, root_id));
        }

        let duplicate = self.duplicate(session, root_id, None).await?;
        let summary = patch::run_patch_pass(session, self.target).await?;
        debug!(
            "Patch pass after root {}: {} patched, {} pending",
            root_id, summary.patched, summary.pending
        );

        Ok(match duplicate {
            Some(entry) => RootOutcome {
                original_id: root_id.to_string(),
                duplicate_id: Some(entry.id().to_string()),
                name: entry.display_name(&self.job.name_fields),
                published: entry.is_published(),
                status: RootStatus::Duplicated,
            },
            None => self.already_duplicated(session, root_id),
        })
    }

    fn already_duplicated(&self, session: &DuplicationSession, root_id: &str) -> RootOutcome {
        RootOutcome {
            original_id: root_id.to_string(),
            duplicate_id: session.duplicate_of(root_id).map(str::to_string),
            name: session.name_of(root_id).map(|name| self.job.naming.apply(name)),
            published: false,
            status: RootStatus::AlreadyDuplicated,
        }
    }

    /// Duplicate `entry_id`, recursing into the entries it links to.
    ///
    /// Returns `None` when the entry is excluded or was already visited in this
    /// job. In the latter case a loop reference is recorded against `referrer`
    /// so the link can be patched once both duplicates exist.
    pub fn duplicate<'s>(
        &'s self,
        session: &'s mut DuplicationSession,
        entry_id: &'s str,
        referrer: Option<&'s Referrer>,
    ) -> BoxFuture<'s, DuplicateResult<Option<Entry>>> {
        async move {
            if self.job.is_excluded(entry_id) {
                debug!("Entry {} is excluded, keeping original link", entry_id);
                return Ok(None);
            }

            if !session.mark_visited(entry_id) {
                if let Some(referrer) = referrer {
                    self.record_loop(session, referrer, entry_id);
                }
                return Ok(None);
            }

            let original = self
                .source
                .get_entry(entry_id)
                .await
                .map_err(|source| DuplicateError::Fetch {
                    id: entry_id.to_string(),
                    source,
                })?;
            session.remember_name(entry_id, original.display_name(&self.job.name_fields));

            let content_type_id = original
                .content_type_id()
                .ok_or_else(|| DuplicateError::Create {
                    id: entry_id.to_string(),
                    content_type: String::new(),
                    source: StoreError::InvalidRequest("entry has no content type".to_string()),
                })?
                .to_string();

            let mut fields = original.fields.clone();
            self.rename_fields(&mut fields);

            if !self.job.single_level {
                let children: Vec<LinkSlot> = links::entry_links(&original.fields)
                    .into_iter()
                    .filter(|slot| !self.job.is_name_field(&slot.path.field))
                    .collect();

                // one child at a time: later siblings depend on the visited set
                for slot in children {
                    let child_id = slot.link.sys.id.clone();
                    let referrer = Referrer {
                        parent_id: entry_id.to_string(),
                        path: slot.path.clone(),
                    };
                    debug!("Duplicating sub entry #{} of #{}", child_id, entry_id);

                    if let Some(child) = self.duplicate(&mut *session, &child_id, Some(&referrer)).await? {
                        links::set_link_target(&mut fields, &slot.path, child.id());
                    }
                }
            }

            let created = self
                .target
                .create_entry(&content_type_id, &fields)
                .await
                .map_err(|source| DuplicateError::Create {
                    id: entry_id.to_string(),
                    content_type: content_type_id.clone(),
                    source,
                })?;
            session.record_duplicate(entry_id, created.id());
            info!("Created {} as duplicate of {} ({})", created.id(), entry_id, content_type_id);

            let duplicate = self.publish_if_allowed(session, &original, created).await;
            Ok(Some(duplicate))
        }
        .boxed()
    }

    fn record_loop(&self, session: &mut DuplicationSession, referrer: &Referrer, child_id: &str) {
        session.record_loop_reference(&referrer.parent_id, child_id, referrer.path.clone());

        let warning = JobWarning::LoopReference {
            parent_id: referrer.parent_id.clone(),
            parent_name: session.name_of(&referrer.parent_id).map(str::to_string),
            child_id: child_id.to_string(),
            child_name: session.name_of(child_id).map(str::to_string),
        };
        session.warn(warning);
    }

    /// Apply the naming rule to every string value of every name field
    fn rename_fields(&self, fields: &mut Fields) {
        for (field, locales) in fields.iter_mut() {
            if !self.job.is_name_field(field) {
                continue;
            }
            for (locale, value) in locales.iter_mut() {
                match value {
                    Value::String(name) => *name = self.job.naming.apply(name),
                    other => debug!("Name field {}.{} is not text ({}), leaving as is", field, locale, other),
                }
            }
        }
    }

    async fn publish_if_allowed(
        &self,
        session: &mut DuplicationSession,
        original: &Entry,
        created: Entry,
    ) -> Entry {
        let gate = PublishGate::new(self.job.publish, self.target_protected, &self.target_types);

        match gate.decide(original, self.target).await {
            PublishDecision::Publish => match self.target.publish_entry(&created).await {
                Ok(published) => {
                    session.record_published();
                    published
                }
                Err(err) => {
                    session.warn(JobWarning::PublishFailed {
                        entry_id: original.id().to_string(),
                        duplicate_id: created.id().to_string(),
                        message: err.to_string(),
                    });
                    session.record_draft();
                    created
                }
            },
            PublishDecision::Draft(reason) => {
                match reason {
                    DraftReason::MissingAsset { field, asset_id } => {
                        session.warn(JobWarning::MissingRequiredAsset {
                            entry_id: original.id().to_string(),
                            duplicate_id: created.id().to_string(),
                            field,
                            asset_id: Some(asset_id),
                        });
                    }
                    DraftReason::EmptyRequiredAsset { field } => {
                        session.warn(JobWarning::MissingRequiredAsset {
                            entry_id: original.id().to_string(),
                            duplicate_id: created.id().to_string(),
                            field,
                            asset_id: None,
                        });
                    }
                    DraftReason::UnknownContentType(content_type) => {
                        warn!("Content type '{}' not found in target, {} stays draft", content_type, created.id());
                    }
                    other => debug!("{} stays draft: {:?}", created.id(), other),
                }
                session.record_draft();
                created
            }
        }
    }
}
