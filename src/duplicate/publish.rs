//! Decides whether a freshly created duplicate may be published

use super::links;
use crate::api::{ContentStore, ContentType, Entry};
use log::debug;
use std::collections::HashMap;

/// Why a duplicate was left as a draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftReason {
    NotRequested,
    ProtectedEnvironment,
    OriginalNotPublished,
    UnknownContentType(String),
    /// A required asset field is empty
    EmptyRequiredAsset { field: String },
    /// A required asset field references an asset the target does not have
    MissingAsset { field: String, asset_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishDecision {
    Publish,
    Draft(DraftReason),
}

/// True when `environment` matches one of the protected environment names
pub fn is_protected_environment(environment: &str, protected: &[String]) -> bool {
    protected
        .iter()
        .any(|name| !name.is_empty() && environment.contains(name.as_str()))
}

/// Publishing rules for one job
pub struct PublishGate<'a> {
    requested: bool,
    target_protected: bool,
    target_types: &'a HashMap<String, ContentType>,
}

impl<'a> PublishGate<'a> {
    pub fn new(requested: bool, target_protected: bool, target_types: &'a HashMap<String, ContentType>) -> Self {
        Self {
            requested,
            target_protected,
            target_types,
        }
    }

    /// Publish only if requested, the target is not protected, the original is
    /// published and every required asset it references exists in the target.
    pub async fn decide(&self, original: &Entry, target: &dyn ContentStore) -> PublishDecision {
        if !self.requested {
            return PublishDecision::Draft(DraftReason::NotRequested);
        }
        if self.target_protected {
            return PublishDecision::Draft(DraftReason::ProtectedEnvironment);
        }
        if !original.is_published() {
            return PublishDecision::Draft(DraftReason::OriginalNotPublished);
        }

        let type_id = original.content_type_id().unwrap_or_default();
        let Some(content_type) = self.target_types.get(type_id) else {
            return PublishDecision::Draft(DraftReason::UnknownContentType(type_id.to_string()));
        };

        for field in content_type.required_asset_fields() {
            let asset_ids: Vec<String> = original
                .fields
                .get(&field.id)
                .map(|locales| {
                    locales
                        .iter()
                        .flat_map(|(locale, value)| links::links_in_value(&field.id, locale, value))
                        .filter(|slot| slot.link.is_asset())
                        .map(|slot| slot.link.sys.id)
                        .collect()
                })
                .unwrap_or_default();

            if asset_ids.is_empty() {
                return PublishDecision::Draft(DraftReason::EmptyRequiredAsset {
                    field: field.id.clone(),
                });
            }

            for asset_id in asset_ids {
                if let Err(err) = target.get_asset(&asset_id).await {
                    debug!("Asset {} unavailable in target: {}", asset_id, err);
                    return PublishDecision::Draft(DraftReason::MissingAsset {
                        field: field.id.clone(),
                        asset_id,
                    });
                }
            }
        }

        PublishDecision::Publish
    }
}
