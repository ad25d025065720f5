//! In-memory content store used by the engine tests

#![allow(dead_code)]

use async_trait::async_trait;
use contentful_duplicate::api::{Asset, ContentStore, ContentType, Entry, Fields};
use contentful_duplicate::StoreError;
use contentful_duplicate::StoreResult;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    entries: BTreeMap<String, Entry>,
    assets: HashSet<String>,
    content_types: Vec<ContentType>,
    next_id: usize,
    created: Vec<String>,
    fetched: Vec<String>,
    updated: Vec<String>,
    published: Vec<String>,
    failing_publish: HashSet<String>,
    failing_create: HashSet<String>,
}

/// One environment held in memory.
///
/// Versions behave like the CMA: every write bumps `sys.version`, publishing
/// records the version as `publishedVersion`, and updates with a stale
/// version are rejected.
pub struct MemoryStore {
    name: String,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_content_types(self, ids: &[&str]) -> Self {
        self.state()
            .content_types
            .extend(ids.iter().map(|id| content_type(id, json!([]))));
        self
    }

    pub fn with_content_type(self, content_type: ContentType) -> Self {
        self.state().content_types.push(content_type);
        self
    }

    pub fn with_entry(self, entry: Entry) -> Self {
        self.state().entries.insert(entry.sys.id.clone(), entry);
        self
    }

    pub fn with_asset(self, id: &str) -> Self {
        self.state().assets.insert(id.to_string());
        self
    }

    /// Publishing entries of this content type fails with a validation error
    pub fn failing_publish_for(self, content_type_id: &str) -> Self {
        self.state().failing_publish.insert(content_type_id.to_string());
        self
    }

    /// Creating entries of this content type fails with a validation error,
    /// although the content type is still listed
    pub fn failing_create_for(self, content_type_id: &str) -> Self {
        self.state().failing_create.insert(content_type_id.to_string());
        self
    }

    pub fn entry(&self, id: &str) -> Entry {
        self.state()
            .entries
            .get(id)
            .cloned()
            .unwrap_or_else(|| panic!("no entry {}", id))
    }

    pub fn created(&self) -> Vec<String> {
        self.state().created.clone()
    }

    pub fn fetches_of(&self, id: &str) -> usize {
        self.state().fetched.iter().filter(|fetched| fetched.as_str() == id).count()
    }

    pub fn updated(&self) -> Vec<String> {
        self.state().updated.clone()
    }

    pub fn published(&self) -> Vec<String> {
        self.state().published.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn environment_name(&self) -> &str {
        &self.name
    }

    async fn get_entry(&self, id: &str) -> StoreResult<Entry> {
        let mut state = self.state();
        state.fetched.push(id.to_string());
        state
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Entry", id))
    }

    async fn get_asset(&self, id: &str) -> StoreResult<Asset> {
        if self.state().assets.contains(id) {
            Ok(serde_json::from_value(json!({"sys": {"id": id}, "fields": {}}))?)
        } else {
            Err(StoreError::not_found("Asset", id))
        }
    }

    async fn get_content_types(&self) -> StoreResult<Vec<ContentType>> {
        Ok(self.state().content_types.clone())
    }

    async fn create_entry(&self, content_type_id: &str, fields: &Fields) -> StoreResult<Entry> {
        let mut state = self.state();
        if !state.content_types.iter().any(|ct| ct.id() == content_type_id) {
            return Err(StoreError::Validation(format!("unknown content type {}", content_type_id)));
        }
        if state.failing_create.contains(content_type_id) {
            return Err(StoreError::Validation(format!("{} entry failed validation", content_type_id)));
        }

        state.next_id += 1;
        let id = format!("{}-{}", self.name, state.next_id);
        let mut entry = entry(&id, content_type_id, false, json!({}));
        entry.fields = fields.clone();

        state.created.push(id.clone());
        state.entries.insert(id, entry.clone());
        Ok(entry)
    }

    async fn publish_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        let mut state = self.state();
        let content_type = entry.content_type_id().unwrap_or_default().to_string();
        if state.failing_publish.contains(&content_type) {
            return Err(StoreError::Validation(format!("{} failed validation", entry.id())));
        }

        let stored = state
            .entries
            .get_mut(entry.id())
            .ok_or_else(|| StoreError::not_found("Entry", entry.id()))?;
        if stored.sys.version != entry.sys.version {
            return Err(StoreError::VersionMismatch(entry.id().to_string()));
        }

        stored.sys.published_version = stored.sys.version;
        stored.sys.version = stored.sys.version.map(|v| v + 1);
        let published = stored.clone();
        state.published.push(entry.id().to_string());
        Ok(published)
    }

    async fn update_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        let mut state = self.state();
        let stored = state
            .entries
            .get_mut(entry.id())
            .ok_or_else(|| StoreError::not_found("Entry", entry.id()))?;
        if stored.sys.version != entry.sys.version {
            return Err(StoreError::VersionMismatch(entry.id().to_string()));
        }

        stored.fields = entry.fields.clone();
        stored.sys.version = stored.sys.version.map(|v| v + 1);
        let updated = stored.clone();
        state.updated.push(entry.id().to_string());
        Ok(updated)
    }
}

/// Entry with the given localized fields, e.g. `{"title": {"en-US": "Home"}}`
pub fn entry(id: &str, content_type: &str, published: bool, fields: Value) -> Entry {
    let mut sys = json!({
        "id": id,
        "type": "Entry",
        "version": if published { 2 } else { 1 },
        "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": content_type}}
    });
    if published {
        sys["publishedVersion"] = json!(1);
    }
    serde_json::from_value(json!({"sys": sys, "fields": fields})).unwrap()
}

pub fn content_type(id: &str, fields: Value) -> ContentType {
    serde_json::from_value(json!({"sys": {"id": id}, "name": id, "fields": fields})).unwrap()
}

pub fn entry_link(id: &str) -> Value {
    json!({"sys": {"type": "Link", "linkType": "Entry", "id": id}})
}

pub fn asset_link(id: &str) -> Value {
    json!({"sys": {"type": "Link", "linkType": "Asset", "id": id}})
}

/// Id of the entry linked from `field` in the en-US locale
pub fn linked_id(entry: &Entry, field: &str) -> String {
    entry.fields[field]["en-US"]["sys"]["id"].as_str().unwrap().to_string()
}

pub fn linked_ids(entry: &Entry, field: &str) -> Vec<String> {
    entry.fields[field]["en-US"]
        .as_array()
        .unwrap()
        .iter()
        .map(|link| link["sys"]["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn text(entry: &Entry, field: &str) -> String {
    entry.fields[field]["en-US"].as_str().unwrap().to_string()
}
