//! Traversal state shared by every root of one duplication job

use super::links::FieldPath;
use super::report::{DuplicationStats, JobWarning};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Original id → duplicate id. Append-only: a mapping is never replaced.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl IdMap {
    /// Returns false (and keeps the existing mapping) if `original_id` is already mapped
    pub fn insert(&mut self, original_id: &str, duplicate_id: &str) -> bool {
        if self.entries.contains_key(original_id) {
            return false;
        }
        self.entries.insert(original_id.to_string(), duplicate_id.to_string());
        self.order.push(original_id.to_string());
        true
    }

    pub fn get(&self, original_id: &str) -> Option<&str> {
        self.entries.get(original_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pairs in creation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order.iter().filter_map(|original| {
            self.entries
                .get(original)
                .map(|duplicate| (original.as_str(), duplicate.as_str()))
        })
    }
}

/// A link whose rewrite was deferred because its target had already been visited
#[derive(Debug, Clone, PartialEq)]
pub struct LoopReference {
    pub parent_id: String,
    pub child_id: String,
    /// Where in the parent the link lives
    pub path: FieldPath,
    pub completed: bool,
}

/// Per-job state: visited set, id map, loop references and diagnostics.
///
/// Constructed once per job and threaded through every call, so separate
/// jobs never share traversal state.
#[derive(Debug, Default)]
pub struct DuplicationSession {
    visited: HashSet<String>,
    id_map: IdMap,
    loop_references: Vec<LoopReference>,
    names: HashMap<String, String>,
    warnings: Vec<JobWarning>,
    stats: DuplicationStats,
}

impl DuplicationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the visited set. False if the id was already there.
    pub fn mark_visited(&mut self, entry_id: &str) -> bool {
        self.visited.insert(entry_id.to_string())
    }

    pub fn is_visited(&self, entry_id: &str) -> bool {
        self.visited.contains(entry_id)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn id_map(&self) -> &IdMap {
        &self.id_map
    }

    pub fn record_duplicate(&mut self, original_id: &str, duplicate_id: &str) {
        if !self.id_map.insert(original_id, duplicate_id) {
            warn!("Entry {} already has a duplicate, ignoring {}", original_id, duplicate_id);
        }
        self.stats.created += 1;
    }

    pub fn duplicate_of(&self, original_id: &str) -> Option<&str> {
        self.id_map.get(original_id)
    }

    pub fn remember_name(&mut self, entry_id: &str, name: Option<String>) {
        if let Some(name) = name {
            self.names.insert(entry_id.to_string(), name);
        }
    }

    pub fn name_of(&self, entry_id: &str) -> Option<&str> {
        self.names.get(entry_id).map(String::as_str)
    }

    pub fn record_loop_reference(&mut self, parent_id: &str, child_id: &str, path: FieldPath) {
        self.loop_references.push(LoopReference {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
            path,
            completed: false,
        });
    }

    pub fn loop_references(&self) -> &[LoopReference] {
        &self.loop_references
    }

    /// Indexes of loop references not yet patched
    pub fn pending_loop_references(&self) -> Vec<usize> {
        self.loop_references
            .iter()
            .enumerate()
            .filter(|(_, reference)| !reference.completed)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn loop_reference(&self, index: usize) -> Option<&LoopReference> {
        self.loop_references.get(index)
    }

    pub fn complete_loop_reference(&mut self, index: usize) {
        if let Some(reference) = self.loop_references.get_mut(index) {
            if !reference.completed {
                reference.completed = true;
                self.stats.loop_references_patched += 1;
            }
        }
    }

    pub fn warn(&mut self, warning: JobWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[JobWarning] {
        &self.warnings
    }

    pub fn stats(&self) -> &DuplicationStats {
        &self.stats
    }

    pub fn record_published(&mut self) {
        self.stats.published += 1;
    }

    pub fn record_draft(&mut self) {
        self.stats.drafts += 1;
    }

    pub(crate) fn into_parts(self) -> (IdMap, Vec<LoopReference>, Vec<JobWarning>, DuplicationStats) {
        (self.id_map, self.loop_references, self.warnings, self.stats)
    }
}
