//! FileMap Store
//!
//! Holds the virtual file system as a flat id-keyed map of records and exposes
//! the mutators that derive a new map from the current one. Records live
//! behind `Arc`, so every new map shares the untouched records with the map it
//! replaces; a published map is never mutated.

pub mod seed;

use crate::error::{SeedError, StoreError};
use crate::types::FileId;
use crate::views;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

pub use seed::{Seed, SeedIssue, SeedReport};

/// Descriptive attributes carried through the store untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_symlink: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draggable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droppable: Option<bool>,
    /// Keys the store does not know about, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// FileRecord: one file or folder in the virtual file system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FileId>,
    /// Child ids in display order; `Some` only for directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<FileId>>,
    /// Cached `children_ids.len()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_count: Option<usize>,
    #[serde(flatten)]
    pub attributes: FileAttributes,
}

impl FileRecord {
    /// Create an empty folder record
    pub fn folder(id: FileId, name: impl Into<String>, parent_id: Option<FileId>) -> Self {
        Self {
            id,
            name: name.into(),
            is_dir: true,
            parent_id,
            children_ids: Some(Vec::new()),
            children_count: Some(0),
            attributes: FileAttributes::default(),
        }
    }

    /// Create a plain file record
    pub fn file(id: FileId, name: impl Into<String>, parent_id: Option<FileId>) -> Self {
        Self {
            id,
            name: name.into(),
            is_dir: false,
            parent_id,
            children_ids: None,
            children_count: None,
            attributes: FileAttributes::default(),
        }
    }

    /// Child ids, empty for files and for folders without a child list
    pub fn children(&self) -> &[FileId] {
        self.children_ids.as_deref().unwrap_or(&[])
    }

    /// Copy of this record with a new child list and a matching cached count
    pub fn with_children(&self, children: Vec<FileId>) -> Self {
        Self {
            children_count: Some(children.len()),
            children_ids: Some(children),
            ..self.clone()
        }
    }

    /// Copy of this record re-parented under `parent_id`
    pub fn with_parent(&self, parent_id: FileId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..self.clone()
        }
    }
}

/// FileMap: id-keyed snapshot of the virtual file system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap {
    records: BTreeMap<FileId, Arc<FileRecord>>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from records, keyed by each record's own id
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), Arc::new(record)))
            .collect();
        Self { records }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<FileRecord>> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &Arc<FileRecord>)> {
        self.records.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &Arc<FileRecord>> {
        self.records.values()
    }

    pub(crate) fn insert(&mut self, record: FileRecord) {
        self.records.insert(record.id.clone(), Arc::new(record));
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Arc<FileRecord>> {
        self.records.remove(id)
    }

    /// Ids of every record below `id`, breadth first, `id` excluded
    pub fn descendants_of(&self, id: &str) -> Vec<FileId> {
        let mut found = Vec::new();
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<FileId> = self
            .get(id)
            .map(|record| record.children().iter().cloned().collect())
            .unwrap_or_default();
        while let Some(child_id) = queue.pop_front() {
            if child_id.as_str() == id || !seen.insert(child_id.clone()) {
                continue;
            }
            if let Some(child) = self.get(child_id.as_str()) {
                queue.extend(child.children().iter().cloned());
            }
            found.push(child_id);
        }
        found
    }
}

/// How `delete_files` treats the contents of a deleted folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink only the named records; their descendants stay in the map, orphaned
    #[default]
    Shallow,
    /// Remove the named records and everything below them
    Recursive,
}

fn default_folder_id_prefix() -> String {
    "new-folder-".to_string()
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub delete_mode: DeleteMode,

    /// Prefix for ids minted by `create_folder`
    #[serde(default = "default_folder_id_prefix")]
    pub folder_id_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            delete_mode: DeleteMode::default(),
            folder_id_prefix: default_folder_id_prefix(),
        }
    }
}

/// Result of a delete: what went, what was left dangling, what was never there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub removed: Vec<FileId>,
    /// Records whose parent was removed but which are still in the map
    pub orphaned: Vec<FileId>,
    pub missing: Vec<FileId>,
}

/// FileMapStore: the session-scoped owner of the current FileMap
pub struct FileMapStore {
    root_id: FileId,
    seed: Arc<FileMap>,
    current: Arc<FileMap>,
    config: StoreConfig,
    next_folder_id: u64,
}

impl FileMapStore {
    /// Create a store over `seed` with the default configuration
    pub fn new(seed: Seed) -> Result<Self, SeedError> {
        Self::with_config(seed, StoreConfig::default())
    }

    pub fn with_config(seed: Seed, config: StoreConfig) -> Result<Self, SeedError> {
        let (root_id, map) = seed.into_parts()?;
        let seed = Arc::new(map);
        Ok(Self {
            root_id,
            current: Arc::clone(&seed),
            seed,
            config,
            next_folder_id: 0,
        })
    }

    pub fn root_id(&self) -> &FileId {
        &self.root_id
    }

    /// The current map; holders keep a consistent snapshot across later mutations
    pub fn map(&self) -> Arc<FileMap> {
        Arc::clone(&self.current)
    }

    /// Owned copy of the current map, for by-value comparison
    pub fn snapshot(&self) -> FileMap {
        (*self.current).clone()
    }

    pub fn seed_map(&self) -> &FileMap {
        &self.seed
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn get(&self, id: &str) -> Option<Arc<FileRecord>> {
        self.current.get(id).cloned()
    }

    /// Discard every mutation and go back to the seed snapshot
    pub fn reset(&mut self) {
        self.current = Arc::clone(&self.seed);
        debug!(root = %self.root_id, "File map reset to seed");
    }

    /// Create an empty folder named `name` inside `parent_id`.
    ///
    /// Returns the freshly minted id.
    pub fn create_folder(&mut self, parent_id: &FileId, name: &str) -> Result<FileId, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        let parent = self
            .get(parent_id.as_str())
            .ok_or_else(|| StoreError::ParentNotFound(parent_id.clone()))?;
        if !parent.is_dir {
            return Err(StoreError::NotADirectory(parent_id.clone()));
        }

        let folder_id = self.mint_folder_id();
        let mut folder = FileRecord::folder(folder_id.clone(), name, Some(parent_id.clone()));
        folder.attributes.mod_date = Some(Utc::now());

        let mut children = parent.children().to_vec();
        children.push(folder_id.clone());

        let mut next = self.snapshot();
        next.insert(parent.with_children(children));
        next.insert(folder);
        self.current = Arc::new(next);

        debug!(parent = %parent_id, folder = %folder_id, "Created folder");
        Ok(folder_id)
    }

    /// Remove `ids` from the map and unlink them from their parents.
    ///
    /// Ids not present in the map are reported in `missing` and otherwise ignored.
    pub fn delete_files(&mut self, ids: &[FileId]) -> Result<DeleteReport, StoreError> {
        if ids.iter().any(|id| *id == self.root_id) {
            return Err(StoreError::RootImmutable(self.root_id.clone()));
        }

        let mut targets = dedup(ids);
        if self.config.delete_mode == DeleteMode::Recursive {
            let mut seen: BTreeSet<FileId> = targets.iter().cloned().collect();
            for id in targets.clone() {
                for descendant in self.current.descendants_of(id.as_str()) {
                    if seen.insert(descendant.clone()) {
                        targets.push(descendant);
                    }
                }
            }
        }

        let mut next = self.snapshot();
        let mut report = DeleteReport::default();
        let mut removed_dirs = Vec::new();
        for id in targets {
            let Some(record) = next.remove(id.as_str()) else {
                report.missing.push(id);
                continue;
            };
            if let Some(parent_id) = &record.parent_id {
                if let Some(parent) = next.get(parent_id.as_str()).cloned() {
                    let children = parent
                        .children()
                        .iter()
                        .filter(|child| **child != id)
                        .cloned()
                        .collect();
                    next.insert(parent.with_children(children));
                }
            }
            if record.is_dir {
                removed_dirs.push(record);
            }
            report.removed.push(id);
        }

        for dir in removed_dirs {
            report.orphaned.extend(
                dir.children()
                    .iter()
                    .filter(|child| next.contains(child.as_str()))
                    .cloned(),
            );
        }

        if !report.removed.is_empty() {
            self.current = Arc::new(next);
        }
        debug!(
            removed = report.removed.len(),
            orphaned = report.orphaned.len(),
            missing = report.missing.len(),
            "Deleted files"
        );
        Ok(report)
    }

    /// Move `ids` out of `source_id` and append them to `destination_id`.
    ///
    /// Refuses to move a folder into itself or into one of its descendants.
    pub fn move_files(
        &mut self,
        ids: &[FileId],
        source_id: &FileId,
        destination_id: &FileId,
    ) -> Result<(), StoreError> {
        let source = self
            .get(source_id.as_str())
            .ok_or_else(|| StoreError::NotFound(source_id.clone()))?;
        let destination = self
            .get(destination_id.as_str())
            .ok_or_else(|| StoreError::NotFound(destination_id.clone()))?;
        if !source.is_dir {
            return Err(StoreError::NotADirectory(source_id.clone()));
        }
        if !destination.is_dir {
            return Err(StoreError::NotADirectory(destination_id.clone()));
        }

        let moved = dedup(ids);
        if let Some(missing) = moved.iter().find(|id| !self.current.contains(id.as_str())) {
            return Err(StoreError::NotFound(missing.clone()));
        }
        if moved.is_empty() || source_id == destination_id {
            return Ok(());
        }

        let moved_set: BTreeSet<&FileId> = moved.iter().collect();
        for ancestor in views::ancestor_chain_of(&self.current, destination_id) {
            if moved_set.contains(&ancestor.id) {
                return Err(StoreError::MoveIntoDescendant {
                    moved: ancestor.id.clone(),
                    destination: destination_id.clone(),
                });
            }
        }

        let mut next = self.snapshot();
        let source_children = source
            .children()
            .iter()
            .filter(|id| !moved_set.contains(id))
            .cloned()
            .collect();
        next.insert(source.with_children(source_children));

        // Records listed under some other folder are unlinked from it as well.
        for id in &moved {
            let Some(parent_id) = next.get(id.as_str()).and_then(|r| r.parent_id.clone()) else {
                continue;
            };
            if parent_id == *source_id || parent_id == *destination_id {
                continue;
            }
            if let Some(parent) = next.get(parent_id.as_str()).cloned() {
                let children = parent.children().iter().filter(|c| *c != id).cloned().collect();
                next.insert(parent.with_children(children));
            }
        }

        let mut destination_children = destination.children().to_vec();
        for id in &moved {
            if !destination_children.contains(id) {
                destination_children.push(id.clone());
            }
        }
        next.insert(destination.with_children(destination_children));

        for id in &moved {
            if let Some(record) = next.get(id.as_str()).cloned() {
                next.insert(record.with_parent(destination_id.clone()));
            }
        }

        self.current = Arc::new(next);
        debug!(
            count = moved.len(),
            source = %source_id,
            destination = %destination_id,
            "Moved files"
        );
        Ok(())
    }

    fn mint_folder_id(&mut self) -> FileId {
        loop {
            let candidate = format!("{}{}", self.config.folder_id_prefix, self.next_folder_id);
            self.next_folder_id += 1;
            if !self.current.contains(&candidate) && !self.seed.contains(&candidate) {
                return FileId::new(candidate);
            }
        }
    }
}

/// Order-preserving de-duplication
fn dedup(ids: &[FileId]) -> Vec<FileId> {
    let mut seen = BTreeSet::new();
    ids.iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}
