//! Seed snapshots: the static file map a session starts from.

use super::{FileMap, FileRecord};
use crate::error::SeedError;
use crate::types::FileId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

const DEMO_FILE_MAP: &str = include_str!("demo_fs_map.json");

/// Seed: root folder id plus the id-keyed records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub root_folder_id: FileId,
    pub file_map: FileMap,
}

impl Seed {
    pub fn new(root_folder_id: FileId, file_map: FileMap) -> Self {
        Self {
            root_folder_id,
            file_map,
        }
    }

    /// Parse a seed from its JSON form and check that it can back a store
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: Seed = serde_json::from_str(json)?;
        seed.check_loadable()?;
        Ok(seed)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The built-in demo tree
    pub fn demo() -> Result<Self, SeedError> {
        Self::from_json(DEMO_FILE_MAP)
    }

    pub fn into_parts(self) -> Result<(FileId, FileMap), SeedError> {
        self.check_loadable()?;
        Ok((self.root_folder_id, self.file_map))
    }

    /// Keys must match record ids and the root must be a directory
    fn check_loadable(&self) -> Result<(), SeedError> {
        if let Some((key, record)) = self.file_map.iter().find(|(key, record)| **key != record.id) {
            return Err(SeedError::IdMismatch {
                key: key.clone(),
                id: record.id.clone(),
            });
        }
        let root = self
            .file_map
            .get(self.root_folder_id.as_str())
            .ok_or_else(|| SeedError::MissingRoot(self.root_folder_id.clone()))?;
        if !root.is_dir {
            return Err(SeedError::RootNotDirectory(self.root_folder_id.clone()));
        }
        Ok(())
    }

    /// Check the map invariants and collect every violation found
    pub fn validate(&self) -> SeedReport {
        let map = &self.file_map;
        let mut issues = Vec::new();

        for (key, record) in map.iter() {
            if *key != record.id {
                issues.push(SeedIssue::IdMismatch {
                    key: key.clone(),
                    id: record.id.clone(),
                });
            }
        }

        if let Some(root) = map.get(self.root_folder_id.as_str()) {
            if root.parent_id.is_some() {
                issues.push(SeedIssue::RootHasParent { id: root.id.clone() });
            }
        }

        for record in map.records() {
            check_parent_link(map, record, &mut issues);
            check_children(map, record, &mut issues);
        }

        for id in cyclic_records(map) {
            issues.push(SeedIssue::Cycle { id });
        }

        SeedReport { issues }
    }
}

fn check_parent_link(map: &FileMap, record: &FileRecord, issues: &mut Vec<SeedIssue>) {
    let Some(parent_id) = &record.parent_id else {
        return;
    };
    let Some(parent) = map.get(parent_id.as_str()) else {
        issues.push(SeedIssue::MissingParent {
            id: record.id.clone(),
            parent: parent_id.clone(),
        });
        return;
    };
    let listed = parent.children().iter().filter(|c| **c == record.id).count();
    match listed {
        0 => issues.push(SeedIssue::NotListedByParent {
            id: record.id.clone(),
            parent: parent_id.clone(),
        }),
        1 => {}
        _ => issues.push(SeedIssue::ListedMoreThanOnce {
            id: record.id.clone(),
            parent: parent_id.clone(),
        }),
    }
}

fn check_children(map: &FileMap, record: &FileRecord, issues: &mut Vec<SeedIssue>) {
    if !record.is_dir {
        if !record.children().is_empty() {
            issues.push(SeedIssue::ChildrenOnFile {
                id: record.id.clone(),
            });
        }
        return;
    }
    for child in record.children() {
        if !map.contains(child.as_str()) {
            issues.push(SeedIssue::DanglingChild {
                parent: record.id.clone(),
                child: child.clone(),
            });
        }
    }
    if let Some(cached) = record.children_count {
        let actual = record.children().len();
        if cached != actual {
            issues.push(SeedIssue::CountMismatch {
                id: record.id.clone(),
                cached,
                actual,
            });
        }
    }
}

/// Records that reach themselves by following parent links
fn cyclic_records(map: &FileMap) -> Vec<FileId> {
    let mut cyclic = Vec::new();
    for record in map.records() {
        let mut visited = BTreeSet::new();
        let mut parent_id = record.parent_id.clone();
        while let Some(current) = parent_id {
            if current == record.id {
                cyclic.push(record.id.clone());
                break;
            }
            if !visited.insert(current.clone()) {
                break;
            }
            parent_id = map.get(current.as_str()).and_then(|p| p.parent_id.clone());
        }
    }
    cyclic
}

/// A single invariant violation in a seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum SeedIssue {
    IdMismatch { key: FileId, id: FileId },
    RootHasParent { id: FileId },
    MissingParent { id: FileId, parent: FileId },
    NotListedByParent { id: FileId, parent: FileId },
    ListedMoreThanOnce { id: FileId, parent: FileId },
    DanglingChild { parent: FileId, child: FileId },
    ChildrenOnFile { id: FileId },
    CountMismatch { id: FileId, cached: usize, actual: usize },
    Cycle { id: FileId },
}

impl fmt::Display for SeedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedIssue::IdMismatch { key, id } => {
                write!(f, "record keyed {} carries id {}", key, id)
            }
            SeedIssue::RootHasParent { id } => write!(f, "root {} has a parent", id),
            SeedIssue::MissingParent { id, parent } => {
                write!(f, "{} points at missing parent {}", id, parent)
            }
            SeedIssue::NotListedByParent { id, parent } => {
                write!(f, "{} is not listed in the children of {}", id, parent)
            }
            SeedIssue::ListedMoreThanOnce { id, parent } => {
                write!(f, "{} is listed more than once in {}", id, parent)
            }
            SeedIssue::DanglingChild { parent, child } => {
                write!(f, "{} lists missing child {}", parent, child)
            }
            SeedIssue::ChildrenOnFile { id } => write!(f, "file {} has children", id),
            SeedIssue::CountMismatch { id, cached, actual } => write!(
                f,
                "{} caches {} children but lists {}",
                id, cached, actual
            ),
            SeedIssue::Cycle { id } => write!(f, "{} is its own ancestor", id),
        }
    }
}

/// Outcome of `Seed::validate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub issues: Vec<SeedIssue>,
}

impl SeedReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue count per kind, for summaries
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            let kind = match issue {
                SeedIssue::IdMismatch { .. } => "id_mismatch",
                SeedIssue::RootHasParent { .. } => "root_has_parent",
                SeedIssue::MissingParent { .. } => "missing_parent",
                SeedIssue::NotListedByParent { .. } => "not_listed_by_parent",
                SeedIssue::ListedMoreThanOnce { .. } => "listed_more_than_once",
                SeedIssue::DanglingChild { .. } => "dangling_child",
                SeedIssue::ChildrenOnFile { .. } => "children_on_file",
                SeedIssue::CountMismatch { .. } => "count_mismatch",
                SeedIssue::Cycle { .. } => "cycle",
            };
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }
}
