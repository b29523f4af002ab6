//! Folder Views
//!
//! Read-only projections of a FileMap: the children of a folder and the
//! ancestor chain from the root down to it. Views never fail; missing records
//! become placeholders or cut the chain short.

use crate::store::{FileMap, FileRecord};
use crate::types::FileId;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Records listed in `folder_id`'s children, `None` where an id does not resolve
pub fn children_of(map: &FileMap, folder_id: &FileId) -> Vec<Option<Arc<FileRecord>>> {
    let Some(folder) = map.get(folder_id.as_str()) else {
        return Vec::new();
    };
    folder
        .children()
        .iter()
        .map(|child_id| map.get(child_id.as_str()).cloned())
        .collect()
}

/// Root-first chain of folders ending at `folder_id`.
///
/// Stops at the first parent id that does not resolve. Empty when the folder
/// itself is unknown.
pub fn ancestor_chain_of(map: &FileMap, folder_id: &FileId) -> Vec<Arc<FileRecord>> {
    let Some(folder) = map.get(folder_id.as_str()) else {
        return Vec::new();
    };
    let mut chain = vec![Arc::clone(folder)];
    let mut parent_id = folder.parent_id.clone();
    while let Some(id) = parent_id {
        if chain.len() >= map.len() {
            warn!(folder = %folder_id, "Parent chain longer than the map, stopping at {}", id);
            break;
        }
        let Some(parent) = map.get(id.as_str()) else {
            break;
        };
        chain.push(Arc::clone(parent));
        parent_id = parent.parent_id.clone();
    }
    chain.reverse();
    chain
}

/// Whether walking up from `id` ends at `root_id`
pub fn is_reachable(map: &FileMap, root_id: &FileId, id: &FileId) -> bool {
    ancestor_chain_of(map, id)
        .first()
        .map(|top| top.id == *root_id)
        .unwrap_or(false)
}

/// Depth below the top of the chain (0 for the root)
pub fn depth_of(map: &FileMap, id: &FileId) -> Option<usize> {
    let chain = ancestor_chain_of(map, id);
    chain.len().checked_sub(1)
}

/// What the presentation layer renders for one folder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
    pub folder_id: FileId,
    pub files: Vec<Option<Arc<FileRecord>>>,
    pub folder_chain: Vec<Arc<FileRecord>>,
}

impl FolderView {
    pub fn of(map: &FileMap, folder_id: &FileId) -> Self {
        Self {
            folder_id: folder_id.clone(),
            files: children_of(map, folder_id),
            folder_chain: ancestor_chain_of(map, folder_id),
        }
    }

    /// Breadcrumb path such as `Demo Files / Pictures / Vacation`
    pub fn breadcrumb(&self) -> String {
        self.folder_chain
            .iter()
            .map(|record| record.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Indented text rendering of the tree below `root_id`
pub fn render_tree(map: &FileMap, root_id: &FileId) -> String {
    let mut out = String::new();
    let mut seen = BTreeSet::new();
    render_node(map, root_id, 0, &mut seen, &mut out);
    out
}

fn render_node(
    map: &FileMap,
    id: &FileId,
    depth: usize,
    seen: &mut BTreeSet<FileId>,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    let Some(record) = map.get(id.as_str()) else {
        out.push_str(&format!("{}? {} (missing)\n", indent, id));
        return;
    };
    if !seen.insert(id.clone()) {
        out.push_str(&format!("{}{} (cycle)\n", indent, record.name));
        return;
    }
    if record.is_dir {
        out.push_str(&format!("{}{}/\n", indent, record.name));
        for child in record.children() {
            render_node(map, child, depth + 1, seen, out);
        }
    } else {
        out.push_str(&format!("{}{}\n", indent, record.name));
    }
}
