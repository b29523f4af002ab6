//! Shared builders for integration tests.

use filemap::store::{FileMap, FileRecord, Seed};
use filemap::FileId;

pub fn node_id(index: usize) -> FileId {
    FileId::new(format!("n{}", index))
}

/// Generated tree: node `i + 1` hangs below `raw % (i + 1)`; node 0 is the root.
///
/// A node is a directory when it is the root, has children, or its flag is set.
pub struct GeneratedTree {
    pub seed: Seed,
    pub parents: Vec<Option<usize>>,
}

impl GeneratedTree {
    pub fn build(shape: &[(usize, bool)]) -> Self {
        let count = shape.len() + 1;
        let mut parents = vec![None; count];
        let mut children: Vec<Vec<FileId>> = vec![Vec::new(); count];
        for (i, (raw, _)) in shape.iter().enumerate() {
            let node = i + 1;
            let parent = raw % node;
            parents[node] = Some(parent);
            children[parent].push(node_id(node));
        }

        let records = (0..count).map(|k| {
            let parent = parents[k].map(node_id);
            let is_dir = k == 0 || !children[k].is_empty() || shape[k - 1].1;
            if is_dir {
                FileRecord::folder(node_id(k), format!("node {}", k), parent)
                    .with_children(children[k].clone())
            } else {
                FileRecord::file(node_id(k), format!("node {}", k), parent)
            }
        });

        GeneratedTree {
            seed: Seed::new(node_id(0), FileMap::from_records(records)),
            parents,
        }
    }

    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.parents[index];
        while let Some(parent) = current {
            depth += 1;
            current = self.parents[parent];
        }
        depth
    }

    pub fn directories(&self) -> Vec<FileId> {
        self.seed
            .file_map
            .records()
            .filter(|r| r.is_dir)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Directories with at least one child
    pub fn populated_directories(&self) -> Vec<FileId> {
        self.seed
            .file_map
            .records()
            .filter(|r| !r.children().is_empty())
            .map(|r| r.id.clone())
            .collect()
    }
}

/// Every directory's cached count matches its child list
pub fn counts_consistent(map: &FileMap) -> bool {
    map.records()
        .filter(|r| r.is_dir)
        .all(|r| r.children_count.unwrap_or(0) == r.children().len())
}

/// Pick the children of `parent` selected by `mask`; always includes the first child
pub fn select_children(map: &FileMap, parent: &FileId, mask: &[bool]) -> Vec<FileId> {
    let children = map.get(parent.as_str()).unwrap().children().to_vec();
    children
        .iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || mask[i % mask.len()])
        .map(|(_, id)| id.clone())
        .collect()
}
