//! Property tests for FileMapStore mutators and folder views

use std::collections::BTreeSet;
use std::sync::Arc;

use filemap::store::{DeleteMode, FileMapStore, StoreConfig};
use filemap::views::{ancestor_chain_of, children_of, is_reachable};
use filemap::{FileId, StoreError};
use proptest::prelude::*;
use proptest::sample::Index;

use super::support::{counts_consistent, node_id, select_children, GeneratedTree};

fn tree_shape() -> impl Strategy<Value = Vec<(usize, bool)>> {
    proptest::collection::vec((any::<usize>(), any::<bool>()), 1..32)
}

fn store_for(tree: &GeneratedTree, mode: DeleteMode) -> FileMapStore {
    FileMapStore::with_config(
        tree.seed.clone(),
        StoreConfig {
            delete_mode: mode,
            ..StoreConfig::default()
        },
    )
    .unwrap()
}

proptest! {
    #[test]
    fn create_folder_links_child_exactly_once(shape in tree_shape(), pick in any::<Index>()) {
        let tree = GeneratedTree::build(&shape);
        let dirs = tree.directories();
        let parent = pick.get(&dirs).clone();
        let mut store = store_for(&tree, DeleteMode::Shallow);

        let new_id = store.create_folder(&parent, "New").unwrap();
        let map = store.map();
        let parent_record = map.get(parent.as_str()).unwrap();
        let occurrences = parent_record.children().iter().filter(|c| **c == new_id).count();
        prop_assert_eq!(occurrences, 1);
        prop_assert_eq!(map.get(new_id.as_str()).unwrap().parent_id.as_ref(), Some(&parent));
        prop_assert!(counts_consistent(&map));
    }

    #[test]
    fn delete_unlinks_every_target(
        shape in tree_shape(),
        pick in any::<Index>(),
        mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let tree = GeneratedTree::build(&shape);
        let populated = tree.populated_directories();
        prop_assume!(!populated.is_empty());
        let parent = pick.get(&populated).clone();
        let mut store = store_for(&tree, DeleteMode::Shallow);
        let targets = select_children(&store.map(), &parent, &mask);
        let before = children_of(&store.map(), &parent).iter().flatten().count();

        let report = store.delete_files(&targets).unwrap();
        prop_assert_eq!(report.removed.len(), targets.len());

        let map = store.map();
        let remaining = map.get(parent.as_str()).unwrap().children().to_vec();
        for id in &targets {
            prop_assert!(!remaining.contains(id));
            prop_assert!(!map.contains(id.as_str()));
        }
        let after = children_of(&map, &parent).iter().flatten().count();
        prop_assert_eq!(after, before - targets.len());
        prop_assert!(counts_consistent(&map));
    }

    #[test]
    fn move_relinks_or_rejects_cycles(
        shape in tree_shape(),
        source_pick in any::<Index>(),
        destination_pick in any::<Index>(),
        mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let tree = GeneratedTree::build(&shape);
        let populated = tree.populated_directories();
        prop_assume!(!populated.is_empty());
        let source = source_pick.get(&populated).clone();
        let dirs = tree.directories();
        let destination = destination_pick.get(&dirs).clone();
        prop_assume!(source != destination);

        let mut store = store_for(&tree, DeleteMode::Shallow);
        let before = store.map();
        let moved = select_children(&before, &source, &mask);
        let moved_set: BTreeSet<&FileId> = moved.iter().collect();
        let creates_cycle = ancestor_chain_of(&before, &destination)
            .iter()
            .any(|r| moved_set.contains(&r.id));

        let result = store.move_files(&moved, &source, &destination);
        if creates_cycle {
            let is_cycle_error = matches!(result, Err(StoreError::MoveIntoDescendant { .. }));
            prop_assert!(is_cycle_error);
            prop_assert!(Arc::ptr_eq(&before, &store.map()));
        } else {
            prop_assert!(result.is_ok());
            let map = store.map();
            let source_children = map.get(source.as_str()).unwrap().children().to_vec();
            let destination_children = map.get(destination.as_str()).unwrap().children().to_vec();
            for id in &moved {
                prop_assert!(!source_children.contains(id));
                prop_assert!(destination_children.contains(id));
                prop_assert_eq!(map.get(id.as_str()).unwrap().parent_id.as_ref(), Some(&destination));
                prop_assert!(is_reachable(&map, store.root_id(), id));
            }
            prop_assert!(counts_consistent(&map));
        }
    }

    #[test]
    fn ancestor_chain_length_is_depth_plus_one(shape in tree_shape(), pick in any::<Index>()) {
        let tree = GeneratedTree::build(&shape);
        let index = pick.index(shape.len() + 1);
        let store = store_for(&tree, DeleteMode::Shallow);

        let chain = ancestor_chain_of(&store.map(), &node_id(index));
        prop_assert_eq!(chain.len(), tree.depth(index) + 1);
        prop_assert_eq!(&chain[0].id, &node_id(0));
        prop_assert_eq!(&chain[chain.len() - 1].id, &node_id(index));
    }

    #[test]
    fn recursive_delete_leaves_no_orphans(shape in tree_shape(), pick in any::<Index>()) {
        let tree = GeneratedTree::build(&shape);
        let candidates: Vec<FileId> = (1..=shape.len()).map(node_id).collect();
        let target = pick.get(&candidates).clone();
        let mut store = store_for(&tree, DeleteMode::Recursive);

        let report = store.delete_files(&[target]).unwrap();
        prop_assert!(report.orphaned.is_empty());
        let map = store.map();
        for record in map.records() {
            prop_assert!(is_reachable(&map, store.root_id(), &record.id));
        }
    }

    #[test]
    fn reset_after_mutations_matches_seed(
        shape in tree_shape(),
        picks in proptest::collection::vec(any::<Index>(), 1..6),
    ) {
        let tree = GeneratedTree::build(&shape);
        let dirs = tree.directories();
        let mut store = store_for(&tree, DeleteMode::Shallow);
        for pick in &picks {
            store.create_folder(pick.get(&dirs), "tmp").unwrap();
        }
        store.reset();
        prop_assert_eq!(store.snapshot(), tree.seed.file_map.clone());
    }
}

#[test]
fn scenario_create_in_empty_folder() {
    // root R with one empty directory A
    let tree = GeneratedTree::build(&[(0, true)]);
    let mut store = FileMapStore::new(tree.seed.clone()).unwrap();
    let a = node_id(1);

    let new_id = store.create_folder(&a, "New").unwrap();
    let map = store.map();
    assert_eq!(map.get(a.as_str()).unwrap().children(), &[new_id]);

    let children = children_of(&map, &a);
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].as_ref().unwrap().name, "New");
}
