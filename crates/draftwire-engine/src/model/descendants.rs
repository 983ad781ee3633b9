use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{BlockMap, ContentBlock};

/// Synthetic parent for blocks without a parent key
pub const ROOT_KEY: &str = "__ROOT__";

/// Children and subtree membership for one node of the block hierarchy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDescendants {
    /// Immediate children, in document order
    pub first_level_blocks: IndexMap<String, Arc<ContentBlock>>,
    /// Keys of every block in this subtree, the block itself included
    pub children_blocks: HashSet<String>,
}

/// Hierarchy entries keyed by block key, plus [`ROOT_KEY`]
pub type BlockTree = IndexMap<String, BlockDescendants>;

/// Rebuild the parent/child hierarchy of a flat block map.
///
/// Lets an ancestor tell whether any block below it changed without
/// rescanning its subtree. Parent keys that name blocks missing from the
/// map still get an entry holding their children.
pub fn block_descendants(block_map: &BlockMap) -> BlockTree {
    let mut tree = BlockTree::new();

    for block in block_map.blocks() {
        tree.entry(block.key().to_string()).or_default();
        let parent = block
            .parent_key()
            .filter(|key| !key.is_empty())
            .unwrap_or(ROOT_KEY);
        tree.entry(parent.to_string())
            .or_default()
            .first_level_blocks
            .insert(block.key().to_string(), Arc::clone(block));
    }

    // Post-order fold so every child set is complete before its parent reads it
    let mut visited: HashSet<String> = HashSet::new();
    let starts: Vec<String> = tree.keys().cloned().collect();
    for start in starts {
        if visited.contains(&start) {
            continue;
        }
        let mut stack = vec![(start, false)];
        while let Some((key, expanded)) = stack.pop() {
            if expanded {
                let mut subtree = HashSet::new();
                if block_map.contains_key(&key) {
                    subtree.insert(key.clone());
                }
                for child in tree[&key].first_level_blocks.keys() {
                    subtree.extend(tree[child].children_blocks.iter().cloned());
                }
                if let Some(entry) = tree.get_mut(&key) {
                    entry.children_blocks = subtree;
                }
                continue;
            }

            if !visited.insert(key.clone()) {
                continue;
            }
            let children: Vec<String> = tree[&key].first_level_blocks.keys().cloned().collect();
            stack.push((key, true));
            for child in children.into_iter().rev() {
                if !visited.contains(&child) {
                    stack.push((child, false));
                }
            }
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;
    use pretty_assertions::assert_eq;

    fn node(key: &str, parent: Option<&str>) -> ContentBlock {
        ContentBlock::new(key, BlockType::Unstyled, key).with_parent(parent.map(str::to_string))
    }

    fn keys(set: &HashSet<String>) -> Vec<&str> {
        let mut keys: Vec<&str> = set.iter().map(String::as_str).collect();
        keys.sort();
        keys
    }

    fn nested() -> BlockMap {
        // a
        //   b
        //     c
        //   d
        // e
        BlockMap::from_blocks([
            node("a", None),
            node("b", Some("a")),
            node("c", Some("b")),
            node("d", Some("a")),
            node("e", None),
        ])
    }

    #[test]
    fn test_children_are_in_document_order() {
        let tree = block_descendants(&nested());

        let root: Vec<_> = tree[ROOT_KEY].first_level_blocks.keys().collect();
        assert_eq!(root, vec!["a", "e"]);

        let a: Vec<_> = tree["a"].first_level_blocks.keys().collect();
        assert_eq!(a, vec!["b", "d"]);

        assert!(tree["c"].first_level_blocks.is_empty());
    }

    #[test]
    fn test_descendant_sets_include_self_and_subtree() {
        let tree = block_descendants(&nested());

        assert_eq!(keys(&tree["a"].children_blocks), vec!["a", "b", "c", "d"]);
        assert_eq!(keys(&tree["b"].children_blocks), vec!["b", "c"]);
        assert_eq!(keys(&tree["c"].children_blocks), vec!["c"]);
        assert_eq!(keys(&tree[ROOT_KEY].children_blocks), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_every_block_has_exactly_one_parent() {
        let map = nested();
        let tree = block_descendants(&map);

        for key in map.keys() {
            let parents = tree
                .values()
                .filter(|entry| entry.first_level_blocks.contains_key(key))
                .count();
            assert_eq!(parents, 1, "block {key}");
        }
    }

    #[test]
    fn test_child_sets_are_subsets_of_parent_sets() {
        let tree = block_descendants(&nested());

        for (key, entry) in &tree {
            assert!(key == ROOT_KEY || entry.children_blocks.contains(key));
            for child in entry.first_level_blocks.keys() {
                assert!(tree[child].children_blocks.is_subset(&entry.children_blocks));
            }
        }
    }

    #[test]
    fn test_children_before_parent_in_document_order() {
        // Out-of-order input still produces complete sets
        let map = BlockMap::from_blocks([node("c", Some("p")), node("p", None)]);
        let tree = block_descendants(&map);

        assert_eq!(keys(&tree["p"].children_blocks), vec!["c", "p"]);
        assert_eq!(keys(&tree[ROOT_KEY].children_blocks), vec!["c", "p"]);
    }

    #[test]
    fn test_empty_parent_key_means_root() {
        let map = BlockMap::from_blocks([node("a", Some(""))]);
        let tree = block_descendants(&map);
        assert!(tree[ROOT_KEY].first_level_blocks.contains_key("a"));
    }

    #[test]
    fn test_flat_map_puts_everything_under_root() {
        let map = BlockMap::from_blocks([node("x", None), node("y", None)]);
        let tree = block_descendants(&map);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree[ROOT_KEY].first_level_blocks.len(), 2);
    }
}
