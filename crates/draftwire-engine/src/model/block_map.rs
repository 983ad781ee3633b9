use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::ContentBlock;

/// Ordered, key-unique collection of blocks in document order.
///
/// Blocks are held behind `Arc` so that derived maps share unchanged blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockMap {
    blocks: IndexMap<String, Arc<ContentBlock>>,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map preserving array order. Keys must be unique; a repeated
    /// key replaces the earlier block in place.
    pub fn from_blocks(blocks: impl IntoIterator<Item = ContentBlock>) -> Self {
        blocks.into_iter().map(Arc::new).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.blocks.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blocks.contains_key(key)
    }

    pub fn first(&self) -> Option<&Arc<ContentBlock>> {
        self.blocks.first().map(|(_, block)| block)
    }

    pub fn last(&self) -> Option<&Arc<ContentBlock>> {
        self.blocks.last().map(|(_, block)| block)
    }

    /// Position of `key` in document order
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.blocks.get_index_of(key)
    }

    pub fn get_index(&self, index: usize) -> Option<&Arc<ContentBlock>> {
        self.blocks.get_index(index).map(|(_, block)| block)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.blocks.keys().map(String::as_str)
    }

    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = &Arc<ContentBlock>> + ExactSizeIterator {
        self.blocks.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Arc<ContentBlock>> {
        self.blocks.iter()
    }

    /// Copy with `block` inserted or replaced at its key's position
    pub fn with_block(&self, block: Arc<ContentBlock>) -> Self {
        let mut blocks = self.blocks.clone();
        blocks.insert(block.key().to_string(), block);
        Self { blocks }
    }
}

impl FromIterator<Arc<ContentBlock>> for BlockMap {
    fn from_iter<I: IntoIterator<Item = Arc<ContentBlock>>>(iter: I) -> Self {
        Self {
            blocks: iter
                .into_iter()
                .map(|block| (block.key().to_string(), block))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BlockMap {
    type Item = (&'a String, &'a Arc<ContentBlock>);
    type IntoIter = indexmap::map::Iter<'a, String, Arc<ContentBlock>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
