use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use regex::Regex;

use crate::error::ModelError;
use crate::model::{
    BlockMap, BlockMode, BlockTree, BlockType, ContentBlock, DataMap, Entity, EntityKey,
    EntityRegistry, EntityStoreRef, ModelOptions, Mutability, SelectionState, block_descendants,
    generate_random_key, line_break, sanitize_draft_text,
};

const DEFAULT_DELIMITER: &str = "\n";

/// Immutable snapshot of a document.
///
/// Owns its block map and the selections that bracket the edit which
/// produced it. The entity store is shared with every other state of the
/// same document; entity calls mutate that store and leave the state itself
/// untouched.
#[derive(Clone)]
pub struct ContentState {
    block_map: BlockMap,
    entity_map: EntityStoreRef,
    selection_before: SelectionState,
    selection_after: SelectionState,
}

impl fmt::Debug for ContentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentState")
            .field("block_map", &self.block_map)
            .field("selection_before", &self.selection_before)
            .field("selection_after", &self.selection_after)
            .finish_non_exhaustive()
    }
}

impl ContentState {
    pub fn entity_map(&self) -> &EntityStoreRef {
        &self.entity_map
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub fn into_block_map(self) -> BlockMap {
        self.block_map
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    pub fn with_block_map(&self, block_map: BlockMap) -> Self {
        Self {
            block_map,
            ..self.clone()
        }
    }

    pub fn with_selection_before(&self, selection: SelectionState) -> Self {
        Self {
            selection_before: selection,
            ..self.clone()
        }
    }

    pub fn with_selection_after(&self, selection: SelectionState) -> Self {
        Self {
            selection_after: selection,
            ..self.clone()
        }
    }

    pub fn block_for_key(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        self.block_map.get(key)
    }

    /// Blocks without a parent
    pub fn first_level_blocks(&self) -> BlockMap {
        self.block_children("")
    }

    /// Blocks whose parent key is `key`; the empty key selects top-level blocks
    pub fn block_children(&self, key: &str) -> BlockMap {
        self.block_map
            .blocks()
            .filter(|block| block.parent_key().unwrap_or("") == key)
            .cloned()
            .collect()
    }

    /// Parent/child hierarchy with transitive descendant sets
    pub fn block_descendants(&self) -> BlockTree {
        block_descendants(&self.block_map)
    }

    pub fn key_before(&self, key: &str) -> Option<&str> {
        let index = self.block_map.index_of(key)?;
        let before = index.checked_sub(1)?;
        self.block_map.get_index(before).map(|block| block.key())
    }

    pub fn key_after(&self, key: &str) -> Option<&str> {
        let index = self.block_map.index_of(key)?;
        self.block_map.get_index(index + 1).map(|block| block.key())
    }

    pub fn block_before(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        let key = self.key_before(key)?;
        self.block_map.get(key)
    }

    pub fn block_after(&self, key: &str) -> Option<&Arc<ContentBlock>> {
        let key = self.key_after(key)?;
        self.block_map.get(key)
    }

    pub fn blocks_as_array(&self) -> Vec<Arc<ContentBlock>> {
        self.block_map.blocks().cloned().collect()
    }

    pub fn first_block(&self) -> Option<&Arc<ContentBlock>> {
        self.block_map.first()
    }

    pub fn last_block(&self) -> Option<&Arc<ContentBlock>> {
        self.block_map.last()
    }

    /// Block texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.plain_text_with(DEFAULT_DELIMITER)
    }

    /// Block texts joined by `delimiter`; an empty delimiter means newline
    pub fn plain_text_with(&self, delimiter: &str) -> String {
        let delimiter = if delimiter.is_empty() {
            DEFAULT_DELIMITER
        } else {
            delimiter
        };
        self.block_map
            .blocks()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    pub fn has_text(&self) -> bool {
        self.block_map.len() > 1 || self.block_map.first().is_some_and(|b| b.length() > 0)
    }

    pub fn last_created_entity_key(&self) -> Option<EntityKey> {
        self.entity_map.last_created_key()
    }

    pub fn create_entity(&self, entity_type: &str, mutability: Mutability, data: DataMap) -> &Self {
        self.entity_map.create(entity_type, mutability, data);
        self
    }

    pub fn merge_entity_data(&self, key: &EntityKey, to_merge: DataMap) -> Result<&Self, ModelError> {
        self.entity_map.merge_data(key, to_merge)?;
        Ok(self)
    }

    pub fn replace_entity_data(
        &self,
        key: &EntityKey,
        new_data: DataMap,
    ) -> Result<&Self, ModelError> {
        self.entity_map.replace_data(key, new_data)?;
        Ok(self)
    }

    pub fn add_entity(&self, entity: Entity) -> &Self {
        self.entity_map.add(entity);
        self
    }

    pub fn entity(&self, key: &EntityKey) -> Result<Entity, ModelError> {
        self.entity_map.get(key)
    }

    /// Wrap blocks in a new state, selecting the start of the first block.
    ///
    /// Block keys must be unique. Without an explicit store the thread's
    /// shared [`EntityRegistry`] is used.
    pub fn create_from_block_array(
        blocks: impl IntoIterator<Item = ContentBlock>,
        entity_map: Option<EntityStoreRef>,
    ) -> Self {
        let block_map = BlockMap::from_blocks(blocks);
        let selection = match block_map.first() {
            Some(first) => SelectionState::create_empty(first.key()),
            None => SelectionState::default(),
        };
        let entity_map = entity_map.unwrap_or_else(|| {
            let shared: EntityStoreRef = EntityRegistry::shared();
            shared
        });

        Self {
            block_map,
            entity_map,
            selection_before: selection.clone(),
            selection_after: selection,
        }
    }

    /// One unstyled block per line of `text`
    pub fn create_from_text(text: &str) -> Self {
        Self::create_from_text_with(text, line_break(), &ModelOptions::default())
    }

    /// One unstyled block per `delimiter`-separated piece of `text`
    pub fn create_from_text_with(text: &str, delimiter: &Regex, options: &ModelOptions) -> Self {
        let blocks: Vec<ContentBlock> = delimiter
            .split(text)
            .map(|piece| {
                ContentBlock::new(
                    generate_random_key(),
                    BlockType::Unstyled,
                    sanitize_draft_text(piece),
                )
            })
            .collect();

        let blocks = match options.block_mode {
            BlockMode::List => blocks,
            BlockMode::Tree => link_siblings(blocks),
        };

        Self::create_from_block_array(blocks, None)
    }
}

impl PartialEq for ContentState {
    fn eq(&self, other: &Self) -> bool {
        self.block_map == other.block_map
            && self.selection_before == other.selection_before
            && self.selection_after == other.selection_after
            && Rc::ptr_eq(&self.entity_map, &other.entity_map)
    }
}

fn link_siblings(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let keys: Vec<String> = blocks.iter().map(|b| b.key().to_string()).collect();
    blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            let prev = i.checked_sub(1).map(|p| keys[p].clone());
            let next = keys.get(i + 1).cloned();
            block.with_prev_sibling(prev).with_next_sibling(next)
        })
        .collect()
}
