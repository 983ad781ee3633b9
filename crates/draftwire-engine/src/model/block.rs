use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{CharacterList, CharacterMetadata, DataMap, EntityKey, StyleSet};

/// Block type tag.
///
/// Known editor types get their own variant; anything else is carried
/// through untouched as `Custom`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    Atomic,
    Custom(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Paragraph => "paragraph",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::Atomic => "atomic",
            BlockType::Custom(tag) => tag,
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            BlockType::UnorderedListItem | BlockType::OrderedListItem
        )
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "unstyled" => BlockType::Unstyled,
            "paragraph" => BlockType::Paragraph,
            "header-one" => BlockType::HeaderOne,
            "header-two" => BlockType::HeaderTwo,
            "header-three" => BlockType::HeaderThree,
            "header-four" => BlockType::HeaderFour,
            "header-five" => BlockType::HeaderFive,
            "header-six" => BlockType::HeaderSix,
            "unordered-list-item" => BlockType::UnorderedListItem,
            "ordered-list-item" => BlockType::OrderedListItem,
            "blockquote" => BlockType::Blockquote,
            "code-block" => BlockType::CodeBlock,
            "atomic" => BlockType::Atomic,
            other => BlockType::Custom(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from(tag.as_str())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One paragraph-level unit of a document.
///
/// Blocks are immutable once built; the `with_*` methods consume the block
/// and return an updated copy. Tree linkage (`parent`, `children`,
/// siblings) is only populated for documents built in tree mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    key: String,
    block_type: BlockType,
    text: String,
    depth: usize,
    character_list: CharacterList,
    data: DataMap,
    parent: Option<String>,
    children: Vec<String>,
    prev_sibling: Option<String>,
    next_sibling: Option<String>,
}

impl ContentBlock {
    /// Plain block: every character gets the canonical empty metadata
    pub fn new(key: impl Into<String>, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let character_list = CharacterList::repeat_empty(text.chars().count());
        Self {
            key: key.into(),
            block_type,
            text,
            depth: 0,
            character_list,
            data: DataMap::new(),
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Replace the character list, which must match the text length
    pub fn with_character_list(mut self, character_list: CharacterList) -> Result<Self, ModelError> {
        let expected = self.length();
        if character_list.len() != expected {
            return Err(ModelError::CharacterListLength {
                key: self.key,
                expected,
                actual: character_list.len(),
            });
        }
        self.character_list = character_list;
        Ok(self)
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_data(mut self, data: DataMap) -> Self {
        self.data = data;
        self
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    pub fn with_prev_sibling(mut self, key: Option<String>) -> Self {
        self.prev_sibling = key;
        self
    }

    pub fn with_next_sibling(mut self, key: Option<String>) -> Self {
        self.next_sibling = key;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text length in characters
    pub fn length(&self) -> usize {
        self.character_list.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn character_list(&self) -> &CharacterList {
        &self.character_list
    }

    pub fn data(&self) -> &DataMap {
        &self.data
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children_keys(&self) -> &[String] {
        &self.children
    }

    pub fn prev_sibling_key(&self) -> Option<&str> {
        self.prev_sibling.as_deref()
    }

    pub fn next_sibling_key(&self) -> Option<&str> {
        self.next_sibling.as_deref()
    }

    pub fn inline_style_at(&self, offset: usize) -> Option<&StyleSet> {
        self.character_list.get(offset).map(|c| c.style())
    }

    pub fn entity_at(&self, offset: usize) -> Option<&EntityKey> {
        self.character_list.get(offset).and_then(|c| c.entity())
    }

    /// Call `found(start, end)` for every maximal run of identical style
    /// sets whose characters pass `filter`
    pub fn find_style_ranges(
        &self,
        filter: impl Fn(&CharacterMetadata) -> bool,
        found: impl FnMut(usize, usize),
    ) {
        find_ranges(
            self.character_list.as_slice(),
            |a, b| a.style() == b.style(),
            |c| filter(&**c),
            found,
        );
    }

    /// Call `found(start, end)` for every maximal run of one entity whose
    /// characters pass `filter`
    pub fn find_entity_ranges(
        &self,
        filter: impl Fn(&CharacterMetadata) -> bool,
        found: impl FnMut(usize, usize),
    ) {
        find_ranges(
            self.character_list.as_slice(),
            |a, b| a.entity() == b.entity(),
            |c| filter(&**c),
            found,
        );
    }
}

/// Scan `items` for maximal runs of equal values and report the runs that
/// pass `filter` as half-open `start..end` positions
pub(crate) fn find_ranges<T>(
    items: &[T],
    are_equal: impl Fn(&T, &T) -> bool,
    filter: impl Fn(&T) -> bool,
    mut found: impl FnMut(usize, usize),
) {
    let Some(first) = items.first() else {
        return;
    };

    let mut run_start = 0;
    let mut current = first;
    for (i, item) in items.iter().enumerate().skip(1) {
        if !are_equal(current, item) {
            if filter(current) {
                found(run_start, i);
            }
            run_start = i;
            current = item;
        }
    }

    if filter(current) {
        found(run_start, items.len());
    }
}
