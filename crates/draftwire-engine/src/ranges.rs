//! Run-length codecs between a block's character list and the range lists
//! of the raw block format.
//!
//! Offsets and lengths count characters (Unicode scalar values), the same
//! unit as [`CharacterList`] positions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::block::find_ranges;
use crate::model::{CharacterList, CharacterMetadata, ContentBlock, EntityKey, StyleSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

/// Entity run whose `key` indexes a fragment-local entity table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: usize,
}

/// Renumbering of document entity keys to 0-based local indices.
///
/// Indices are issued in first-seen order and never change once issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityKeyTable {
    keys: IndexMap<EntityKey, usize>,
}

impl EntityKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local index for `key`, issuing the next one if it is new
    pub fn register(&mut self, key: &EntityKey) -> usize {
        let next = self.keys.len();
        *self.keys.entry(key.clone()).or_insert(next)
    }

    pub fn get(&self, key: &EntityKey) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Document keys in local index order
    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.keys.keys()
    }
}

/// Style runs of `block`, grouped by style in order of first appearance
pub fn encode_inline_style_ranges(block: &ContentBlock) -> Vec<InlineStyleRange> {
    let mut styles: Vec<&str> = Vec::new();
    for character in block.character_list() {
        for style in character.style() {
            if !styles.contains(&style.as_str()) {
                styles.push(style.as_str());
            }
        }
    }

    let mut ranges = Vec::new();
    for style in styles {
        let has_style: Vec<bool> = block
            .character_list()
            .iter()
            .map(|c| c.has_style(style))
            .collect();
        find_ranges(
            &has_style,
            |a, b| a == b,
            |styled| *styled,
            |start, end| {
                ranges.push(InlineStyleRange {
                    offset: start,
                    length: end - start,
                    style: style.to_string(),
                })
            },
        );
    }
    ranges
}

/// Entity runs of `block`, keyed by their index in `table`
pub fn encode_entity_ranges(block: &ContentBlock, table: &EntityKeyTable) -> Vec<EntityRange> {
    let mut ranges = Vec::new();
    block.find_entity_ranges(
        |c| c.entity().is_some(),
        |start, end| {
            let Some(entity) = block.entity_at(start) else {
                return;
            };
            match table.get(entity) {
                Some(key) => ranges.push(EntityRange {
                    offset: start,
                    length: end - start,
                    key,
                }),
                None => log::warn!(
                    "block {}: entity {entity} missing from local entity table",
                    block.key()
                ),
            }
        },
    );
    ranges
}

/// One style set per character of `text`; ranges past the end are clipped
pub fn decode_inline_style_ranges(text: &str, ranges: &[InlineStyleRange]) -> Vec<StyleSet> {
    let len = text.chars().count();
    let mut styles = vec![StyleSet::new(); len];
    for range in ranges {
        let end = range.offset.saturating_add(range.length).min(len);
        for style in styles.iter_mut().take(end).skip(range.offset) {
            style.insert(range.style.clone());
        }
    }
    styles
}

/// One optional entity key per character of `text`.
///
/// Range keys are carried over verbatim; mapping them back to document
/// entities is up to the caller.
pub fn decode_entity_ranges(text: &str, ranges: &[EntityRange]) -> Vec<Option<EntityKey>> {
    let len = text.chars().count();
    let mut entities = vec![None; len];
    for range in ranges {
        let end = range.offset.saturating_add(range.length).min(len);
        let key = EntityKey::from(range.key.to_string());
        for entity in entities.iter_mut().take(end).skip(range.offset) {
            *entity = Some(key.clone());
        }
    }
    entities
}

/// Zip decoded styles and entities into a character list
pub fn create_character_list(
    styles: Vec<StyleSet>,
    entities: Vec<Option<EntityKey>>,
) -> CharacterList {
    let mut entities = entities.into_iter();
    styles
        .into_iter()
        .map(|style| CharacterMetadata::create(style, entities.next().flatten()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn style_range(offset: usize, length: usize, style: &str) -> InlineStyleRange {
        InlineStyleRange {
            offset,
            length,
            style: style.to_string(),
        }
    }

    fn block_with(text: &str, ranges: &[InlineStyleRange], entities: &[EntityRange]) -> ContentBlock {
        let list = create_character_list(
            decode_inline_style_ranges(text, ranges),
            decode_entity_ranges(text, entities),
        );
        ContentBlock::new("k", BlockType::Unstyled, text)
            .with_character_list(list)
            .unwrap()
    }

    #[test]
    fn test_style_ranges_survive_encode_after_decode() {
        let ranges = vec![
            style_range(0, 3, "BOLD"),
            style_range(5, 2, "BOLD"),
            style_range(2, 4, "ITALIC"),
        ];
        let block = block_with("abcdefgh", &ranges, &[]);

        assert_eq!(encode_inline_style_ranges(&block), ranges);
    }

    #[test]
    fn test_overlapping_styles_are_grouped_per_style() {
        let block = block_with(
            "abcd",
            &[style_range(2, 2, "ITALIC"), style_range(0, 4, "BOLD")],
            &[],
        );

        // BOLD covers position 0, so it is discovered first
        assert_eq!(
            encode_inline_style_ranges(&block),
            vec![style_range(0, 4, "BOLD"), style_range(2, 2, "ITALIC")]
        );
    }

    #[test]
    fn test_decode_counts_characters_not_bytes() {
        let styles = decode_inline_style_ranges("héllo", &[style_range(1, 2, "BOLD")]);
        assert_eq!(styles.len(), 5);
        assert!(styles[1].contains("BOLD"));
        assert!(styles[2].contains("BOLD"));
        assert!(!styles[3].contains("BOLD"));
    }

    #[test]
    fn test_decode_clips_out_of_range() {
        let styles = decode_inline_style_ranges("ab", &[style_range(1, 10, "BOLD")]);
        assert_eq!(styles.len(), 2);
        assert!(styles[1].contains("BOLD"));

        let entities = decode_entity_ranges(
            "ab",
            &[EntityRange {
                offset: 5,
                length: 1,
                key: 0,
            }],
        );
        assert_eq!(entities, vec![None, None]);
    }

    #[test]
    fn test_unstyled_block_has_no_ranges() {
        let block = ContentBlock::new("k", BlockType::Unstyled, "plain");
        assert!(encode_inline_style_ranges(&block).is_empty());
        assert!(encode_entity_ranges(&block, &EntityKeyTable::new()).is_empty());
    }

    #[test]
    fn test_entity_ranges_use_local_indices() {
        let block = block_with(
            "link and link",
            &[],
            &[
                EntityRange {
                    offset: 0,
                    length: 4,
                    key: 7,
                },
                EntityRange {
                    offset: 9,
                    length: 4,
                    key: 7,
                },
            ],
        );
        let mut table = EntityKeyTable::new();
        table.register(&EntityKey::from("7"));

        assert_eq!(
            encode_entity_ranges(&block, &table),
            vec![
                EntityRange {
                    offset: 0,
                    length: 4,
                    key: 0
                },
                EntityRange {
                    offset: 9,
                    length: 4,
                    key: 0
                },
            ]
        );
    }

    #[test]
    fn test_entity_key_table_issues_indices_in_first_seen_order() {
        let mut table = EntityKeyTable::new();
        assert_eq!(table.register(&EntityKey::from("12")), 0);
        assert_eq!(table.register(&EntityKey::from("3")), 1);
        assert_eq!(table.register(&EntityKey::from("12")), 0);
        assert_eq!(table.len(), 2);

        let keys: Vec<_> = table.keys().map(EntityKey::as_str).collect();
        assert_eq!(keys, vec!["12", "3"]);
    }

    #[test]
    fn test_create_character_list_uses_canonical_empty() {
        let list = create_character_list(vec![StyleSet::new(); 2], vec![None, None]);
        assert!(list.iter().all(|c| Arc::ptr_eq(c, &CharacterMetadata::empty())));
    }
}
