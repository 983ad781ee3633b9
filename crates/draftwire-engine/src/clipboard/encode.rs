use crate::clipboard::{ClipboardEvent, DRAFT_MIME_TYPE, HostSelection, RawBlock, TEXT_HTML, TEXT_PLAIN};
use crate::error::ClipboardError;
use crate::model::BlockMap;
use crate::ranges::{EntityKeyTable, encode_entity_ranges, encode_inline_style_ranges};

/// A fragment converted to raw blocks, with the local entity table used
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFragment {
    pub blocks: Vec<RawBlock>,
    pub entities: EntityKeyTable,
}

/// Convert `fragment` to raw blocks in document order.
///
/// Entity references are renumbered fragment-wide: each document entity
/// gets the next local index the first time one of its runs is met.
pub fn encode_fragment(fragment: &BlockMap) -> EncodedFragment {
    let mut entities = EntityKeyTable::new();
    let mut blocks = Vec::with_capacity(fragment.len());

    for (key, block) in fragment {
        block.find_entity_ranges(
            |c| c.entity().is_some(),
            |start, _| {
                if let Some(entity) = block.entity_at(start) {
                    entities.register(entity);
                }
            },
        );

        blocks.push(RawBlock {
            key: key.clone(),
            block_type: block.block_type().clone(),
            text: block.text().to_string(),
            depth: block.depth(),
            inline_style_ranges: encode_inline_style_ranges(block),
            entity_ranges: encode_entity_ranges(block, &entities),
            data: block.data().clone(),
        });
    }

    EncodedFragment { blocks, entities }
}

/// JSON payload for the custom clipboard channel
pub fn serialize_fragment(fragment: &BlockMap) -> Result<String, ClipboardError> {
    let encoded = encode_fragment(fragment);
    serde_json::to_string(&encoded.blocks).map_err(ClipboardError::Serialize)
}

/// Write `fragment` to the clipboard of a copy or cut event.
///
/// The plain text and HTML channels receive the host's own serializations;
/// the custom channel receives the raw block payload. The platform default
/// is suppressed so it cannot overwrite these writes. Without a fragment,
/// event, clipboard or selection nothing happens. The fragment is returned
/// unchanged.
pub fn set_fragment_to_clipboard<'a, E, S>(
    fragment: Option<&'a BlockMap>,
    event: Option<&mut E>,
    selection: Option<&S>,
) -> Option<&'a BlockMap>
where
    E: ClipboardEvent + ?Sized,
    S: HostSelection + ?Sized,
{
    let (Some(blocks), Some(event), Some(selection)) = (fragment, event, selection) else {
        return fragment;
    };
    if event.clipboard_data().is_none() {
        log::debug!("copy event has no clipboard access; leaving platform default");
        return fragment;
    }

    let encoded = encode_fragment(blocks);
    let payload = match serde_json::to_string(&encoded.blocks) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to serialize clipboard fragment: {e}");
            return fragment;
        }
    };
    let text_plain = selection.plain_text();
    let text_html = selection.html();

    event.prevent_default();
    if let Some(data) = event.clipboard_data_mut() {
        data.set_data(TEXT_PLAIN, &text_plain);
        data.set_data(TEXT_HTML, &text_html);
        data.set_data(DRAFT_MIME_TYPE, &payload);
    }

    log::debug!(
        "wrote {} blocks with {} local entities to clipboard",
        encoded.blocks.len(),
        encoded.entities.len()
    );
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{BlockMapSelection, ClipboardData, MemoryClipboard, MemoryClipboardEvent};
    use crate::model::{BlockType, CharacterMetadata, ContentBlock, EntityKey, StyleSet};
    use crate::ranges::EntityRange;
    use pretty_assertions::assert_eq;

    /// Block whose characters reference `entities[i]` at position `i`
    fn with_entities(key: &str, text: &str, entities: &[Option<&str>]) -> ContentBlock {
        let list = entities
            .iter()
            .map(|e| CharacterMetadata::create(StyleSet::new(), e.map(EntityKey::from)))
            .collect();
        ContentBlock::new(key, BlockType::Unstyled, text)
            .with_character_list(list)
            .unwrap()
    }

    fn range(offset: usize, length: usize, key: usize) -> EntityRange {
        EntityRange {
            offset,
            length,
            key,
        }
    }

    #[test]
    fn test_shared_entity_gets_same_local_key_across_blocks() {
        let fragment = BlockMap::from_blocks([
            with_entities("a", "ab", &[Some("7"), None]),
            with_entities("b", "cd", &[None, Some("7")]),
        ]);

        let encoded = encode_fragment(&fragment);

        assert_eq!(encoded.blocks[0].entity_ranges, vec![range(0, 1, 0)]);
        assert_eq!(encoded.blocks[1].entity_ranges, vec![range(1, 1, 0)]);
        assert_eq!(encoded.entities.len(), 1);
    }

    #[test]
    fn test_local_keys_follow_first_appearance() {
        let fragment = BlockMap::from_blocks([
            with_entities("a", "xyz", &[Some("30"), Some("4"), Some("30")]),
            with_entities("b", "uv", &[Some("12"), Some("4")]),
        ]);

        let encoded = encode_fragment(&fragment);

        assert_eq!(
            encoded.blocks[0].entity_ranges,
            vec![range(0, 1, 0), range(1, 1, 1), range(2, 1, 0)]
        );
        assert_eq!(encoded.blocks[1].entity_ranges, vec![range(0, 1, 2), range(1, 1, 1)]);

        let order: Vec<_> = encoded.entities.keys().map(EntityKey::as_str).collect();
        assert_eq!(order, vec!["30", "4", "12"]);
    }

    #[test]
    fn test_encode_copies_block_fields() {
        let mut data = crate::model::DataMap::new();
        data.insert("align".to_string(), serde_json::json!("center"));
        let fragment = BlockMap::from_blocks([ContentBlock::new(
            "q",
            BlockType::Blockquote,
            "quoted",
        )
        .with_depth(2)
        .with_data(data.clone())]);

        let raw = &encode_fragment(&fragment).blocks[0];

        assert_eq!(raw.key, "q");
        assert_eq!(raw.block_type, BlockType::Blockquote);
        assert_eq!(raw.text, "quoted");
        assert_eq!(raw.depth, 2);
        assert_eq!(raw.data, data);
    }

    #[test]
    fn test_set_fragment_writes_all_channels() {
        let fragment = BlockMap::from_blocks([
            ContentBlock::new("a", BlockType::Unstyled, "Hi"),
            ContentBlock::new("b", BlockType::Unstyled, "Bye"),
        ]);
        let mut event = MemoryClipboardEvent::new(MemoryClipboard::new());
        let selection = BlockMapSelection::new(&fragment);

        let returned = set_fragment_to_clipboard(Some(&fragment), Some(&mut event), Some(&selection));

        assert!(std::ptr::eq(returned.unwrap(), &fragment));
        assert!(event.default_prevented());
        let clipboard = event.clipboard().unwrap();
        assert_eq!(clipboard.types(), vec![TEXT_PLAIN, TEXT_HTML, DRAFT_MIME_TYPE]);
        assert_eq!(clipboard.get_data(TEXT_PLAIN).as_deref(), Some("Hi\nBye"));
        assert_eq!(
            clipboard.get_data(TEXT_HTML).as_deref(),
            Some("<p>Hi</p><p>Bye</p>")
        );
        assert_eq!(
            clipboard.get_data(DRAFT_MIME_TYPE),
            Some(serialize_fragment(&fragment).unwrap())
        );
    }

    #[test]
    fn test_no_clipboard_is_a_no_op() {
        let fragment = BlockMap::from_blocks([ContentBlock::new("a", BlockType::Unstyled, "Hi")]);
        let selection = BlockMapSelection::new(&fragment);
        let mut event = MemoryClipboardEvent::without_clipboard();

        let returned = set_fragment_to_clipboard(Some(&fragment), Some(&mut event), Some(&selection));

        assert_eq!(returned, Some(&fragment));
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_missing_selection_or_fragment_is_a_no_op() {
        let fragment = BlockMap::from_blocks([ContentBlock::new("a", BlockType::Unstyled, "Hi")]);
        let mut event = MemoryClipboardEvent::new(MemoryClipboard::new());

        let returned = set_fragment_to_clipboard::<_, BlockMapSelection>(
            Some(&fragment),
            Some(&mut event),
            None,
        );
        assert_eq!(returned, Some(&fragment));

        let selection = BlockMapSelection::new(&fragment);
        assert_eq!(
            set_fragment_to_clipboard(None, Some(&mut event), Some(&selection)),
            None
        );

        assert!(!event.default_prevented());
        assert!(event.clipboard().unwrap().types().is_empty());
    }
}
