use serde_json::Value;

use crate::clipboard::{ClipboardEvent, DRAFT_MIME_TYPE, PastedBlock};
use crate::error::ClipboardError;
use crate::model::{BlockMap, ContentBlock, ContentState};
use crate::ranges::{create_character_list, decode_entity_ranges, decode_inline_style_ranges};

/// Parse a custom channel payload into a fresh block map.
///
/// The top-level value must be a JSON array of raw blocks. Entity ranges are
/// not reconstructed: pasted text keeps its styles but loses its entities.
/// Missing or `null` optional fields take their defaults.
pub fn decode_fragment(payload: &str) -> Result<BlockMap, ClipboardError> {
    let value: Value = serde_json::from_str(payload).map_err(ClipboardError::MalformedFragment)?;
    if !value.is_array() {
        return Err(ClipboardError::NotAnArray);
    }
    let pasted: Vec<PastedBlock> =
        serde_json::from_value(value).map_err(ClipboardError::MalformedFragment)?;

    let blocks = pasted
        .into_iter()
        .map(block_from_raw)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContentState::create_from_block_array(blocks, None).into_block_map())
}

fn block_from_raw(raw: PastedBlock) -> Result<ContentBlock, ClipboardError> {
    let style_ranges = raw.inline_style_ranges.unwrap_or_default();
    let styles = decode_inline_style_ranges(&raw.text, &style_ranges);
    // Local keys have no entity table to resolve against yet
    let entities = decode_entity_ranges(&raw.text, &[]);
    let character_list = create_character_list(styles, entities);

    let block = ContentBlock::new(raw.key, raw.block_type.unwrap_or_default(), raw.text)
        .with_character_list(character_list)?
        .with_depth(raw.depth.unwrap_or_default())
        .with_data(raw.data.unwrap_or_default());
    Ok(block)
}

/// Read the custom payload of a paste event, reporting why decoding failed.
///
/// `Ok(None)` means there is nothing to decode: no event, no clipboard
/// access, or no custom payload (e.g. text copied from another application).
pub fn try_get_fragment_from_clipboard<E>(event: Option<&E>) -> Result<Option<BlockMap>, ClipboardError>
where
    E: ClipboardEvent + ?Sized,
{
    let Some(data) = event.and_then(|e| e.clipboard_data()) else {
        return Ok(None);
    };
    if !data.has_type(DRAFT_MIME_TYPE) {
        log::debug!("clipboard has no {DRAFT_MIME_TYPE} payload");
        return Ok(None);
    }
    let Some(payload) = data.get_data(DRAFT_MIME_TYPE) else {
        return Ok(None);
    };

    let fragment = decode_fragment(&payload)?;
    log::debug!("read {} blocks from clipboard", fragment.len());
    Ok(Some(fragment))
}

/// Read the custom payload of a paste event.
///
/// A malformed payload is treated like an absent one so that a bad paste
/// never touches the document.
pub fn get_fragment_from_clipboard<E>(event: Option<&E>) -> Option<BlockMap>
where
    E: ClipboardEvent + ?Sized,
{
    match try_get_fragment_from_clipboard(event) {
        Ok(fragment) => fragment,
        Err(e) => {
            log::warn!("Ignoring clipboard payload: {e}");
            None
        }
    }
}
