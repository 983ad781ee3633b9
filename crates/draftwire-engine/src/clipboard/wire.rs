use serde::{Deserialize, Serialize};

use crate::model::{BlockType, DataMap};
use crate::ranges::{EntityRange, InlineStyleRange};

/// One block of a clipboard fragment as written to the custom channel.
///
/// `entity_ranges[].key` is an index into the fragment's local entity
/// table, never a document entity key. The format has no version field, so
/// every field except `key` and `text` tolerates being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    pub text: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<InlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
    #[serde(default)]
    pub data: DataMap,
}

/// The fields of a raw block that a paste reads back.
///
/// `entityRanges` is not read at all, so its shape cannot fail a paste.
/// Optional fields accept `null` as well as being absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastedBlock {
    pub key: String,
    #[serde(rename = "type", default)]
    pub block_type: Option<BlockType>,
    pub text: String,
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default)]
    pub inline_style_ranges: Option<Vec<InlineStyleRange>>,
    #[serde(default)]
    pub data: Option<DataMap>,
}
