use serde::{Deserialize, Serialize};

/// Block representation used when building new documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockMode {
    /// Flat blocks ordered by the block map
    #[default]
    List,
    /// Blocks additionally linked to parents, children and siblings
    Tree,
}

/// Construction options for [`ContentState`](crate::model::ContentState)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub block_mode: BlockMode,
}
