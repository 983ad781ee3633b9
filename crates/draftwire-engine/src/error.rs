use crate::model::EntityKey;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown entity key: {0}")]
    EntityNotFound(EntityKey),
    #[error("Block {key}: character list has {actual} entries but text has {expected} characters")]
    CharacterListLength {
        key: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Malformed clipboard fragment: {0}")]
    MalformedFragment(#[source] serde_json::Error),
    #[error("Malformed clipboard fragment: top-level value is not an array")]
    NotAnArray,
    #[error("Failed to serialize clipboard fragment: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ClipboardError {
    /// Whether the payload was present but unusable
    pub fn is_malformed_fragment(&self) -> bool {
        matches!(self, Self::MalformedFragment(_) | Self::NotAnArray)
    }
}
