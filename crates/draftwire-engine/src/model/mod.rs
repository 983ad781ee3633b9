/*!
 * # Document Model
 *
 * Immutable representation of styled, structured text.
 *
 * ## Layers
 *
 * - **`character`**: per-character style set and entity reference
 *   (`CharacterMetadata`), and the positional `CharacterList` of a block
 * - **`block`**: `ContentBlock`, one paragraph-level unit with text, type,
 *   depth, block data and optional tree linkage
 * - **`block_map`**: `BlockMap`, the ordered, key-unique block collection of
 *   one document or fragment
 * - **`content_state`**: `ContentState`, a block map plus the selections
 *   bracketing the edit that produced it and a handle to the entity store
 * - **`descendants`**: rebuilds the parent/child hierarchy of a flat block map
 * - **`entity`**: entities and the `EntityStore` service they live in
 *
 * ## Sharing
 *
 * Blocks and character metadata sit behind `Arc` and are shared between the
 * states derived from one another. The entity store is the only mutable
 * shared resource; it is reached through an `Rc` handle and must stay on
 * the thread that created it.
 *
 * ```rust
 * use draftwire_engine::model::ContentState;
 *
 * let content = ContentState::create_from_text("Hi\nBye");
 * let first = content.first_block().unwrap().key().to_string();
 * let second = content.key_after(&first).unwrap();
 *
 * assert_eq!(content.plain_text(), "Hi\nBye");
 * assert_eq!(content.key_before(second), Some(first.as_str()));
 * ```
 */

pub mod block;
pub mod block_map;
pub mod character;
pub mod content_state;
pub mod descendants;
pub mod entity;
pub mod options;
pub mod selection;
pub mod text;

pub use block::{BlockType, ContentBlock};
pub use block_map::BlockMap;
pub use character::{CharacterList, CharacterMetadata, StyleSet};
pub use content_state::ContentState;
pub use descendants::{BlockDescendants, BlockTree, ROOT_KEY, block_descendants};
pub use entity::{
    DataMap, Entity, EntityKey, EntityRegistry, EntityStore, EntityStoreRef, Mutability,
};
pub use options::{BlockMode, ModelOptions};
pub use selection::SelectionState;
pub use text::{generate_random_key, line_break, sanitize_draft_text};
