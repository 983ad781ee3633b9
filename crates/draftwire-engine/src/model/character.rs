use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;

use crate::model::EntityKey;

/// Ordered set of inline style names applied to one character
pub type StyleSet = IndexSet<String>;

/// Style and entity annotation for a single character position.
///
/// Values are immutable and compared by value. Plain characters share one
/// canonical instance, available through [`CharacterMetadata::empty`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterMetadata {
    style: StyleSet,
    entity: Option<EntityKey>,
}

static EMPTY: OnceLock<Arc<CharacterMetadata>> = OnceLock::new();

impl CharacterMetadata {
    /// The shared instance for characters with no style and no entity
    pub fn empty() -> Arc<CharacterMetadata> {
        Arc::clone(EMPTY.get_or_init(|| Arc::new(CharacterMetadata::default())))
    }

    /// Create metadata, reusing the canonical empty instance when possible
    pub fn create(style: StyleSet, entity: Option<EntityKey>) -> Arc<CharacterMetadata> {
        if style.is_empty() && entity.is_none() {
            return Self::empty();
        }
        Arc::new(CharacterMetadata { style, entity })
    }

    pub fn style(&self) -> &StyleSet {
        &self.style
    }

    pub fn entity(&self) -> Option<&EntityKey> {
        self.entity.as_ref()
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.style.contains(style)
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.entity.is_none()
    }

    /// Return a copy of `record` with `style` added
    pub fn apply_style(record: &Arc<CharacterMetadata>, style: &str) -> Arc<CharacterMetadata> {
        if record.has_style(style) {
            return Arc::clone(record);
        }
        let mut styles = record.style.clone();
        styles.insert(style.to_string());
        Self::create(styles, record.entity.clone())
    }

    /// Return a copy of `record` with `style` removed
    pub fn remove_style(record: &Arc<CharacterMetadata>, style: &str) -> Arc<CharacterMetadata> {
        if !record.has_style(style) {
            return Arc::clone(record);
        }
        let mut styles = record.style.clone();
        styles.shift_remove(style);
        Self::create(styles, record.entity.clone())
    }

    /// Return a copy of `record` pointing at `entity` (or at nothing)
    pub fn apply_entity(
        record: &Arc<CharacterMetadata>,
        entity: Option<EntityKey>,
    ) -> Arc<CharacterMetadata> {
        if record.entity == entity {
            return Arc::clone(record);
        }
        Self::create(record.style.clone(), entity)
    }
}

/// Positional annotation layer for one block's text.
///
/// Index `i` describes character `i` of the text, counted in `char`s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterList(Vec<Arc<CharacterMetadata>>);

impl CharacterList {
    /// `len` copies of the canonical empty metadata
    pub fn repeat_empty(len: usize) -> Self {
        let empty = CharacterMetadata::empty();
        Self(vec![empty; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CharacterMetadata>> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<CharacterMetadata>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Arc<CharacterMetadata>] {
        &self.0
    }
}

impl From<Vec<Arc<CharacterMetadata>>> for CharacterList {
    fn from(chars: Vec<Arc<CharacterMetadata>>) -> Self {
        Self(chars)
    }
}

impl FromIterator<Arc<CharacterMetadata>> for CharacterList {
    fn from_iter<I: IntoIterator<Item = Arc<CharacterMetadata>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CharacterList {
    type Item = &'a Arc<CharacterMetadata>;
    type IntoIter = std::slice::Iter<'a, Arc<CharacterMetadata>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
