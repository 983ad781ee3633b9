use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// Arbitrary key/value payload carried by entities and blocks
pub type DataMap = Map<String, Value>;

/// Registry-assigned entity identifier, never reused
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// How an entity's text behaves under editing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    Mutable,
    Immutable,
    Segmented,
}

/// Out-of-line annotation such as a link or mention
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: Mutability,
    #[serde(default)]
    pub data: DataMap,
}

impl Entity {
    pub fn new(entity_type: impl Into<String>, mutability: Mutability, data: DataMap) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data,
        }
    }
}

/// Storage service for entities shared by every content state of a document.
///
/// Methods take `&self`: implementations own their interior mutability and
/// are confined to the UI thread.
pub trait EntityStore {
    /// Create a new entity and return its key
    fn create(&self, entity_type: &str, mutability: Mutability, data: DataMap) -> EntityKey {
        self.add(Entity::new(entity_type, mutability, data))
    }

    /// Store an existing entity instance under a fresh key
    fn add(&self, entity: Entity) -> EntityKey;

    fn get(&self, key: &EntityKey) -> Result<Entity, ModelError>;

    /// Shallow-merge `to_merge` into the entity's data
    fn merge_data(&self, key: &EntityKey, to_merge: DataMap) -> Result<Entity, ModelError>;

    fn replace_data(&self, key: &EntityKey, new_data: DataMap) -> Result<Entity, ModelError>;

    fn last_created_key(&self) -> Option<EntityKey>;
}

/// Shared, non-owning handle to an entity store
pub type EntityStoreRef = Rc<dyn EntityStore>;

/// In-memory entity store with monotonically increasing numeric keys
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: RefCell<IndexMap<EntityKey, Entity>>,
    last_key: Cell<u64>,
}

thread_local! {
    static SHARED_REGISTRY: Rc<EntityRegistry> = Rc::new(EntityRegistry::new());
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The thread's default registry, created on first use
    pub fn shared() -> Rc<EntityRegistry> {
        SHARED_REGISTRY.with(Rc::clone)
    }

    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.borrow().is_empty()
    }

    fn update(
        &self,
        key: &EntityKey,
        f: impl FnOnce(&mut Entity),
    ) -> Result<Entity, ModelError> {
        let mut entities = self.entities.borrow_mut();
        let entity = entities
            .get_mut(key)
            .ok_or_else(|| ModelError::EntityNotFound(key.clone()))?;
        f(entity);
        Ok(entity.clone())
    }
}

impl EntityStore for EntityRegistry {
    fn add(&self, entity: Entity) -> EntityKey {
        let next = self.last_key.get() + 1;
        self.last_key.set(next);
        let key = EntityKey(next.to_string());
        self.entities.borrow_mut().insert(key.clone(), entity);
        key
    }

    fn get(&self, key: &EntityKey) -> Result<Entity, ModelError> {
        self.entities
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ModelError::EntityNotFound(key.clone()))
    }

    fn merge_data(&self, key: &EntityKey, to_merge: DataMap) -> Result<Entity, ModelError> {
        self.update(key, |entity| entity.data.extend(to_merge))
    }

    fn replace_data(&self, key: &EntityKey, new_data: DataMap) -> Result<Entity, ModelError> {
        self.update(key, |entity| entity.data = new_data)
    }

    fn last_created_key(&self) -> Option<EntityKey> {
        match self.last_key.get() {
            0 => None,
            n => Some(EntityKey(n.to_string())),
        }
    }
}
