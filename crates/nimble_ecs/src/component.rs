//! Component marker trait, registry keys and typed storage.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::entity::Entity;

/// Marker for types that can be attached to an entity.
pub trait Component: 'static {}

// ─── Keys ──────────────────────────────────────────────────────────────────

/// Identifies one component registry.
///
/// Most components are keyed by their Rust type.  A named key lets several
/// registries hold the same type, e.g. one registry per user script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    Type(TypeId, &'static str),
    Named(String),
}

impl ComponentKey {
    /// Key of the registry that stores `T` by type.
    pub fn of<T: Component>() -> Self {
        ComponentKey::Type(TypeId::of::<T>(), type_name::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        ComponentKey::Named(name.into())
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKey::Type(_, name) => f.write_str(name),
            ComponentKey::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ComponentKey {
    fn from(name: &str) -> Self {
        ComponentKey::Named(name.to_string())
    }
}

impl From<String> for ComponentKey {
    fn from(name: String) -> Self {
        ComponentKey::Named(name)
    }
}

// ─── Storage ───────────────────────────────────────────────────────────────

/// Insertion-ordered storage for one registry.
///
/// Iteration follows the order in which entities first received a component
/// under this key; overwriting keeps the original position.
pub struct Storage<T> {
    entries: Vec<(Entity, T)>,
    index: HashMap<Entity, usize>,
}

impl<T> Storage<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or overwrite.  Returns the previous value on overwrite.
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        match self.index.get(&entity) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, component)),
            None => {
                self.index.insert(entity, self.entries.len());
                self.entries.push((entity, component));
                None
            }
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&slot| &self.entries[slot].1)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.index.get(&entity)?;
        Some(&mut self.entries[slot].1)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(&entity)?;
        let (_, component) = self.entries.remove(slot);
        // Everything after the removed slot moved down by one.
        for (e, _) in &self.entries[slot..] {
            if let Some(i) = self.index.get_mut(e) {
                *i -= 1;
            }
        }
        Some(component)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entries.iter().map(|(e, c)| (*e, c))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entries.iter_mut().map(|(e, c)| (*e, c))
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`Storage`], used for whole-entity operations.
pub(crate) trait AnyStorage {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn contains_entity(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn stored_type(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for Storage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn stored_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
