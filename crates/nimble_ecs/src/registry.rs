//! Entity allocator plus every component storage, keyed by [`ComponentKey`].
//!
//! The registry is what processors receive each tick.  Queries never fail:
//! a key that has no storage yet simply yields nothing.

use std::collections::HashMap;

use crate::component::{AnyStorage, Component, ComponentKey, Storage};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;

#[derive(Default)]
pub struct Registry {
    entities: EntityAllocator,
    storages: HashMap<ComponentKey, Box<dyn AnyStorage>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Entities ──────────────────────────────────────────────────────────

    pub fn create_entity(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Remove `entity` and every component it holds.  Returns `false` if the
    /// entity was not alive.
    pub fn delete_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        let mut removed = 0;
        for storage in self.storages.values_mut() {
            if storage.remove_entity(entity) {
                removed += 1;
            }
        }
        log::trace!("deleted entity {entity} with {removed} component(s)");
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Attach `component` under its type key.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        self.add_component_as(entity, ComponentKey::of::<T>(), component)
    }

    /// Attach `component` under an explicit key.
    ///
    /// An entity holds at most one component per key; adding again replaces
    /// the previous value in place.
    pub fn add_component_as<T: Component>(
        &mut self,
        entity: Entity,
        key: impl Into<ComponentKey>,
        component: T,
    ) -> Result<(), EcsError> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        let key = key.into();
        let storage = self
            .storages
            .entry(key.clone())
            .or_insert_with(|| Box::new(Storage::<T>::new()));
        let stored = storage.stored_type();
        let storage = storage
            .as_any_mut()
            .downcast_mut::<Storage<T>>()
            .ok_or_else(|| EcsError::KeyTypeMismatch {
                key: key.to_string(),
                stored,
                requested: std::any::type_name::<T>(),
            })?;
        if storage.insert(entity, component).is_some() {
            log::debug!("component `{key}` on entity {entity} overwritten");
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// All `(entity, component)` pairs stored under `T`'s type key, in
    /// insertion order.
    pub fn get_component<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>(&ComponentKey::of::<T>())
            .into_iter()
            .flat_map(|s| s.iter())
    }

    pub fn get_component_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.storage_mut::<T>(&ComponentKey::of::<T>())
            .into_iter()
            .flat_map(|s| s.iter_mut())
    }

    /// Like [`get_component`](Self::get_component) for an explicit key.
    /// Unknown keys, and keys holding another type, yield nothing.
    pub fn get_component_by_key<T: Component>(
        &self,
        key: &ComponentKey,
    ) -> impl Iterator<Item = (Entity, &T)> {
        self.storage::<T>(key).into_iter().flat_map(|s| s.iter())
    }

    pub fn get_component_by_key_mut<T: Component>(
        &mut self,
        key: &ComponentKey,
    ) -> impl Iterator<Item = (Entity, &mut T)> {
        self.storage_mut::<T>(key)
            .into_iter()
            .flat_map(|s| s.iter_mut())
    }

    pub fn component_for_entity<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>(&ComponentKey::of::<T>())?.get(entity)
    }

    pub fn component_for_entity_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>(&ComponentKey::of::<T>())?
            .get_mut(entity)
    }

    pub fn component_by_key<T: Component>(&self, entity: Entity, key: &ComponentKey) -> Option<&T> {
        self.storage::<T>(key)?.get(entity)
    }

    pub fn component_by_key_mut<T: Component>(
        &mut self,
        entity: Entity,
        key: &ComponentKey,
    ) -> Option<&mut T> {
        self.storage_mut::<T>(key)?.get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.has_key(entity, &ComponentKey::of::<T>())
    }

    pub fn has_key(&self, entity: Entity, key: &ComponentKey) -> bool {
        self.storages
            .get(key)
            .is_some_and(|s| s.contains_entity(entity))
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.remove_component_by_key(entity, &ComponentKey::of::<T>())
    }

    pub fn remove_component_by_key<T: Component>(
        &mut self,
        entity: Entity,
        key: &ComponentKey,
    ) -> Option<T> {
        self.storage_mut::<T>(key)?.remove(entity)
    }

    /// Every key that currently has a storage, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.storages.keys()
    }

    /// Number of components stored under `key`.
    pub fn count(&self, key: &ComponentKey) -> usize {
        self.storages.get(key).map_or(0, |s| s.len())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn storage<T: Component>(&self, key: &ComponentKey) -> Option<&Storage<T>> {
        self.storages.get(key)?.as_any().downcast_ref::<Storage<T>>()
    }

    fn storage_mut<T: Component>(&mut self, key: &ComponentKey) -> Option<&mut Storage<T>> {
        self.storages
            .get_mut(key)?
            .as_any_mut()
            .downcast_mut::<Storage<T>>()
    }
}
