//! Entity ids and their allocator.

use std::collections::HashSet;
use std::fmt;

/// Opaque handle for a group of components.
///
/// Ids are handed out in increasing order and are never reused, so a stale
/// `Entity` can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub(crate) u64);

impl Entity {
    /// Raw numeric id.
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }

    /// Rebuild an entity from a raw id (e.g. one stored by an external
    /// collaborator).  The entity is not guaranteed to be alive.
    #[inline]
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic entity allocator.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u64,
    alive: HashSet<Entity>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id.  Deallocated ids are never handed out again.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Returns `true` if the entity was alive.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        self.alive.remove(&entity)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn count(&self) -> usize {
        self.alive.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_monotonic() {
        let mut allocator = EntityAllocator::new();
        let e1 = allocator.allocate();
        let e2 = allocator.allocate();
        assert_eq!(e1.id(), 0);
        assert_eq!(e2.id(), 1);
        assert!(allocator.is_alive(e1));
        assert_eq!(allocator.count(), 2);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut allocator = EntityAllocator::new();
        let e1 = allocator.allocate();
        assert!(allocator.deallocate(e1));
        assert!(!allocator.deallocate(e1));
        let e2 = allocator.allocate();
        assert_ne!(e1, e2);
        assert!(!allocator.is_alive(e1));
        assert_eq!(e2.id(), 1);
    }
}
