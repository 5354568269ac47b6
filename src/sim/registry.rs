//! Entity registry
//!
//! Owns every non-player entity, keyed by a stable id. Systems query by kind
//! instead of entities tracking their own group memberships. Iteration is
//! always in id order, which is also spawn order.

use std::collections::BTreeMap;

use super::entity::{Background, Enemy, Entity, EntityKind, Platform, PowUp};

/// Stable entity handle, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Second phase of a query-then-remove pass
    pub fn despawn_all(&mut self, ids: impl IntoIterator<Item = EntityId>) -> usize {
        ids.into_iter()
            .filter(|id| self.entities.remove(id).is_some())
            .count()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut().map(|(id, e)| (*id, e))
    }

    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }

    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter_kind(kind).map(|(id, _)| id).collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter_kind(kind).count()
    }

    pub fn platforms(&self) -> impl Iterator<Item = (EntityId, &Platform)> {
        self.iter().filter_map(|(id, e)| match e {
            Entity::Platform(p) => Some((id, p)),
            _ => None,
        })
    }

    pub fn powups(&self) -> impl Iterator<Item = (EntityId, &PowUp)> {
        self.iter().filter_map(|(id, e)| match e {
            Entity::PowUp(p) => Some((id, p)),
            _ => None,
        })
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Enemy)> {
        self.iter().filter_map(|(id, e)| match e {
            Entity::Enemy(en) => Some((id, en)),
            _ => None,
        })
    }

    pub fn backgrounds(&self) -> impl Iterator<Item = (EntityId, &Background)> {
        self.iter().filter_map(|(id, e)| match e {
            Entity::Background(b) => Some((id, b)),
            _ => None,
        })
    }
}
