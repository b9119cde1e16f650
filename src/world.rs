//! World facade.
//!
//! Owns the component registry, the entity store and the memoized
//! archetype table, and mediates every mutation so archetype membership
//! and the host notification sink stay consistent synchronously: each
//! operation runs to completion before it returns, with no deferred
//! consistency window.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::component::map::ComponentMap;
use crate::component::registry::ComponentRegistry;
use crate::component::value::{ComponentFactory, ComponentValue};
use crate::config::WorldConfig;
use crate::entity::allocator::{EntityAllocator, EntityId};
use crate::entity::archetype::Archetype;
use crate::error::{EcsError, Result};
use crate::events::{EventSink, WorldEvent};
use crate::signature::Signature;

struct EntityStore {
    allocator: EntityAllocator,
    maps: HashMap<EntityId, ComponentMap>,
}

pub struct World {
    registry: RwLock<ComponentRegistry>,
    entities: RwLock<EntityStore>,
    /// Archetypes memoized by required-signature value; one cached
    /// instance per signature, never removed.
    archetypes: DashMap<u64, Arc<Archetype>>,
    sink: Mutex<Option<EventSink>>,
    config: WorldConfig,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            registry: RwLock::new(ComponentRegistry::with_capacity(config.max_component_kinds)),
            entities: RwLock::new(EntityStore {
                allocator: EntityAllocator::with_capacity(config.initial_entity_capacity),
                maps: HashMap::with_capacity(config.initial_entity_capacity),
            }),
            archetypes: DashMap::new(),
            sink: Mutex::new(None),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Installs the host notification sink. At most one sink is held;
    /// installing replaces the previous one.
    pub fn set_event_sink<F>(&self, sink: F)
    where
        F: FnMut(WorldEvent) + Send + 'static,
    {
        *self.sink.lock() = Some(Box::new(sink));
    }

    pub fn clear_event_sink(&self) {
        *self.sink.lock() = None;
    }

    fn emit(&self, event: WorldEvent) {
        // The sink is taken out of the lock for the call, so it may
        // mutate the world. Events a mutating sink triggers are not
        // redelivered to it while it runs.
        let Some(mut sink) = self.sink.lock().take() else {
            return;
        };
        sink(event);
        let mut guard = self.sink.lock();
        if guard.is_none() {
            *guard = Some(sink);
        }
    }

    /// Snapshot of the live archetypes, taken so that membership
    /// callbacks never run while a `DashMap` shard is locked.
    fn archetype_snapshot(&self) -> Vec<Arc<Archetype>> {
        self.archetypes
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    // ---- component kinds -------------------------------------------------

    /// Registers a component kind, optionally with a factory applied to
    /// the initial value on every add.
    pub fn register_component(&self, name: &str, factory: Option<ComponentFactory>) -> Result<()> {
        self.registry.write().register(name, factory)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.read().is_registered(name)
    }

    /// Number of registered component kinds.
    pub fn kind_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Composes a signature from component names. Pure function of the
    /// current registrations; unknown names are skipped.
    pub fn signature_of<'a, I>(&self, names: I) -> Signature
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.registry.read().signature_of(names)
    }

    // ---- archetypes ------------------------------------------------------

    /// Returns the archetype for the given required component set,
    /// creating it with empty membership on first request. Archetypes
    /// are identity-deduplicated by signature: the same (possibly
    /// reordered) names always return the same `Arc`.
    pub fn create_archetype(&self, names: &[&str]) -> Result<Arc<Archetype>> {
        if names.is_empty() {
            return Err(EcsError::EmptyArchetype);
        }
        let required = {
            let registry = self.registry.read();
            for name in names {
                if !registry.is_registered(name) {
                    return Err(EcsError::UnregisteredKind {
                        name: (*name).to_string(),
                    });
                }
            }
            registry.signature_of(names.iter().copied())
        };
        let archetype = self
            .archetypes
            .entry(required.bits())
            .or_insert_with(|| {
                log::debug!("created archetype with signature {:#b}", required.bits());
                Arc::new(Archetype::new(required))
            })
            .clone();
        Ok(archetype)
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    // ---- entities --------------------------------------------------------

    /// Creates an entity with an empty component map.
    pub fn spawn(&self) -> EntityId {
        let id = {
            let mut store = self.entities.write();
            let id = store.allocator.allocate();
            store.maps.insert(id, ComponentMap::new());
            id
        };
        self.emit(WorldEvent::EntityAdded(id));
        id
    }

    /// Destroys an entity: detaches every component (which evicts it
    /// from all archetypes) and then frees the slot.
    pub fn despawn(&self, id: EntityId) -> Result<()> {
        self.destroy_components(id)?;
        {
            let mut store = self.entities.write();
            if !store.allocator.deallocate(id) {
                return Err(EcsError::EntityNotFound(id.raw()));
            }
            store.maps.remove(&id);
        }
        self.emit(WorldEvent::EntityRemoved(id));
        Ok(())
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.read().allocator.is_alive(id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.read().allocator.len()
    }

    /// Per-entity handle over the component map.
    pub fn entity(&self, id: EntityId) -> EntityRef<'_> {
        EntityRef { world: self, id }
    }

    // ---- component mutation ----------------------------------------------

    /// Attaches a component to an entity. Re-adding an attached name is
    /// a soft no-op: the original value is preserved and nothing is
    /// notified. Otherwise the map is updated, the signature recomputed
    /// and every live archetype re-tests the entity before this call
    /// returns.
    pub fn add_component(
        &self,
        id: EntityId,
        name: &str,
        value: impl Into<ComponentValue>,
    ) -> Result<()> {
        let signature = {
            let registry = self.registry.read();
            let mut store = self.entities.write();
            let map = store
                .maps
                .get_mut(&id)
                .ok_or(EcsError::EntityNotFound(id.raw()))?;
            if !map.attach(&registry, name, value.into()) {
                if self.config.warn_on_duplicate_add {
                    log::warn!(
                        "component \"{}\" already attached to entity {}; keeping existing value",
                        name,
                        id
                    );
                }
                return Ok(());
            }
            map.signature()
        };

        // An add never shrinks the signature, so archetypes can only
        // gain this entity here.
        for archetype in self.archetype_snapshot() {
            archetype.evaluate_add(id, signature);
        }
        self.emit(WorldEvent::ComponentAdded {
            entity: id,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Detaches a component. Returns `Ok(false)` when the name is not
    /// attached. On success every archetype drops the entity from
    /// membership if present; a remove only shrinks the signature, so
    /// no archetype re-checks the bitmask.
    pub fn remove_component(&self, id: EntityId, name: &str) -> Result<bool> {
        let removed = {
            let registry = self.registry.read();
            let mut store = self.entities.write();
            let map = store
                .maps
                .get_mut(&id)
                .ok_or(EcsError::EntityNotFound(id.raw()))?;
            map.detach(&registry, name)
        };
        if !removed {
            return Ok(false);
        }

        for archetype in self.archetype_snapshot() {
            archetype.evaluate_remove(id);
        }
        self.emit(WorldEvent::ComponentRemoved {
            entity: id,
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Removes every attached component, iterating a snapshot of the
    /// attached names. Idempotent: a bare entity stays at signature 0.
    pub fn destroy_components(&self, id: EntityId) -> Result<()> {
        let names: Vec<String> = {
            let store = self.entities.read();
            store
                .maps
                .get(&id)
                .ok_or(EcsError::EntityNotFound(id.raw()))?
                .names()
                .to_vec()
        };
        for name in names {
            self.remove_component(id, &name)?;
        }
        Ok(())
    }

    // ---- component access ------------------------------------------------

    pub fn has_component(&self, id: EntityId, name: &str) -> bool {
        self.entities
            .read()
            .maps
            .get(&id)
            .map(|map| map.contains(name))
            .unwrap_or(false)
    }

    pub fn get_component(&self, id: EntityId, name: &str) -> Option<ComponentValue> {
        self.entities
            .read()
            .maps
            .get(&id)
            .and_then(|map| map.get(name).cloned())
    }

    /// Attached component names in insertion order.
    pub fn component_names(&self, id: EntityId) -> Result<Vec<String>> {
        let store = self.entities.read();
        let map = store
            .maps
            .get(&id)
            .ok_or(EcsError::EntityNotFound(id.raw()))?;
        Ok(map.names().to_vec())
    }

    /// Current signature of an entity.
    pub fn signature(&self, id: EntityId) -> Result<Signature> {
        let store = self.entities.read();
        let map = store
            .maps
            .get(&id)
            .ok_or(EcsError::EntityNotFound(id.raw()))?;
        Ok(map.signature())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow-style handle pairing a world with one entity, so callers can
/// attach and detach typed data without tracking indices themselves.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    world: &'a World,
    id: EntityId,
}

impl<'a> EntityRef<'a> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn add(&self, name: &str, value: impl Into<ComponentValue>) -> Result<()> {
        self.world.add_component(self.id, name, value)
    }

    pub fn remove(&self, name: &str) -> Result<bool> {
        self.world.remove_component(self.id, name)
    }

    /// Removes every attached component.
    pub fn destroy(&self) -> Result<()> {
        self.world.destroy_components(self.id)
    }

    pub fn get(&self, name: &str) -> Option<ComponentValue> {
        self.world.get_component(self.id, name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.world.has_component(self.id, name)
    }

    pub fn names(&self) -> Result<Vec<String>> {
        self.world.component_names(self.id)
    }

    pub fn signature(&self) -> Result<Signature> {
        self.world.signature(self.id)
    }

    pub fn is_alive(&self) -> bool {
        self.world.is_alive(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let world = World::new();
        world.register_component("position", None).unwrap();
        world.register_component("velocity", None).unwrap();
        world
    }

    #[test]
    fn test_spawn_starts_empty() {
        let world = world();
        let id = world.spawn();
        assert!(world.is_alive(id));
        assert_eq!(world.signature(id).unwrap(), Signature::EMPTY);
        assert!(world.component_names(id).unwrap().is_empty());
    }

    #[test]
    fn test_add_updates_archetype_membership() {
        let world = world();
        let archetype = world.create_archetype(&["position", "velocity"]).unwrap();
        assert_eq!(archetype.required_signature().bits(), 0b11);

        let id = world.spawn();
        world.add_component(id, "position", 1.0).unwrap();
        assert!(archetype.is_empty());

        world.add_component(id, "velocity", 2.0).unwrap();
        assert_eq!(archetype.members(), vec![id]);
        assert_eq!(world.signature(id).unwrap().bits(), 0b11);
    }

    #[test]
    fn test_remove_evicts_membership() {
        let world = world();
        let archetype = world.create_archetype(&["position", "velocity"]).unwrap();
        let id = world.spawn();
        world.add_component(id, "position", ()).unwrap();
        world.add_component(id, "velocity", ()).unwrap();
        assert!(archetype.contains(id));

        assert!(world.remove_component(id, "position").unwrap());
        assert!(!archetype.contains(id));
        assert_eq!(world.signature(id).unwrap().bits(), 0b10);
    }

    #[test]
    fn test_remove_unattached_is_noop() {
        let world = world();
        let id = world.spawn();
        assert!(!world.remove_component(id, "position").unwrap());
    }

    #[test]
    fn test_duplicate_add_preserves_value_and_membership() {
        let world = world();
        let archetype = world.create_archetype(&["position"]).unwrap();
        let id = world.spawn();
        world.add_component(id, "position", 10).unwrap();
        world.add_component(id, "position", 99).unwrap();

        assert_eq!(
            world.get_component(id, "position"),
            Some(ComponentValue::Int(10))
        );
        assert_eq!(archetype.members(), vec![id]);
    }

    #[test]
    fn test_archetype_memoized_by_signature() {
        let world = world();
        let a = world.create_archetype(&["position", "velocity"]).unwrap();
        let b = world.create_archetype(&["velocity", "position"]).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(world.archetype_count(), 1);
    }

    #[test]
    fn test_create_archetype_errors() {
        let world = world();
        assert!(matches!(
            world.create_archetype(&[]),
            Err(EcsError::EmptyArchetype)
        ));
        match world.create_archetype(&["position", "ghost"]) {
            Err(EcsError::UnregisteredKind { name }) => assert_eq!(name, "ghost"),
            other => panic!("expected UnregisteredKind, got {:?}", other),
        }
        // Fail fast: no archetype was constructed.
        assert_eq!(world.archetype_count(), 0);
    }

    #[test]
    fn test_despawn_rejects_stale_id() {
        let world = world();
        let id = world.spawn();
        world.despawn(id).unwrap();
        assert!(!world.is_alive(id));
        assert!(matches!(
            world.despawn(id),
            Err(EcsError::EntityNotFound(_))
        ));
        assert!(matches!(
            world.add_component(id, "position", ()),
            Err(EcsError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_despawn_evicts_from_archetypes() {
        let world = world();
        let archetype = world.create_archetype(&["position"]).unwrap();
        let id = world.spawn();
        world.add_component(id, "position", ()).unwrap();
        assert!(archetype.contains(id));

        world.despawn(id).unwrap();
        assert!(archetype.is_empty());
    }

    #[test]
    fn test_destroy_components_is_idempotent() {
        let world = world();
        let id = world.spawn();
        world.destroy_components(id).unwrap();
        world.destroy_components(id).unwrap();
        assert_eq!(world.signature(id).unwrap(), Signature::EMPTY);
    }

    #[test]
    fn test_entity_ref_roundtrip() {
        let world = world();
        let id = world.spawn();
        let entity = world.entity(id);
        entity.add("position", 3.5).unwrap();
        assert!(entity.has("position"));
        assert_eq!(entity.get("position"), Some(ComponentValue::Float(3.5)));
        assert_eq!(entity.names().unwrap(), vec!["position".to_string()]);

        entity.destroy().unwrap();
        assert!(!entity.has("position"));
        assert_eq!(entity.signature().unwrap(), Signature::EMPTY);
    }

    #[test]
    fn test_event_sink_sequence() {
        use std::sync::{Arc as StdArc, Mutex as StdMutex};

        let world = world();
        let events: StdArc<StdMutex<Vec<WorldEvent>>> = StdArc::default();
        let log = events.clone();
        world.set_event_sink(move |event| log.lock().unwrap().push(event));

        let id = world.spawn();
        world.add_component(id, "position", ()).unwrap();
        world.remove_component(id, "position").unwrap();
        world.despawn(id).unwrap();

        let seen = events.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                WorldEvent::EntityAdded(id),
                WorldEvent::ComponentAdded {
                    entity: id,
                    name: "position".to_string()
                },
                WorldEvent::ComponentRemoved {
                    entity: id,
                    name: "position".to_string()
                },
                WorldEvent::EntityRemoved(id),
            ]
        );
    }

    #[test]
    fn test_archetype_listener_may_mutate_world() {
        use crate::events::ArchetypeEvent;

        let world = Arc::new(world());
        let archetype = world.create_archetype(&["position"]).unwrap();
        let leader = world.spawn();
        let follower = world.spawn();

        let chained = world.clone();
        archetype.on_event(move |event| {
            if event == ArchetypeEvent::Added(leader) {
                chained.add_component(follower, "position", ()).unwrap();
            }
        });

        // Must return, with the chained mutation applied synchronously.
        world.add_component(leader, "position", ()).unwrap();
        assert!(world.has_component(follower, "position"));
        assert_eq!(archetype.members(), vec![leader, follower]);
    }

    #[test]
    fn test_event_sink_may_mutate_world() {
        let world = Arc::new(world());
        let chained = world.clone();
        world.set_event_sink(move |event| {
            if let WorldEvent::ComponentAdded { entity, name } = event {
                if name == "position" {
                    chained.add_component(entity, "velocity", ()).unwrap();
                }
            }
        });

        let id = world.spawn();
        world.add_component(id, "position", ()).unwrap();
        assert!(world.has_component(id, "velocity"));
        assert_eq!(world.signature(id).unwrap().bits(), 0b11);
    }

    #[test]
    fn test_slot_reuse_keeps_ids_distinct() {
        let world = world();
        let first = world.spawn();
        world.despawn(first).unwrap();
        let second = world.spawn();
        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(!world.is_alive(first));
        assert!(world.is_alive(second));
    }
}
