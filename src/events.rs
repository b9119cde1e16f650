//! Notifications pushed out of the core on every mutation.
//!
//! The hosting application may supply one world-level sink; absence is
//! tolerated. Archetypes additionally hold their own listener lists for
//! downstream systems (e.g. a rendering pass reacting to "entity now
//! visible to this archetype"). All delivery is synchronous, after the
//! core state is already consistent.

use crate::entity::allocator::EntityId;

/// Membership change on one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchetypeEvent {
    Added(EntityId),
    Removed(EntityId),
}

/// World-level notification for external observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    EntityAdded(EntityId),
    EntityRemoved(EntityId),
    ComponentAdded { entity: EntityId, name: String },
    ComponentRemoved { entity: EntityId, name: String },
}

/// Host-supplied notification sink.
pub type EventSink = Box<dyn FnMut(WorldEvent) + Send>;
