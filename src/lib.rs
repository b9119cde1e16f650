//! Signature-based ECS core: a component registry that assigns each
//! kind a bit position, per-entity component maps with cached
//! signatures, and archetypes that keep signature-filtered entity
//! groups consistent under dynamic add/remove.

pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{ComponentFactory, ComponentKind, ComponentMap, ComponentRegistry, ComponentValue};
pub use config::WorldConfig;
pub use entity::{Archetype, EntityAllocator, EntityId};
pub use error::{EcsError, Result};
pub use events::{ArchetypeEvent, EventSink, WorldEvent};
pub use signature::{Signature, SignatureAllocator, MAX_COMPONENT_BITS};
pub use system::{System, SystemRunner};
pub use world::{EntityRef, World};
