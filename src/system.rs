//! Per-frame iteration over archetype members.
//!
//! A system names the component kinds it needs; the runner resolves
//! that to a (memoized) archetype during an installation phase, before
//! the first per-frame update, and then visits the archetype's members
//! in insertion order every tick with the member index available for
//! position-dependent logic.

use std::sync::Arc;

use crate::entity::allocator::EntityId;
use crate::entity::archetype::Archetype;
use crate::error::Result;
use crate::world::World;

pub trait System {
    /// Component kinds the system's archetype requires. Must be
    /// non-empty and registered before the system is installed.
    fn required_components(&self) -> &[&str];

    /// Called once when the runner installs the system, with the
    /// resolved archetype. Hook for subscribing to membership events.
    fn installed(&mut self, _archetype: &Arc<Archetype>) {}

    /// Called for every member of the system's archetype on every run,
    /// in insertion order.
    fn update(&mut self, world: &World, entity: EntityId, delta_time: f64, index: usize);
}

struct InstalledSystem {
    system: Box<dyn System>,
    archetype: Arc<Archetype>,
}

/// Sequential system scheduler. Each run executes systems in
/// installation order; each system's update runs to completion before
/// the next begins.
#[derive(Default)]
pub struct SystemRunner {
    systems: Vec<InstalledSystem>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a system, resolving its archetype against the world.
    /// Fails if the system's required components are empty or contain
    /// an unregistered name; nothing is installed on failure.
    pub fn install(&mut self, world: &World, mut system: Box<dyn System>) -> Result<()> {
        let archetype = world.create_archetype(system.required_components())?;
        system.installed(&archetype);
        self.systems.push(InstalledSystem { system, archetype });
        Ok(())
    }

    /// Runs one frame: every system visits its archetype members.
    /// Iterates snapshots, so systems may mutate the world mid-frame;
    /// membership changes take effect for the next snapshot.
    pub fn run(&mut self, world: &World, delta_time: f64) {
        for entry in &mut self.systems {
            for (index, entity) in entry.archetype.members().into_iter().enumerate() {
                entry.system.update(world, entity, delta_time, index);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
