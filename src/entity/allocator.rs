//! Entity identities.
//!
//! An entity id packs a slot index and a generation counter, so slots
//! can be recycled while stale handles stay detectable: a reused slot
//! bumps the generation and the old id no longer matches.

use std::fmt;

/// Opaque entity handle.
///
/// Lower 32 bits: slot index. Upper 32 bits: generation. No two live
/// entities share an id; a despawned id never becomes valid again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Raw packed value, used in error payloads.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Arena-style entity allocator: a growing table of slots with a
/// freelist for reuse.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    slots: Vec<Slot>,
    freelist: Vec<u32>,
    live: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            freelist: Vec::new(),
            live: 0,
        }
    }

    /// Hands out a fresh id, recycling a free slot when one exists.
    pub fn allocate(&mut self) -> EntityId {
        self.live += 1;
        if let Some(index) = self.freelist.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            EntityId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                alive: true,
            });
            EntityId::new(index, 0)
        }
    }

    /// Frees an id. Returns false for a stale or unknown handle.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return false;
        };
        if !slot.alive || slot.generation != id.generation() {
            return false;
        }
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.freelist.push(id.index());
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index() as usize)
            .map(|slot| slot.alive && slot.generation == id.generation())
            .unwrap_or(false)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
