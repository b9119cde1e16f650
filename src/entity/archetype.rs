//! Archetypes: cached, signature-filtered entity groups.
//!
//! An archetype holds the entities whose signature is a superset of its
//! required signature. Membership is maintained by push notification
//! from component mutations, never by polling, and is consistent the
//! moment any mutating call returns.

use parking_lot::{Mutex, RwLock};

use crate::entity::allocator::EntityId;
use crate::events::ArchetypeEvent;
use crate::signature::Signature;

type Listener = Box<dyn FnMut(ArchetypeEvent) + Send>;

pub struct Archetype {
    required: Signature,
    /// Members in insertion order. Holds ids only, never entity state.
    members: RwLock<Vec<EntityId>>,
    listeners: Mutex<Vec<Listener>>,
}

impl Archetype {
    pub(crate) fn new(required: Signature) -> Self {
        Self {
            required,
            members: RwLock::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Signature an entity must be a superset of to belong here.
    pub fn required_signature(&self) -> Signature {
        self.required
    }

    /// Snapshot of the member list, in insertion order.
    pub fn members(&self) -> Vec<EntityId> {
        self.members.read().clone()
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.read().contains(&id)
    }

    /// Visits every member with its position, for per-frame updates
    /// that need position-dependent logic. Iterates a snapshot, so a
    /// visitor may mutate the world.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(EntityId, usize),
    {
        for (index, id) in self.members().into_iter().enumerate() {
            f(id, index);
        }
    }

    /// Registers a membership-change listener.
    pub fn on_event<F>(&self, listener: F)
    where
        F: FnMut(ArchetypeEvent) + Send + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    /// Membership test after a component add. An add can only grow the
    /// signature, so this only ever admits entities: if the new
    /// signature satisfies the requirement and the entity is not yet a
    /// member it is appended and an `Added` event fires exactly once.
    pub(crate) fn evaluate_add(&self, id: EntityId, signature: Signature) {
        {
            let mut members = self.members.write();
            if !signature.contains(self.required) || members.contains(&id) {
                return;
            }
            members.push(id);
        }
        log::debug!(
            "entity {} joined archetype {:#b}",
            id,
            self.required.bits()
        );
        self.notify(ArchetypeEvent::Added(id));
    }

    /// Eviction after a component remove. A remove can only shrink the
    /// signature, so membership is revoked without re-checking the
    /// bitmask; non-members are unaffected.
    pub(crate) fn evaluate_remove(&self, id: EntityId) {
        {
            let mut members = self.members.write();
            let Some(position) = members.iter().position(|&member| member == id) else {
                return;
            };
            // Preserve insertion order for the remaining members.
            members.remove(position);
        }
        log::debug!("entity {} left archetype {:#b}", id, self.required.bits());
        self.notify(ArchetypeEvent::Removed(id));
    }

    fn notify(&self, event: ArchetypeEvent) {
        // Callbacks run with the list taken out of the lock, so a
        // listener may call back into this archetype or the world.
        // Listeners registered mid-notification are kept; the taken
        // listeners are not re-entered by events they trigger.
        let mut listeners = std::mem::take(&mut *self.listeners.lock());
        for listener in listeners.iter_mut() {
            listener(event);
        }
        let mut guard = self.listeners.lock();
        let registered_during_notify = std::mem::take(&mut *guard);
        *guard = listeners;
        guard.extend(registered_during_notify);
    }
}

impl std::fmt::Debug for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archetype")
            .field("required", &self.required)
            .field("members", &self.members.read().len())
            .finish()
    }
}
