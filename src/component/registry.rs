//! Component kind registry.
//!
//! Maps component names to their metadata (bit position, optional
//! factory) and composes signatures from name sets. Kinds are
//! append-only: registration never reuses a bit and re-registration
//! under the same name is rejected.

use std::collections::HashMap;
use std::fmt;

use crate::component::value::ComponentFactory;
use crate::error::{EcsError, Result};
use crate::signature::{Signature, SignatureAllocator};

/// Metadata for one registered component kind.
#[derive(Clone)]
pub struct ComponentKind {
    pub name: String,
    /// Bit position in entity signatures. Stable for the registry's
    /// lifetime, assigned densely from 0.
    pub bit: u8,
    pub factory: Option<ComponentFactory>,
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentKind")
            .field("name", &self.name)
            .field("bit", &self.bit)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// Name-keyed table of component kinds, owning the bit allocator.
pub struct ComponentRegistry {
    kinds: HashMap<String, ComponentKind>,
    allocator: SignatureAllocator,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            allocator: SignatureAllocator::new(),
        }
    }

    /// Registry bounded to at most `max_kinds` component kinds.
    pub fn with_capacity(max_kinds: usize) -> Self {
        Self {
            kinds: HashMap::with_capacity(max_kinds),
            allocator: SignatureAllocator::with_capacity(max_kinds),
        }
    }

    /// Registers a component kind under a unique name.
    ///
    /// Fails with `InvalidName` for an empty name, `DuplicateKind` if
    /// the name is taken, and `CapacityExceeded` once every bit of the
    /// signature is spoken for. A failed call leaves the registry
    /// unchanged.
    pub fn register(&mut self, name: &str, factory: Option<ComponentFactory>) -> Result<()> {
        if name.is_empty() {
            return Err(EcsError::InvalidName);
        }
        if self.kinds.contains_key(name) {
            return Err(EcsError::DuplicateKind {
                name: name.to_string(),
            });
        }
        let bit = self.allocator.allocate()?;
        self.kinds.insert(
            name.to_string(),
            ComponentKind {
                name: name.to_string(),
                bit,
                factory,
            },
        );
        log::debug!("registered component \"{}\" at bit {}", name, bit);
        Ok(())
    }

    /// Looks up a kind by name. Never errors.
    pub fn kind(&self, name: &str) -> Option<&ComponentKind> {
        self.kinds.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Bit position for a registered name.
    pub fn bit_of(&self, name: &str) -> Option<u8> {
        self.kinds.get(name).map(|k| k.bit)
    }

    /// Composes a signature from a set of names: OR of each name's bit.
    /// Order-insensitive; names that are not registered contribute no
    /// bit (defensive, callers normally go through the registry).
    pub fn signature_of<'a, I>(&self, names: I) -> Signature
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut signature = Signature::EMPTY;
        for name in names {
            if let Some(kind) = self.kinds.get(name) {
                signature.set_bit(kind.bit);
            }
        }
        signature
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
