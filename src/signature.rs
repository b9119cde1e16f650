//! Component signatures.
//!
//! Every registered component kind owns one bit position. An entity's
//! signature is the OR of the bits for every component it currently
//! carries, so "does this entity satisfy an archetype" is a single
//! mask comparison.

use crate::error::{EcsError, Result};

/// Widest signature the `u64` representation can hold.
pub const MAX_COMPONENT_BITS: usize = 64;

/// Bitmask summarizing which component kinds an entity carries.
/// Bit `n` set means "the kind assigned bit `n` is attached".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// Signature of an entity with no components.
    pub const EMPTY: Self = Self(0);

    /// Builds a signature from a raw mask.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Signature with only the given bit set.
    #[inline]
    pub const fn with_bit(bit: u8) -> Self {
        debug_assert!((bit as usize) < MAX_COMPONENT_BITS);
        Self(1 << bit)
    }

    /// Sets the bit for one component kind.
    #[inline]
    pub fn set_bit(&mut self, bit: u8) {
        debug_assert!((bit as usize) < MAX_COMPONENT_BITS);
        self.0 |= 1 << bit;
    }

    /// Clears the bit for one component kind.
    #[inline]
    pub fn clear_bit(&mut self, bit: u8) {
        debug_assert!((bit as usize) < MAX_COMPONENT_BITS);
        self.0 &= !(1 << bit);
    }

    /// Returns true if the bit for the given kind is set.
    #[inline]
    pub const fn has_bit(&self, bit: u8) -> bool {
        (self.0 & (1 << bit)) != 0
    }

    /// Superset test: true if every bit of `required` is set in `self`.
    /// This is the archetype membership predicate.
    #[inline]
    pub const fn contains(&self, required: Signature) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Raw mask value.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// True for the empty component set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Hands out bit positions for component kinds: 0, 1, 2, ... per call.
/// Bits are dense and never reused. Allocation past the configured
/// capacity fails with [`EcsError::CapacityExceeded`].
#[derive(Debug)]
pub struct SignatureAllocator {
    next: usize,
    capacity: usize,
}

impl SignatureAllocator {
    /// Allocator bounded by the full `u64` width.
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMPONENT_BITS)
    }

    /// Allocator bounded by `capacity` bits (clamped to the mask width).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next: 0,
            capacity: capacity.min(MAX_COMPONENT_BITS),
        }
    }

    /// Returns a fresh, never-before-issued bit position.
    pub fn allocate(&mut self) -> Result<u8> {
        if self.next >= self.capacity {
            return Err(EcsError::CapacityExceeded { max: self.capacity });
        }
        let bit = self.next as u8;
        self.next += 1;
        Ok(bit)
    }

    /// Number of bits handed out so far.
    pub fn allocated(&self) -> usize {
        self.next
    }

    /// Maximum number of bits this allocator will hand out.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SignatureAllocator {
    fn default() -> Self {
        Self::new()
    }
}
