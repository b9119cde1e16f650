pub mod allocator;
pub mod archetype;

pub use allocator::{EntityAllocator, EntityId};
pub use archetype::Archetype;
