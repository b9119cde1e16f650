pub mod map;
pub mod registry;
pub mod value;

pub use map::ComponentMap;
pub use registry::{ComponentKind, ComponentRegistry};
pub use value::{ComponentFactory, ComponentValue};
