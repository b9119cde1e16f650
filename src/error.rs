use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcsError {
    #[error("component name must not be empty")]
    InvalidName,

    #[error("component \"{name}\" is already registered")]
    DuplicateKind { name: String },

    #[error("component \"{name}\" is not registered")]
    UnregisteredKind { name: String },

    #[error("an archetype requires at least one component")]
    EmptyArchetype,

    #[error("component kind capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },

    #[error("entity not found: {0}")]
    EntityNotFound(u64),

    #[error("config error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, EcsError>;
