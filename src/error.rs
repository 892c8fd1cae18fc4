//! Error types for the simulation core and the config loader

use std::fmt;

/// Which entity collection an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Planet,
    Trash,
    Ship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Planet => "planet",
            EntityKind::Trash => "trash",
            EntityKind::Ship => "ship",
        };
        f.write_str(name)
    }
}

/// Recoverable failures returned by core operations.
///
/// Only `InvalidConfiguration` is fatal, and only to universe construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("{0} capacity reached")]
    Capacity(EntityKind),
    #[error("ship '{0}' is already connected")]
    DuplicateName(char),
    #[error("no {kind} at index {index}")]
    NotFound { kind: EntityKind, index: usize },
    #[error("no ship named '{0}'")]
    UnknownShip(char),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failures while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SimError),
}
