//! Error types for schema compilation

use thiserror::Error;

/// Result type for typegen operations
pub type Result<T> = std::result::Result<T, TypegenError>;

/// Typegen errors
///
/// Compile-time variants carry the offending node as a JSON pointer
/// (`#/properties/a`) so callers can report it verbatim.
#[derive(Error, Debug)]
pub enum TypegenError {
    #[error("Unsupported type {type_name} at {reference}")]
    UnsupportedType { reference: String, type_name: String },

    #[error("Unresolved reference {target} at {reference}")]
    UnresolvedReference { reference: String, target: String },

    #[error("Dependency cycle detected at {reference}")]
    CycleDetected { reference: String },

    #[error("Malformed schema node at {reference}: expected one of `type`, `$ref` or `properties`")]
    MalformedNode { reference: String },

    #[error("Generated name {name} collides: {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid schema at JSON path {path}: {message}")]
    InvalidSchema { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl TypegenError {
    /// The JSON pointer of the node that caused a compile-time error
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::UnsupportedType { reference, .. }
            | Self::UnresolvedReference { reference, .. }
            | Self::CycleDetected { reference }
            | Self::MalformedNode { reference } => Some(reference),
            Self::NameCollision { second, .. } => Some(second),
            _ => None,
        }
    }
}
