//! Context registration errors.

use thiserror::Error;

/// Errors that can occur when creating or registering contexts
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContextError {
    #[error("Context name must not be empty")]
    EmptyName,

    #[error("Expected a map of names to contexts ({expected})")]
    TypeMismatch { expected: &'static str },

    #[error("Values registered under {keys:?} are not contexts")]
    InvalidContext { keys: Vec<String> },
}
