//! Errors raised while defining or executing transitions.

use thiserror::Error;

/// Errors that can occur when wiring or using a transition.
///
/// All of these are model-definition mistakes; callers are expected to fail
/// fast and report the offending transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("No closure supplied to {registration}")]
    MissingBlock { registration: &'static str },

    #[error("Cannot set the type {slot}: target type already loaded")]
    AlreadyLoaded { slot: &'static str },

    #[error("Target type cannot be resolved: no type {missing} registered")]
    UnresolvedType { missing: &'static str },

    #[error("No target type registered under '{name}'")]
    UnknownType { name: String },

    #[error("Target type loader failed: {reason}")]
    LoadFailed { reason: String },
}
