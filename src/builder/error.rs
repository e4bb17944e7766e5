//! Build errors for transition builders.

use crate::transition::TransitionError;
use thiserror::Error;

/// Errors that can occur when building transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Target name is empty. Pass a registered state name to .target(name)")]
    EmptyTargetName,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
