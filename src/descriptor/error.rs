//! Descriptor error types.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur when reading descriptors
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Input is not a valid descriptor document
    #[error("Invalid transition descriptor: {0}")]
    Parse(String),

    /// Descriptor could not be written as JSON
    #[error("Transition descriptor could not be encoded: {0}")]
    Encode(String),

    /// Descriptor parsed but could not be turned into a transition
    #[error("Transition descriptor could not be built: {0}")]
    Build(#[from] BuildError),
}
