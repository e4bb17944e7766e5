//! Errors raised while writing or reading transition snapshots.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be written as JSON
    #[error("Could not encode transition snapshot: {0}")]
    Encode(String),

    /// The input is not a transition snapshot document
    #[error("Could not decode transition snapshot: {0}")]
    Decode(String),

    /// The document was written by an incompatible snapshot format
    #[error("Snapshot format {found} cannot be read (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
