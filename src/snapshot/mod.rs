//! Point-in-time descriptions of transitions.
//!
//! Guards, actions and resolver closures cannot be serialized, but everything
//! needed to point at a misconfigured transition can: its id, target name,
//! metadata, how many guards and actions it carries and whether its target
//! was loaded. Runners include a snapshot when they fail fast on a
//! definitional error.

use crate::core::{Metadata, State};
use crate::transition::Transition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable snapshot of a transition.
/// Does NOT include guards, actions or resolver closures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Id of the transition
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Target state name, if one was set
    pub target_name: Option<String>,

    /// Metadata at the time of the snapshot
    pub metadata: Metadata,

    /// Number of registered guards
    pub guards: usize,

    /// Number of registered actions
    pub actions: usize,

    /// When the target type was loaded, if it was
    pub loaded_at: Option<DateTime<Utc>>,
}

impl TransitionSnapshot {
    /// Capture the current shape of `transition`.
    pub fn of<S: State, O>(transition: &Transition<S, O>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: transition.id(),
            taken_at: Utc::now(),
            target_name: transition.target_name().map(str::to_string),
            metadata: transition.metadata().clone(),
            guards: transition.guard_count(),
            actions: transition.action_count(),
            loaded_at: transition.loaded_at(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Parse a snapshot, rejecting versions this crate cannot read.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

impl<S: State, O> From<&Transition<S, O>> for TransitionSnapshot {
    fn from(transition: &Transition<S, O>) -> Self {
        Self::of(transition)
    }
}
