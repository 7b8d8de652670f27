//! Error types for scene operations

use thiserror::Error;

use crate::types::PrefabId;

/// Errors raised by scene construction operations.
///
/// Runtime lookups deliberately return `Option` instead of erroring: a missing
/// or despawned object is an ordinary state the caller degrades from.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no prefab registered for {0:?}")]
    UnknownPrefab(PrefabId),
}
