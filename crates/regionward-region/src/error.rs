//! Error types for the `regionward-region` crate.

use regionward_types::WorldId;

/// Failures reported by a region index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The index cannot answer right now (loading, backend down).
    #[error("region index unavailable: {reason}")]
    Unavailable {
        /// Human-readable description from the index.
        reason: String,
    },

    /// The index holds no regions for this world.
    #[error("regions for world {0} are not loaded")]
    WorldNotLoaded(WorldId),
}
