//! Error types for the `regionward-cause` crate.

use regionward_types::BlockPos;

/// Errors from the attribution store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributionError {
    /// Blocks have no per-object storage, so no parent can be recorded.
    #[error("block at {0} cannot carry attribution data")]
    BlockNotTrackable(BlockPos),

    /// The unknown sentinel has no identity to attach data to.
    #[error("cannot attach attribution data to an unknown actor")]
    UnknownTarget,
}
