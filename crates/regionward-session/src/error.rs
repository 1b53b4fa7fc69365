//! Error types for the `regionward-session` crate.

use regionward_types::EntityId;

/// Errors from session registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session is registered for the actor.
    #[error("no session for actor {0}")]
    NotFound(EntityId),
}
