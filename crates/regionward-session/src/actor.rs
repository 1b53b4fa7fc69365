//! The live actor a session belongs to.

use regionward_region::ActorIdentity;
use regionward_types::Location;

/// A connected actor as seen by the session layer.
pub trait SessionActor: ActorIdentity {
    /// Current position and look direction.
    fn location(&self) -> Location;

    /// Whether the actor is still connected. Offline actors are skipped by
    /// ticks and resets.
    fn is_online(&self) -> bool {
        true
    }
}
