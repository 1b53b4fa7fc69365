//! Event listeners.
//!
//! Each listener reacts to one family of host events and narrows or cancels
//! them according to region policy. Listeners hold no state of their own
//! beyond what a [`ListenerContext`] lends them for the duration of a call.
//!
//! - [`RegionFlagsListener`] -- Environmental flags (pistons, mobs, explosions, fall damage)
//! - [`ProtectionListener`] -- The build flag for whoever caused a block change
//! - [`VehicleListener`] -- Vehicle moves on behalf of riding players
//! - [`ServerListener`] -- Watched host dependencies

mod protection;
mod region_flags;
mod server;
mod vehicle;

pub use protection::ProtectionListener;
pub use region_flags::RegionFlagsListener;
pub use server::ServerListener;
pub use vehicle::VehicleListener;

use regionward_region::{AssociationResolver, IdentityProvider, PolicyQuery};
use regionward_session::SessionManager;
use regionward_types::{WorldConfigs, WorldId};

/// Everything a listener may read while handling one event.
#[derive(Clone, Copy)]
pub struct ListenerContext<'a> {
    /// Per-world switches.
    pub worlds: &'a WorldConfigs,
    /// Policy checks.
    pub query: PolicyQuery<'a>,
    /// Live player lookup.
    pub identities: &'a dyn IdentityProvider,
    /// Cause to subject mapping.
    pub associations: AssociationResolver<'a>,
    /// Sessions, for bypass checks.
    pub sessions: &'a SessionManager,
}

impl ListenerContext<'_> {
    /// Whether region protection is active in `world`.
    pub fn is_region_support_enabled(&self, world: &WorldId) -> bool {
        self.worlds.get(world).use_regions
    }
}

impl core::fmt::Debug for ListenerContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerContext")
            .field("worlds", self.worlds)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
