//! Boundary to the spatial region index.
//!
//! Region geometry, flag storage and priority resolution live in the host.
//! The engine only asks two questions of it and tells it when cached answers
//! have gone stale.

use std::collections::BTreeSet;

use regionward_types::{Location, RegionId, State, StateFlag};

use crate::associable::RegionAssociable;
use crate::error::IndexError;

/// Spatial region index supplied by the host.
pub trait RegionIndex: Send + Sync {
    /// Effective value of `flag` at `location` for `subject`.
    ///
    /// `None` as the subject means "no particular actor", used for
    /// environmental checks such as pistons or explosions. The index is
    /// expected to ask the subject for its association with the regions it
    /// considers and to fall back to the flag's default when no region sets
    /// it.
    fn query_state(
        &self,
        location: &Location,
        subject: Option<&dyn RegionAssociable>,
        flag: &StateFlag,
    ) -> Result<Option<State>, IndexError>;

    /// Ids of every region containing `location`, the global region
    /// excluded.
    fn regions_overlapping(&self, location: &Location) -> Result<BTreeSet<RegionId>, IndexError>;

    /// Drop any cached query results.
    fn invalidate_cache(&self) {}
}
