//! Boolean policy checks over the region index.
//!
//! Listeners never see index errors. [`PolicyQuery::test_state`] turns every
//! answer into allow or deny, and when the index cannot answer it falls back
//! to the flag category's verdict: world-changing and movement flags deny,
//! cosmetic flags allow.

use std::collections::BTreeSet;

use regionward_types::{Location, RegionId, State, StateFlag, flags};
use tracing::{debug, warn};

use crate::associable::RegionAssociable;
use crate::error::IndexError;
use crate::index::RegionIndex;

/// Read-only query facade.
#[derive(Clone, Copy)]
pub struct PolicyQuery<'a> {
    index: &'a dyn RegionIndex,
}

impl<'a> PolicyQuery<'a> {
    /// Wrap an index.
    pub const fn new(index: &'a dyn RegionIndex) -> Self {
        Self { index }
    }

    /// The wrapped index.
    pub const fn index(&self) -> &'a dyn RegionIndex {
        self.index
    }

    /// Whether `flag` allows the action at `location` for `subject`.
    pub fn test_state(
        &self,
        location: &Location,
        subject: Option<&dyn RegionAssociable>,
        flag: &StateFlag,
    ) -> bool {
        match self.index.query_state(location, subject, flag) {
            Ok(state) => {
                let allowed = state == Some(State::Allow);
                debug!(flag = flag.name, location = %location, allowed, "state query");
                allowed
            }
            Err(err) => {
                let verdict = flag.category.fail_verdict();
                warn!(
                    flag = flag.name,
                    location = %location,
                    error = %err,
                    verdict,
                    "region index unavailable, using category verdict"
                );
                verdict
            }
        }
    }

    /// Whether `subject` may build at `location`.
    pub fn test_build(&self, location: &Location, subject: &dyn RegionAssociable) -> bool {
        self.test_state(location, Some(subject), &flags::BUILD)
    }

    /// Ids of the regions containing `location`.
    pub fn regions_overlapping(
        &self,
        location: &Location,
    ) -> Result<BTreeSet<RegionId>, IndexError> {
        self.index.regions_overlapping(location)
    }

    /// Per-location check of `flag` with no particular actor, for listeners
    /// that filter a set of affected locations.
    pub fn state_predicate(&self, flag: StateFlag) -> impl Fn(&Location) -> bool + '_ {
        move |location| self.test_state(location, None, &flag)
    }
}

impl core::fmt::Debug for PolicyQuery<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolicyQuery").finish_non_exhaustive()
    }
}
