//! The per-actor session record.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use regionward_region::{IndexError, PolicyQuery};
use regionward_types::{EntityId, Location, RegionId};
use tracing::warn;

use crate::actor::SessionActor;
use crate::handlers::Handler;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Created but no position recorded yet.
    Uninitialized,
    /// Tracking the actor.
    Active,
    /// Dropped from the registry.
    Removed,
}

/// Mutable per-actor state owned by the session manager.
pub struct Session {
    pub(crate) actor: EntityId,
    pub(crate) phase: SessionPhase,
    pub(crate) last_valid: Option<Location>,
    pub(crate) last_regions: BTreeSet<RegionId>,
    pub(crate) regions_known: bool,
    pub(crate) handlers: Vec<Box<dyn Handler>>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_seen: DateTime<Utc>,
    pub(crate) bypass_disabled: bool,
    pub(crate) profile_name: Option<String>,
}

impl Session {
    pub(crate) fn new(actor: EntityId, handlers: Vec<Box<dyn Handler>>) -> Self {
        let now = Utc::now();
        Self {
            actor,
            phase: SessionPhase::Uninitialized,
            last_valid: None,
            last_regions: BTreeSet::new(),
            regions_known: false,
            handlers,
            created_at: now,
            last_seen: now,
            bypass_disabled: false,
            profile_name: None,
        }
    }

    /// Snapshot the actor's current position and region set and let every
    /// handler initialize. No move check is performed.
    ///
    /// If the region lookup fails the set is left unknown and is retried
    /// before the next boundary crossing is judged.
    pub(crate) fn initialize(&mut self, actor: &dyn SessionActor, query: PolicyQuery<'_>) {
        let location = actor.location();
        match query.regions_overlapping(&location) {
            Ok(regions) => {
                self.last_regions = regions;
                self.regions_known = true;
            }
            Err(err) => {
                warn!(actor = %self.actor, error = %err, "region lookup failed during session initialization");
                self.mark_regions_unknown();
            }
        }
        self.last_valid = Some(location);
        for handler in &mut self.handlers {
            handler.initialize(actor, &location, query);
        }
        self.phase = SessionPhase::Active;
        self.last_seen = Utc::now();
    }

    /// Re-derive the region set at `at` unless it is already known.
    pub(crate) fn refresh_regions(
        &mut self,
        at: &Location,
        query: PolicyQuery<'_>,
    ) -> Result<(), IndexError> {
        if !self.regions_known {
            self.last_regions = query.regions_overlapping(at)?;
            self.regions_known = true;
        }
        Ok(())
    }

    /// Forget the region set, e.g. after the position moved without a lookup.
    pub(crate) fn mark_regions_unknown(&mut self) {
        self.last_regions.clear();
        self.regions_known = false;
    }

        /// The actor this session tracks.
    pub const fn actor(&self) -> EntityId {
        self.actor
    }

    /// Current phase.
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Last position the actor was allowed to occupy.
    pub const fn last_valid(&self) -> Option<Location> {
        self.last_valid
    }

    /// Regions containing the last valid position. Empty while
    /// [`regions_known`](Self::regions_known) is false.
    pub const fn last_regions(&self) -> &BTreeSet<RegionId> {
        &self.last_regions
    }

    /// Whether [`last_regions`](Self::last_regions) reflects the last valid
    /// position. False after a failed lookup until a later one succeeds.
    pub const fn regions_known(&self) -> bool {
        self.regions_known
    }

    /// When the session was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session was last initialized or ticked.
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Whether the actor switched their bypass off.
    pub const fn is_bypass_disabled(&self) -> bool {
        self.bypass_disabled
    }

    /// Name merged from the profile cache.
    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }

    /// Names of the session's handlers, in registration order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("actor", &self.actor)
            .field("phase", &self.phase)
            .field("last_valid", &self.last_valid)
            .field("last_regions", &self.last_regions)
            .field("regions_known", &self.regions_known)
            .field("handlers", &self.handler_names())
            .field("created_at", &self.created_at)
            .field("last_seen", &self.last_seen)
            .field("bypass_disabled", &self.bypass_disabled)
            .field("profile_name", &self.profile_name)
            .finish()
    }
}
