//! Session registry and movement validation.
//!
//! The [`SessionManager`] owns one [`Session`] per actor and is driven from
//! the tick thread only, so sessions need no locking of their own.
//!
//! # Move validation
//!
//! 1. Bypass is checked first; a bypassing actor is never queried.
//! 2. Moves inside one block cell are accepted without consulting policy.
//! 3. Otherwise the region sets at both ends are looked up; the origin set
//!    is re-derived first if an earlier lookup failed. While either lookup
//!    fails, cancellable moves are refused.
//! 4. Every handler judges the move. A refusal of a cancellable
//!    move returns the last valid position for the caller to restore.
//! 5. Accepted boundary crossings are reported to every handler and become
//!    the new last valid position.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use regionward_region::{ActorAssociable, ActorIdentity, PolicyQuery};
use regionward_types::{EntityId, Location, MoveType, WorldConfigs, WorldId};
use tracing::{debug, info, warn};

use crate::actor::SessionActor;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::handlers::{EntryExitHandler, HandlerFactory, MoveContext};
use crate::profile::{Profile, ProfileCache};
use crate::session::{Session, SessionPhase};
use crate::vehicle::{PassengerCorrection, VehicleMove, VehicleVerdict};

/// Registry of per-actor sessions.
pub struct SessionManager {
    config: SessionConfig,
    worlds: WorldConfigs,
    sessions: HashMap<EntityId, Session>,
    factories: Vec<HandlerFactory>,
    profiles: ProfileCache,
}

impl SessionManager {
    /// Create a manager with the entry/exit handler registered.
    pub fn new(config: SessionConfig, worlds: WorldConfigs) -> Self {
        Self {
            config,
            worlds,
            sessions: HashMap::new(),
            factories: vec![EntryExitHandler::factory()],
            profiles: ProfileCache::new(),
        }
    }

    /// Register an additional handler. Sessions created afterwards get an
    /// instance of it.
    pub fn register_handler(&mut self, factory: HandlerFactory) {
        self.factories.push(factory);
    }

    /// The session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Per-world switches.
    pub const fn worlds(&self) -> &WorldConfigs {
        &self.worlds
    }

    /// The profile cache fed by [`initialize`](Self::initialize).
    pub const fn profiles(&self) -> &ProfileCache {
        &self.profiles
    }

    /// The session of `id`, if any.
    pub fn get(&self, id: EntityId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Create or re-initialize the session of `actor` at its current
    /// position, and queue its profile for caching.
    pub fn initialize(&mut self, actor: &dyn SessionActor, query: PolicyQuery<'_>) {
        let id = actor.id();
        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| Session::new(id, self.factories.iter().map(|f| f()).collect()));
        session.initialize(actor, query);
        info!(actor = %id, name = actor.name(), "session initialized");

        // Detached; the insert completes on its own.
        self.profiles.submit(Profile {
            id,
            name: String::from(actor.name()),
        });
    }

    /// Tick the sessions of every online actor.
    pub fn tick(&mut self, online: &[&dyn SessionActor], query: PolicyQuery<'_>) {
        let now = Utc::now();
        for actor in online {
            if !actor.is_online() {
                continue;
            }
            let session = ensure_active(&mut self.sessions, &self.factories, *actor, query);
            if let Some(name) = self.profiles.name(actor.id()) {
                session.profile_name = Some(name);
            }
            session.last_seen = now;
            for handler in &mut session.handlers {
                handler.tick(*actor, query);
            }
        }
    }

    /// Re-synchronize the existing sessions of every online actor, e.g.
    /// after a global policy change.
    pub fn reset_all(&mut self, online: &[&dyn SessionActor], query: PolicyQuery<'_>) {
        let mut reset = 0_usize;
        for actor in online {
            if !actor.is_online() {
                continue;
            }
            if let Some(session) = self.sessions.get_mut(&actor.id()) {
                session.initialize(*actor, query);
                reset = reset.saturating_add(1);
            }
        }
        info!(reset, "sessions reset");
    }

    /// Drop the session of a disconnecting actor.
    pub fn remove(&mut self, id: EntityId) -> Result<Session, SessionError> {
        let mut session = self
            .sessions
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        session.phase = SessionPhase::Removed;
        debug!(actor = %id, "session removed");
        Ok(session)
    }

    /// Drop sessions not touched within the configured expiry. Returns how
    /// many were dropped.
    pub fn expire_stale(&mut self, now: DateTime<Utc>) -> usize {
        let expiry = i64::try_from(self.config.expiry_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.signed_duration_since(session.last_seen) <= expiry);
        let dropped = before.saturating_sub(self.sessions.len());
        if dropped > 0 {
            info!(dropped, "expired stale sessions");
        }
        dropped
    }

    // -----------------------------------------------------------------------
    // Bypass
    // -----------------------------------------------------------------------

    /// Whether `identity` bypasses protection in `world`.
    pub fn has_bypass<I: ActorIdentity + ?Sized>(&self, identity: &I, world: &WorldId) -> bool {
        if identity.is_fake_player() && self.worlds.get(world).fake_player_build_override {
            return true;
        }
        if self
            .sessions
            .get(&identity.id())
            .is_some_and(|session| session.bypass_disabled)
        {
            return false;
        }
        identity.has_permission(&self.config.bypass_permission(world))
    }

    /// Switch an actor's bypass off (or back on) without touching their
    /// permissions.
    pub fn set_bypass_disabled(&mut self, id: EntityId, disabled: bool) -> Result<(), SessionError> {
        let session = self.sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.bypass_disabled = disabled;
        debug!(actor = %id, disabled, "bypass toggled");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Validate a move of `actor` to `to`.
    ///
    /// Returns `None` when the move is accepted, or the position to put the
    /// actor back at when it is refused.
    pub fn test_move_to(
        &mut self,
        actor: &dyn SessionActor,
        to: Location,
        move_type: MoveType,
        query: PolicyQuery<'_>,
    ) -> Option<Location> {
        let id = actor.id();
        if self.has_bypass(actor, &to.world) {
            let session = self
                .sessions
                .entry(id)
                .or_insert_with(|| Session::new(id, self.factories.iter().map(|f| f()).collect()));
            session.last_valid = Some(to);
            session.mark_regions_unknown();
            return None;
        }

        let session = ensure_active(&mut self.sessions, &self.factories, actor, query);
        let Some(from) = session.last_valid else {
            session.last_valid = Some(to);
            return None;
        };

        if !from.is_different_block(&to) {
            session.last_valid = Some(to);
            return None;
        }

        let lookup = session
            .refresh_regions(&from, query)
            .and_then(|()| query.regions_overlapping(&to));
        let to_regions = match lookup {
            Ok(regions) => regions,
            Err(err) => {
                warn!(actor = %id, to = %to, error = %err, "region lookup failed, refusing move");
                if move_type.is_cancellable() {
                    return Some(from);
                }
                session.last_valid = Some(to);
                session.mark_regions_unknown();
                return None;
            }
        };

        let subject = ActorAssociable(actor);
        let ctx = MoveContext {
            actor,
            associable: &subject,
            from,
            to,
            from_regions: &session.last_regions,
            to_regions: &to_regions,
            move_type,
            query,
        };

        let mut allowed = true;
        for handler in &mut session.handlers {
            if !handler.test_move_to(&ctx) {
                debug!(actor = %id, handler = handler.name(), ?move_type, "move refused");
                allowed = false;
                break;
            }
        }

        if !allowed && move_type.is_cancellable() {
            return Some(from);
        }

        for handler in &mut session.handlers {
            handler.on_cross_boundary(&ctx);
        }
        session.last_valid = Some(to);
        session.last_regions = to_regions;
        None
    }

    /// Validate a vehicle move on behalf of its passengers.
    pub fn test_vehicle_move(
        &mut self,
        movement: &VehicleMove,
        passengers: &[&dyn SessionActor],
        query: PolicyQuery<'_>,
    ) -> VehicleVerdict {
        if passengers.is_empty()
            || !self.worlds.get(&movement.from.world).use_regions
            || !movement.from.is_different_block(&movement.to)
        {
            return VehicleVerdict::Allowed;
        }

        for passenger in passengers {
            let Some(last_valid) = self.test_move_to(*passenger, movement.to, MoveType::Ride, query)
            else {
                continue;
            };
            let correction = last_valid.is_different_block(&movement.from).then(|| {
                let facing = passenger.location();
                PassengerCorrection {
                    actor: passenger.id(),
                    to: last_valid.with_direction(facing.yaw, facing.pitch),
                }
            });
            debug!(
                vehicle = %movement.vehicle,
                passenger = %passenger.id(),
                corrected = correction.is_some(),
                "vehicle move refused"
            );
            return VehicleVerdict::Rejected {
                vehicle: movement.vehicle,
                rollback: movement.from,
                passenger: correction,
            };
        }
        VehicleVerdict::Allowed
    }
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("sessions", &self.sessions.len())
            .field("handlers", &self.factories.len())
            .finish_non_exhaustive()
    }
}

/// The active session of `actor`, created and initialized if needed.
fn ensure_active<'s>(
    sessions: &'s mut HashMap<EntityId, Session>,
    factories: &[HandlerFactory],
    actor: &dyn SessionActor,
    query: PolicyQuery<'_>,
) -> &'s mut Session {
    let id = actor.id();
    let session = sessions
        .entry(id)
        .or_insert_with(|| Session::new(id, factories.iter().map(|f| f()).collect()));
    if session.phase != SessionPhase::Active {
        session.initialize(actor, query);
    }
    session
}
