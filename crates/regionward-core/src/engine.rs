//! The engine the host drives.
//!
//! [`GuardEngine`] owns the configuration, the attribution side table and
//! the session registry, and borrows the host's region index and world view
//! through [`HostServices`]. Every entry point runs on the host's tick
//! thread; the engine itself is not shared between threads.

use std::sync::Arc;

use chrono::Utc;
use regionward_cause::{ActorGraph, ActorRef, AttributionStore, Cause, CauseResolver};
use regionward_region::{
    Associable, AssociationResolver, EntityLocator, IdentityProvider, PolicyQuery, RegionIndex,
};
use regionward_session::{
    HandlerFactory, Session, SessionActor, SessionManager, VehicleMove, VehicleVerdict,
};
use regionward_types::{Location, MoveType};
use tracing::{debug, info, trace};

use crate::config::GuardConfig;
use crate::event::{BlockChange, BlockChangeEvent, DamageEvent};
use crate::listener::{
    ListenerContext, ProtectionListener, RegionFlagsListener, ServerListener, VehicleListener,
};
use crate::schedule::TickSchedule;

/// What the host provides.
pub struct HostServices {
    /// Spatial region index and flag resolution.
    pub index: Arc<dyn RegionIndex>,
    /// Shooter, passenger and owner links between entities.
    pub graph: Arc<dyn ActorGraph>,
    /// Player identity lookup.
    pub identities: Arc<dyn IdentityProvider>,
    /// Entity position lookup.
    pub locator: Arc<dyn EntityLocator>,
}

impl core::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}

/// Access-control engine.
pub struct GuardEngine {
    config: GuardConfig,
    host: HostServices,
    attributions: AttributionStore,
    sessions: SessionManager,
    server: ServerListener,
    session_schedule: TickSchedule,
    cache_schedule: TickSchedule,
    tick: u64,
}

impl GuardEngine {
    /// Build an engine from configuration and host services.
    pub fn new(config: GuardConfig, host: HostServices) -> Self {
        let sessions = SessionManager::new(config.session.clone(), config.worlds.clone());
        let server = ServerListener::new(config.watched_dependencies.clone());
        let session_schedule = TickSchedule::every(config.session.tick_interval_ticks);
        let cache_schedule = TickSchedule::every(config.regions.cache_invalidation_ticks);
        info!(
            session_tick_interval = session_schedule.interval(),
            cache_invalidation_interval = cache_schedule.interval(),
            watched = ?config.watched_dependencies,
            "guard engine created"
        );
        Self {
            config,
            host,
            attributions: AttributionStore::new(),
            sessions,
            server,
            session_schedule,
            cache_schedule,
            tick: 0,
        }
    }

    /// The configuration the engine was built with.
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Manually recorded provenance.
    pub const fn attributions(&self) -> &AttributionStore {
        &self.attributions
    }

    /// The session registry.
    pub const fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Mutable access to the session registry, e.g. to toggle bypass.
    pub const fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Dependency state.
    pub const fn server(&self) -> &ServerListener {
        &self.server
    }

    /// Add a session handler for sessions created from now on.
    pub fn register_handler(&mut self, factory: HandlerFactory) {
        self.sessions.register_handler(factory);
    }

    /// Server ticks seen so far.
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Policy checks against the host index.
    pub fn query(&self) -> PolicyQuery<'_> {
        PolicyQuery::new(self.host.index.as_ref())
    }

    /// Work out who is responsible for an event triggered by `triggers`.
    pub fn resolve_cause<I>(&self, triggers: I) -> Cause
    where
        I: IntoIterator<Item = ActorRef>,
    {
        CauseResolver::new(self.host.graph.as_ref(), &self.attributions).resolve(triggers)
    }

    /// The subject `cause` is evaluated as.
    pub fn associate(&self, cause: &Cause) -> Associable<'_> {
        self.associations().associate(cause)
    }

    fn associations(&self) -> AssociationResolver<'_> {
        AssociationResolver::new(
            self.host.index.as_ref(),
            self.host.identities.as_ref(),
            self.host.locator.as_ref(),
            &self.config.worlds,
        )
    }

    fn listener_context(&self) -> ListenerContext<'_> {
        ListenerContext {
            worlds: &self.config.worlds,
            query: self.query(),
            identities: self.host.identities.as_ref(),
            associations: self.associations(),
            sessions: &self.sessions,
        }
    }

    // -----------------------------------------------------------------------
    // World events
    // -----------------------------------------------------------------------

    /// Apply environmental flags, then the build flag, to a block change.
    pub fn on_block_change(&self, event: &mut BlockChangeEvent) {
        let ctx = self.listener_context();
        let flags = RegionFlagsListener::new(ctx);
        match event.change() {
            BlockChange::Place => flags.on_place_block(event),
            BlockChange::Break => flags.on_break_block(event),
        }
        ProtectionListener::new(ctx).on_change_block(event);
    }

    /// Apply the fall-damage flag.
    pub fn on_entity_damage(&self, event: &mut DamageEvent) {
        RegionFlagsListener::new(self.listener_context()).on_entity_damage(event);
    }

    // -----------------------------------------------------------------------
    // Actors
    // -----------------------------------------------------------------------

    /// A player connected.
    pub fn on_actor_join(&mut self, actor: &dyn SessionActor) {
        let query = PolicyQuery::new(self.host.index.as_ref());
        self.sessions.initialize(actor, query);
    }

    /// A player disconnected. Drops their session and any provenance
    /// recorded against them.
    pub fn on_actor_quit(&mut self, actor: &dyn SessionActor) -> Option<Session> {
        self.attributions
            .remove_all(&ActorRef::player(actor.id(), actor.name()));
        match self.sessions.remove(actor.id()) {
            Ok(session) => Some(session),
            Err(err) => {
                debug!(actor = %actor.id(), error = %err, "quit without a session");
                None
            }
        }
    }

    /// A player moving. Returns where to put them back if the move is
    /// refused.
    pub fn on_actor_move(
        &mut self,
        actor: &dyn SessionActor,
        to: Location,
        move_type: MoveType,
    ) -> Option<Location> {
        let query = PolicyQuery::new(self.host.index.as_ref());
        self.sessions.test_move_to(actor, to, move_type, query)
    }

    /// A vehicle moving with `passengers` (players only) aboard.
    pub fn on_vehicle_move(
        &mut self,
        movement: &VehicleMove,
        passengers: &[&dyn SessionActor],
    ) -> VehicleVerdict {
        let query = PolicyQuery::new(self.host.index.as_ref());
        VehicleListener::new(&mut self.sessions, query).on_vehicle_move(movement, passengers)
    }

    // -----------------------------------------------------------------------
    // Server
    // -----------------------------------------------------------------------

    /// A host dependency was enabled or disabled. Resets every online
    /// session when it is watched; returns whether it was.
    pub fn on_dependency_toggled(
        &mut self,
        name: &str,
        enabled: bool,
        online: &[&dyn SessionActor],
    ) -> bool {
        if !self.server.on_dependency_toggled(name, enabled) {
            return false;
        }
        let query = PolicyQuery::new(self.host.index.as_ref());
        self.sessions.reset_all(online, query);
        true
    }

    /// One server tick. Ticks sessions and invalidates the region cache on
    /// their schedules.
    pub fn on_server_tick(&mut self, online: &[&dyn SessionActor]) {
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        if self.session_schedule.fires(tick) {
            let query = PolicyQuery::new(self.host.index.as_ref());
            self.sessions.tick(online, query);
            self.sessions.expire_stale(Utc::now());
            trace!(tick, online = online.len(), "sessions ticked");
        }
        if self.cache_schedule.fires(tick) {
            self.host.index.invalidate_cache();
            trace!(tick, "region cache invalidated");
        }
    }
}

impl core::fmt::Debug for GuardEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GuardEngine")
            .field("tick", &self.tick)
            .field("sessions", &self.sessions)
            .field("attributions", &self.attributions.len())
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}
