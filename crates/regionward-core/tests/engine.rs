//! End-to-end flows through the engine against an in-memory host.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use regionward_cause::{ActorGraph, ActorRef, CAUSE_KEY, EntityRef, Link};
use regionward_core::{
    BlockChange, BlockChangeEvent, DamageCause, DamageEvent, GuardConfig, GuardEngine,
    HostServices,
};
use regionward_region::{
    ActorIdentity, EntityLocator, IdentityProvider, IndexError, OfflineIdentity, ProtectedRegion,
    RegionAssociable, RegionDomain, RegionIndex,
};
use regionward_session::{SessionActor, VehicleMove, VehicleVerdict};
use regionward_types::{
    Association, BlockKind, BlockPos, EntityId, EntityKind, Location, MoveType, RegionId, State,
    StateFlag, WorldConfig, WorldId, flags,
};

// =============================================================================
// Fakes
// =============================================================================

/// A region spanning `[x0, x1)` along x, denying `deny` to everyone.
struct Zone {
    region: ProtectedRegion,
    x0: f64,
    x1: f64,
    deny: Vec<&'static str>,
}

/// Build is allowed for members inside regions and for everyone outside.
#[derive(Default)]
struct Zones {
    zones: Vec<Zone>,
    down: AtomicBool,
    invalidations: AtomicUsize,
}

impl Zones {
    fn applicable(&self, loc: &Location) -> Vec<&Zone> {
        self.zones
            .iter()
            .filter(|zone| loc.x >= zone.x0 && loc.x < zone.x1)
            .collect()
    }
}

impl RegionIndex for Zones {
    fn query_state(
        &self,
        location: &Location,
        subject: Option<&dyn RegionAssociable>,
        flag: &StateFlag,
    ) -> Result<Option<State>, IndexError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable {
                reason: String::from("reloading"),
            });
        }
        let inside = self.applicable(location);
        if inside.iter().any(|zone| zone.deny.contains(&flag.name)) {
            return Ok(Some(State::Deny));
        }
        if flag.name == flags::BUILD.name && !inside.is_empty() {
            let regions: Vec<&ProtectedRegion> = inside.iter().map(|zone| &zone.region).collect();
            let allowed =
                subject.is_some_and(|s| s.association(&regions) != Association::NonMember);
            return Ok(Some(if allowed { State::Allow } else { State::Deny }));
        }
        Ok(flag.default.or(Some(State::Allow)))
    }

    fn regions_overlapping(&self, location: &Location) -> Result<BTreeSet<RegionId>, IndexError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable {
                reason: String::from("reloading"),
            });
        }
        Ok(self
            .applicable(location)
            .into_iter()
            .map(|zone| zone.region.id.clone())
            .collect())
    }

    fn invalidate_cache(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

struct Rider {
    id: EntityId,
    name: String,
    at: Location,
    permissions: Vec<String>,
}

impl ActorIdentity for Rider {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn groups(&self) -> &[String] {
        &[]
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl SessionActor for Rider {
    fn location(&self) -> Location {
        self.at
    }
}

#[derive(Default)]
struct Platform {
    players: HashMap<EntityId, Arc<Rider>>,
}

impl IdentityProvider for Platform {
    fn player(&self, id: EntityId) -> Option<Arc<dyn ActorIdentity>> {
        self.players
            .get(&id)
            .map(|rider| Arc::clone(rider) as Arc<dyn ActorIdentity>)
    }

    fn offline_user(&self, _id: EntityId) -> Option<OfflineIdentity> {
        None
    }
}

impl EntityLocator for Platform {
    fn location(&self, _id: EntityId) -> Option<Location> {
        None
    }

    fn origin(&self, _id: EntityId) -> Option<Location> {
        None
    }
}

impl ActorGraph for Platform {
    fn link(&self, _entity: &EntityRef) -> Link {
        Link::None
    }
}

// =============================================================================
// Fixture
// =============================================================================

struct Fixture {
    world: WorldId,
    alice: Arc<Rider>,
    bob: Arc<Rider>,
    carol: Arc<Rider>,
    zones: Arc<Zones>,
    engine: GuardEngine,
}

impl Fixture {
    /// Zones along x:
    ///
    /// - `keep` [0, 10) denies creeper explosions
    /// - `home` [20, 30) has alice as member
    /// - `pad` [40, 50) denies fall damage
    /// - `vault` [60, 70) denies pistons
    /// - `gate` [80, 90) denies entry
    ///
    /// Alice and bob have no permissions; carol may bypass in this world.
    fn new() -> Self {
        Self::with(|_, _| {})
    }

    fn with(tweak: impl FnOnce(&WorldId, &mut GuardConfig)) -> Self {
        let world = WorldId::new();
        let rider = |name: &str, x: f64| Rider {
            id: EntityId::new(),
            name: String::from(name),
            at: Location::new(world, x, 64.0, 0.5),
            permissions: Vec::new(),
        };
        let alice = Arc::new(rider("alice", 75.5));
        let bob = Arc::new(rider("bob", 75.5));
        let mut carol = rider("carol", 75.5);
        carol.permissions.push(format!("regionward.region.bypass.{world}"));
        let carol = Arc::new(carol);

        let zone = |name: &str, x0: f64, deny: Vec<&'static str>| Zone {
            region: ProtectedRegion::new(RegionId::new(name)),
            x0,
            x1: x0 + 10.0,
            deny,
        };
        let mut home = zone("home", 20.0, Vec::new());
        home.region.members = RegionDomain::new().with_player(alice.id);
        let zones = Arc::new(Zones {
            zones: vec![
                zone("keep", 0.0, vec![flags::CREEPER_EXPLOSION.name]),
                home,
                zone("pad", 40.0, vec![flags::FALL_DAMAGE.name]),
                zone("vault", 60.0, vec![flags::PISTONS.name]),
                zone("gate", 80.0, vec![flags::ENTRY.name]),
            ],
            ..Zones::default()
        });

        let mut platform = Platform::default();
        platform.players.insert(alice.id, Arc::clone(&alice));
        platform.players.insert(bob.id, Arc::clone(&bob));
        platform.players.insert(carol.id, Arc::clone(&carol));
        let platform = Arc::new(platform);

        let mut config = GuardConfig::default();
        tweak(&world, &mut config);
        let engine = GuardEngine::new(
            config,
            HostServices {
                index: Arc::clone(&zones) as Arc<dyn RegionIndex>,
                graph: Arc::clone(&platform) as Arc<dyn ActorGraph>,
                identities: Arc::clone(&platform) as Arc<dyn IdentityProvider>,
                locator: platform as Arc<dyn EntityLocator>,
            },
        );

        Self {
            world,
            alice,
            bob,
            carol,
            zones,
            engine,
        }
    }

    fn at(&self, x: f64) -> Location {
        Location::new(self.world, x, 64.0, 0.5)
    }

    fn event(&self, change: BlockChange, triggers: Vec<ActorRef>, xs: &[f64]) -> BlockChangeEvent {
        let cause = self.engine.resolve_cause(triggers);
        BlockChangeEvent::new(
            change,
            cause,
            self.world,
            xs.iter().map(|x| self.at(*x)).collect(),
        )
    }

    fn player(&self, rider: &Rider) -> ActorRef {
        ActorRef::player(rider.id, rider.name.clone())
    }

    fn creeper(&self, x: f64) -> ActorRef {
        ActorRef::entity(EntityId::new(), EntityKind::Creeper, self.at(x))
    }
}

fn xs(event: &BlockChangeEvent) -> Vec<i64> {
    event.locations().iter().map(|l| l.block().x.into()).collect()
}

// =============================================================================
// Region flags
// =============================================================================

#[test]
fn creeper_blast_spares_protected_blocks() {
    let fx = Fixture::new();
    let mut event = fx.event(BlockChange::Break, vec![fx.creeper(5.5)], &[4.5, 6.5, 15.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
    assert_eq!(xs(&event), vec![15]);
}

#[test]
fn explosion_flag_can_cancel_whole_blast() {
    let fx = Fixture::with(|_, config| config.worlds.default.explosion_flag_cancellation = true);
    let mut event = fx.event(BlockChange::Break, vec![fx.creeper(5.5)], &[4.5, 6.5, 15.5]);
    fx.engine.on_block_change(&mut event);
    assert!(event.is_cancelled());
    assert_eq!(event.locations().len(), 3);
}

#[test]
fn disabled_world_is_untouched() {
    let fx = Fixture::with(|world, config| {
        config.worlds.insert(
            *world,
            WorldConfig {
                use_regions: false,
                ..WorldConfig::default()
            },
        );
    });
    let mut event = fx.event(BlockChange::Break, vec![fx.creeper(5.5)], &[4.5, 25.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
    assert_eq!(event.locations().len(), 2);
}

#[test]
fn piston_push_stops_at_vault() {
    let fx = Fixture::new();
    let piston = ActorRef::block(BlockPos::new(fx.world, 65, 64, 0), BlockKind::StickyPiston);
    let mut event = fx.event(BlockChange::Place, vec![piston], &[66.5, 71.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
    assert_eq!(xs(&event), vec![71]);
}

#[test]
fn fall_damage_flag() {
    let fx = Fixture::new();
    let hit = |x: f64, kind, cause| {
        let mut event = DamageEvent::new(fx.alice.id, kind, fx.at(x), cause);
        fx.engine.on_entity_damage(&mut event);
        event.is_cancelled()
    };
    assert!(hit(45.5, EntityKind::Player, DamageCause::Fall));
    assert!(hit(45.5, EntityKind::Player, DamageCause::FlyIntoWall));
    assert!(!hit(45.5, EntityKind::Player, DamageCause::Other));
    assert!(!hit(45.5, EntityKind::Zombie, DamageCause::Fall));
    assert!(!hit(55.5, EntityKind::Player, DamageCause::Fall));
}

// =============================================================================
// Build protection
// =============================================================================

#[test]
fn only_members_build_in_home() {
    let fx = Fixture::new();
    let mut by_bob = fx.event(BlockChange::Place, vec![fx.player(&fx.bob)], &[25.5]);
    fx.engine.on_block_change(&mut by_bob);
    assert!(by_bob.is_cancelled());
    assert!(by_bob.locations().is_empty());

    let mut by_alice = fx.event(BlockChange::Place, vec![fx.player(&fx.alice)], &[25.5]);
    fx.engine.on_block_change(&mut by_alice);
    assert!(!by_alice.is_cancelled());
    assert_eq!(by_alice.locations().len(), 1);
}

#[test]
fn partial_denial_keeps_the_rest() {
    let fx = Fixture::new();
    let mut event = fx.event(BlockChange::Break, vec![fx.player(&fx.bob)], &[18.5, 25.5, 31.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
    assert_eq!(xs(&event), vec![18, 31]);
}

#[test]
fn bypass_skips_build_check() {
    let fx = Fixture::new();
    let mut event = fx.event(BlockChange::Place, vec![fx.player(&fx.carol)], &[25.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
    assert_eq!(event.locations().len(), 1);
}

#[test]
fn disabled_bypass_is_checked_again() {
    let mut fx = Fixture::new();
    let carol = Arc::clone(&fx.carol);
    fx.engine.on_actor_join(&*carol);
    fx.engine
        .sessions_mut()
        .set_bypass_disabled(carol.id, true)
        .unwrap();
    let mut event = fx.event(BlockChange::Place, vec![fx.player(&carol)], &[25.5]);
    fx.engine.on_block_change(&mut event);
    assert!(event.is_cancelled());
}

#[test]
fn tracked_parent_is_held_responsible() {
    let fx = Fixture::new();
    let tnt = ActorRef::entity(EntityId::new(), EntityKind::PrimedTnt, fx.at(24.5));

    fx.engine
        .attributions()
        .track_parent_cause(&tnt, fx.player(&fx.bob))
        .unwrap();
    let mut event = fx.event(BlockChange::Break, vec![tnt.clone()], &[25.5]);
    assert!(matches!(event.cause().root_cause(), Some(ActorRef::Player(p)) if p.id == fx.bob.id));
    fx.engine.on_block_change(&mut event);
    assert!(event.is_cancelled());

    fx.engine
        .attributions()
        .track_parent_cause(&tnt, fx.player(&fx.alice))
        .unwrap();
    let mut event = fx.event(BlockChange::Break, vec![tnt], &[25.5]);
    fx.engine.on_block_change(&mut event);
    assert!(!event.is_cancelled());
}

#[test]
fn unattributed_tnt_is_unknown_and_denied() {
    let fx = Fixture::new();
    let tnt = ActorRef::entity(EntityId::new(), EntityKind::PrimedTnt, fx.at(24.5));
    let mut event = fx.event(BlockChange::Break, vec![tnt], &[25.5, 35.5]);
    assert!(!event.cause().is_known());
    fx.engine.on_block_change(&mut event);
    assert_eq!(xs(&event), vec![35]);
}

// =============================================================================
// Index outage
// =============================================================================

#[test]
fn outage_denies_build_and_allows_cosmetics() {
    let fx = Fixture::new();
    fx.zones.down.store(true, Ordering::SeqCst);

    let mut place = fx.event(BlockChange::Place, vec![fx.player(&fx.alice)], &[25.5]);
    fx.engine.on_block_change(&mut place);
    assert!(place.is_cancelled());

    let mut fall = DamageEvent::new(fx.alice.id, EntityKind::Player, fx.at(45.5), DamageCause::Fall);
    fx.engine.on_entity_damage(&mut fall);
    assert!(!fall.is_cancelled());
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn join_move_quit() {
    let mut fx = Fixture::new();
    let alice = Arc::clone(&fx.alice);
    fx.engine.on_actor_join(&*alice);
    assert_eq!(fx.engine.sessions().len(), 1);

    let to_gate = fx.at(85.5);
    assert_eq!(
        fx.engine.on_actor_move(&*alice, to_gate, MoveType::Move),
        Some(fx.at(75.5))
    );
    assert_eq!(
        fx.engine.on_actor_move(&*alice, fx.at(76.5), MoveType::Move),
        None
    );

    let me = fx.player(&alice);
    fx.engine
        .attributions()
        .put(&me, CAUSE_KEY, ActorRef::Unknown)
        .unwrap();
    let session = fx.engine.on_actor_quit(&*alice).unwrap();
    assert!(fx.engine.sessions().is_empty());
    assert!(fx.engine.attributions().get(&me, CAUSE_KEY).is_none());
    assert_eq!(session.actor(), alice.id);
    assert!(fx.engine.on_actor_quit(&*alice).is_none());
}

#[test]
fn vehicle_into_gate_is_rolled_back() {
    let mut fx = Fixture::new();
    let alice = Arc::clone(&fx.alice);
    fx.engine.on_actor_join(&*alice);

    let boat = VehicleMove {
        vehicle: EntityId::new(),
        from: fx.at(78.5),
        to: fx.at(85.5),
    };
    let verdict = fx.engine.on_vehicle_move(&boat, &[&*alice]);
    let VehicleVerdict::Rejected {
        rollback, passenger, ..
    } = verdict
    else {
        panic!("expected rejection, got {verdict:?}");
    };
    assert_eq!(rollback, boat.from);
    let correction = passenger.unwrap();
    assert_eq!(correction.actor, alice.id);
    assert!(!correction.to.is_different_block(&fx.at(75.5)));
}

#[test]
fn watched_dependency_resets_sessions() {
    let mut fx = Fixture::new();
    let alice = Arc::clone(&fx.alice);
    fx.engine.on_actor_join(&*alice);
    assert_eq!(
        fx.engine.on_actor_move(&*alice, fx.at(76.5), MoveType::Move),
        None
    );

    assert!(fx.engine.on_dependency_toggled("commandbook", true, &[&*alice]));
    assert!(fx.engine.server().is_active("CommandBook"));
    let session = fx.engine.sessions().get(alice.id).unwrap();
    assert_eq!(session.last_valid(), Some(fx.at(75.5)));

    assert!(!fx.engine.on_dependency_toggled("WorldEdit", true, &[&*alice]));
}

// =============================================================================
// Schedule
// =============================================================================

#[test]
fn cache_invalidated_every_other_tick() {
    let mut fx = Fixture::new();
    for _ in 0..5 {
        fx.engine.on_server_tick(&[]);
    }
    assert_eq!(fx.engine.current_tick(), 5);
    assert_eq!(fx.zones.invalidations.load(Ordering::SeqCst), 2);
}

#[test]
fn custom_intervals() {
    let mut fx = Fixture::with(|_, config| config.regions.cache_invalidation_ticks = 3);
    for _ in 0..9 {
        fx.engine.on_server_tick(&[]);
    }
    assert_eq!(fx.zones.invalidations.load(Ordering::SeqCst), 3);
}

#[test]
fn session_tick_creates_missing_sessions() {
    let mut fx = Fixture::new();
    let alice = Arc::clone(&fx.alice);
    fx.engine.on_server_tick(&[&*alice]);
    assert!(fx.engine.sessions().is_empty());
    fx.engine.on_server_tick(&[&*alice]);
    assert_eq!(fx.engine.sessions().len(), 1);
}

#[tokio::test]
async fn profile_cached_after_join() {
    let mut fx = Fixture::new();
    let alice = Arc::clone(&fx.alice);
    fx.engine.on_actor_join(&*alice);
    for _ in 0..100 {
        if fx.engine.sessions().profiles().name(alice.id).is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(
        fx.engine.sessions().profiles().name(alice.id).as_deref(),
        Some("alice")
    );
}
