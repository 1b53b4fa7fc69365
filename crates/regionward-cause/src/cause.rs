//! Causal chain reconstruction.
//!
//! A [`Cause`] answers "who is ultimately responsible for this event".
//! [`CauseResolver::resolve`] takes the raw triggering objects, expands each
//! through the platform's entity relations ([`ActorGraph`]) and through
//! manually recorded parents ([`AttributionStore`]), and produces a
//! deduplicated chain with the root actor first and the most proximate
//! trigger last.
//!
//! # Indirection
//!
//! Some relations mean the root actor did not act directly: a lingering
//! potion cloud, a creature attacking its target, a tamed animal acting on
//! its own. Expanding any of those marks the whole cause
//! [`indirect`](Cause::is_indirect). The flag only ever goes from `false` to
//! `true` during a resolution.

use std::collections::HashSet;

use regionward_types::EntityKind;
use tracing::trace;

use crate::actor::{ActorKey, ActorRef, BlockRef, EntityRef, PlayerRef};
use crate::attribution::AttributionStore;

// ---------------------------------------------------------------------------
// Platform relations
// ---------------------------------------------------------------------------

/// The relation through which a non-player entity points at whoever is
/// responsible for it.
///
/// When an entity qualifies for more than one relation the platform reports
/// the first that applies in this order: primed explosive igniter,
/// projectile shooter, vehicle passengers, area effect source, creature
/// target, tamed owner.
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    /// Terminal: nothing further to expand.
    None,
    /// Projectile fired by an actor.
    Shooter(ActorRef),
    /// Primed explosive ignited by an actor.
    Igniter(ActorRef),
    /// Vehicle carrying these passengers.
    Passengers(Vec<ActorRef>),
    /// Area effect placed by an actor. Indirect.
    AreaSource(ActorRef),
    /// Creature pursuing a target. Indirect.
    Target(ActorRef),
    /// Tamed animal and its owner. Indirect.
    Owner(ActorRef),
}

/// Platform capability exposing entity relations.
pub trait ActorGraph: Send + Sync {
    /// The relation of a non-player entity at the time of the event.
    fn link(&self, entity: &EntityRef) -> Link;
}

// ---------------------------------------------------------------------------
// Cause
// ---------------------------------------------------------------------------

/// An immutable, deduplicated causal chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cause {
    causes: Vec<ActorRef>,
    indirect: bool,
}

impl Cause {
    /// The canonical cause with nothing identifiable in it.
    pub const fn unknown() -> Self {
        Self {
            causes: Vec::new(),
            indirect: false,
        }
    }

    /// Whether the root actor may not have acted directly.
    pub const fn is_indirect(&self) -> bool {
        self.indirect
    }

    /// Whether anything in the chain identifies a responsible actor.
    ///
    /// Vehicles and primed explosives only carry responsibility, so a chain
    /// made of nothing else is unknown.
    pub fn is_known(&self) -> bool {
        self.causes.iter().any(|actor| !actor.is_carrier())
    }

    /// The farthest actor in the chain.
    pub fn root_cause(&self) -> Option<&ActorRef> {
        self.causes.first()
    }

    /// The first connected player in the chain.
    pub fn first_player(&self) -> Option<&PlayerRef> {
        self.causes.iter().find_map(|actor| match actor {
            ActorRef::Player(player) => Some(player),
            _ => None,
        })
    }

    /// The first player or entity in the chain.
    pub fn first_entity(&self) -> Option<&ActorRef> {
        self.causes.iter().find(|actor| actor.is_entity())
    }

    /// The first non-player entity in the chain.
    pub fn first_non_player_entity(&self) -> Option<&EntityRef> {
        self.causes.iter().find_map(|actor| match actor {
            ActorRef::Entity(entity) => Some(entity),
            _ => None,
        })
    }

    /// The first block in the chain.
    pub fn first_block(&self) -> Option<&BlockRef> {
        self.causes.iter().find_map(|actor| match actor {
            ActorRef::Block(block) => Some(block),
            _ => None,
        })
    }

    /// The kind of the first player or entity whose kind is in `kinds`.
    pub fn find_any(&self, kinds: &[EntityKind]) -> Option<EntityKind> {
        self.causes
            .iter()
            .filter_map(ActorRef::entity_kind)
            .find(|kind| kinds.contains(kind))
    }

    /// Every actor in the chain, root first.
    pub fn actors(&self) -> &[ActorRef] {
        &self.causes
    }

    /// Number of actors in the chain.
    pub fn len(&self) -> usize {
        self.causes.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }
}

impl core::fmt::Display for Cause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for actor in &self.causes {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            write!(f, "{actor}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Builds [`Cause`]s from raw triggers.
///
/// Borrowing both collaborators keeps a resolver cheap to create per event.
#[derive(Clone, Copy)]
pub struct CauseResolver<'a> {
    graph: &'a dyn ActorGraph,
    store: &'a AttributionStore,
}

impl<'a> CauseResolver<'a> {
    /// Create a resolver over the platform relations and attribution store.
    pub const fn new(graph: &'a dyn ActorGraph, store: &'a AttributionStore) -> Self {
        Self { graph, store }
    }

    /// Resolve the triggering objects of one event into a cause.
    ///
    /// Never fails: unknown triggers are skipped and an input with nothing
    /// identifiable yields [`Cause::unknown`].
    pub fn resolve<I>(&self, triggers: I) -> Cause
    where
        I: IntoIterator<Item = ActorRef>,
    {
        let mut builder = Builder::default();
        for trigger in triggers {
            self.add(&mut builder, trigger);
        }
        let cause = builder.build();
        trace!(cause = %cause, indirect = cause.is_indirect(), "resolved cause");
        cause
    }

    fn add(&self, builder: &mut Builder, actor: ActorRef) {
        let Some(key) = actor.key() else {
            return;
        };
        if !builder.seen.insert(key) {
            return;
        }

        if let ActorRef::Entity(entity) = &actor {
            match self.graph.link(entity) {
                Link::None => {}
                Link::Shooter(parent) | Link::Igniter(parent) => self.add(builder, parent),
                Link::Passengers(passengers) => {
                    for passenger in passengers {
                        self.add(builder, passenger);
                    }
                }
                Link::AreaSource(parent) | Link::Target(parent) | Link::Owner(parent) => {
                    builder.indirect = true;
                    self.add(builder, parent);
                }
            }
        }

        // Manually recorded parents go in front of the trigger, each one
        // farther back than the last, so the farthest ancestor ends up first.
        let insert_at = builder.causes.len();
        let mut current = actor.clone();
        while !matches!(current, ActorRef::Block(_) | ActorRef::Unknown) {
            let Some(parent) = self.store.parent_cause(&current) else {
                break;
            };
            let Some(parent_key) = parent.key() else {
                break;
            };
            if !builder.seen.insert(parent_key) {
                break;
            }
            builder.causes.insert(insert_at, parent.clone());
            current = parent;
        }

        builder.causes.push(actor);
    }
}

impl core::fmt::Debug for CauseResolver<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CauseResolver")
            .field("tracked", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Builder {
    causes: Vec<ActorRef>,
    seen: HashSet<ActorKey>,
    indirect: bool,
}

impl Builder {
    fn build(self) -> Cause {
        Cause {
            causes: self.causes,
            indirect: self.indirect,
        }
    }
}
