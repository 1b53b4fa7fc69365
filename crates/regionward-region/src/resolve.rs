//! Mapping a resolved cause to the subject policy is evaluated for.

use std::sync::Arc;

use regionward_cause::{ActorRef, Cause, EntityRef};
use regionward_types::{Association, EntityId, Location, WorldConfigs};
use tracing::debug;

use crate::associable::{ActorIdentity, Associable, DelayedRegionOverlap, OfflineIdentity};
use crate::index::RegionIndex;

/// Platform lookup of player identities.
pub trait IdentityProvider: Send + Sync {
    /// The live identity of a connected player.
    fn player(&self, id: EntityId) -> Option<Arc<dyn ActorIdentity>>;

    /// What is known about a player who is not connected.
    fn offline_user(&self, id: EntityId) -> Option<OfflineIdentity>;
}

/// Platform lookup of entity positions.
pub trait EntityLocator: Send + Sync {
    /// Where the entity is now.
    fn location(&self, id: EntityId) -> Option<Location>;

    /// Where the entity was spawned.
    fn origin(&self, id: EntityId) -> Option<Location>;
}

/// Builds [`Associable`]s from causes.
#[derive(Clone, Copy)]
pub struct AssociationResolver<'a> {
    index: &'a dyn RegionIndex,
    identities: &'a dyn IdentityProvider,
    locator: &'a dyn EntityLocator,
    worlds: &'a WorldConfigs,
}

impl<'a> AssociationResolver<'a> {
    /// Create a resolver.
    pub const fn new(
        index: &'a dyn RegionIndex,
        identities: &'a dyn IdentityProvider,
        locator: &'a dyn EntityLocator,
        worlds: &'a WorldConfigs,
    ) -> Self {
        Self {
            index,
            identities,
            locator,
            worlds,
        }
    }

    /// The subject for `cause`, keyed on its root actor.
    ///
    /// Non-player roots are bound to a location captured here, so the answer
    /// does not change if the entity moves before the query runs.
    pub fn associate(&self, cause: &Cause) -> Associable<'a> {
        if !cause.is_known() {
            return Associable::Constant(Association::NonMember);
        }
        let subject = match cause.root_cause() {
            Some(ActorRef::Player(player)) => self.identities.player(player.id).map_or_else(
                || Associable::Offline(OfflineIdentity::bare(player.id, player.name.clone())),
                Associable::Player,
            ),
            Some(ActorRef::OfflineUser(user)) => Associable::Offline(
                self.identities.offline_user(user.id).unwrap_or_else(|| {
                    let name = user.name.clone().unwrap_or_else(|| user.id.to_string());
                    OfflineIdentity::bare(user.id, name)
                }),
            ),
            Some(ActorRef::Entity(entity)) => Associable::Deferred(DelayedRegionOverlap::new(
                self.index,
                self.entity_location(entity),
            )),
            Some(ActorRef::Block(block)) => {
                Associable::Deferred(DelayedRegionOverlap::new(self.index, block.pos.center()))
            }
            Some(ActorRef::Unknown) | None => Associable::Constant(Association::NonMember),
        };
        debug!(cause = %cause, subject = ?subject, "associated cause");
        subject
    }

    fn entity_location(&self, entity: &EntityRef) -> Location {
        let live = self.locator.location(entity.id).unwrap_or(entity.location);
        if self.worlds.get(&entity.location.world).use_entity_origin {
            self.locator
                .origin(entity.id)
                .or(entity.origin)
                .unwrap_or(live)
        } else {
            live
        }
    }
}

impl core::fmt::Debug for AssociationResolver<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AssociationResolver")
            .field("worlds", self.worlds)
            .finish_non_exhaustive()
    }
}
