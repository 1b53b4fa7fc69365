//! Who is asking: the subjects a policy query is evaluated for.
//!
//! A [`RegionAssociable`] answers one question: what is my standing in this
//! list of regions. Players and offline users answer from their identity;
//! non-player entities and blocks answer by spatial overlap, computed lazily
//! from the location captured when the event was attributed.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use regionward_types::{Association, EntityId, Location, RegionId};
use tracing::warn;

use crate::domain::ProtectedRegion;
use crate::index::RegionIndex;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Identity and permission view of a player, supplied by the platform.
pub trait ActorIdentity: Send + Sync {
    /// Stable id.
    fn id(&self) -> EntityId;

    /// Current name.
    fn name(&self) -> &str;

    /// Permission groups the identity belongs to.
    fn groups(&self) -> &[String];

    /// Whether the identity is in `group` (case-insensitive).
    fn has_group(&self, group: &str) -> bool {
        let group = group.to_lowercase();
        self.groups()
            .iter()
            .any(|candidate| candidate.to_lowercase() == group)
    }

    /// Whether the identity holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;

    /// Whether this is automation acting through a player identity.
    fn is_fake_player(&self) -> bool {
        false
    }
}

/// Anything that can state its association with a set of regions.
pub trait RegionAssociable {
    /// Standing in `regions`.
    fn association(&self, regions: &[&ProtectedRegion]) -> Association;
}

/// Association rule for identities: owner anywhere wins, then member
/// anywhere, else non-member.
pub fn identity_association<I: ActorIdentity + ?Sized>(
    identity: &I,
    regions: &[&ProtectedRegion],
) -> Association {
    let mut member = false;
    for region in regions {
        if region.is_owner(identity) {
            return Association::Owner;
        }
        if region.is_member(identity) {
            member = true;
        }
    }
    if member {
        Association::Member
    } else {
        Association::NonMember
    }
}

// ---------------------------------------------------------------------------
// OfflineIdentity
// ---------------------------------------------------------------------------

/// A player identity without a live connection.
///
/// Group data may be known from the permission backend, but no permission
/// can be confirmed, so [`ActorIdentity::has_permission`] always denies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineIdentity {
    /// Player id.
    pub id: EntityId,
    /// Last known name.
    pub name: String,
    /// Groups known for the player.
    pub groups: Vec<String>,
}

impl OfflineIdentity {
    /// An identity with no groups.
    pub fn bare(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            groups: Vec::new(),
        }
    }
}

impl ActorIdentity for OfflineIdentity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }

    fn has_permission(&self, _permission: &str) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// DelayedRegionOverlap
// ---------------------------------------------------------------------------

/// Spatial stand-in for a non-player actor.
///
/// The actor "owns" every region that overlaps the captured location. The
/// overlap is looked up on the first association request only.
pub struct DelayedRegionOverlap<'a> {
    index: &'a dyn RegionIndex,
    location: Location,
    source: OnceLock<Option<BTreeSet<RegionId>>>,
}

impl<'a> DelayedRegionOverlap<'a> {
    /// Bind a probe to `location`.
    pub fn new(index: &'a dyn RegionIndex, location: Location) -> Self {
        Self {
            index,
            location,
            source: OnceLock::new(),
        }
    }

    /// The location the probe evaluates against.
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Whether the overlap set has already been looked up.
    pub fn is_resolved(&self) -> bool {
        self.source.get().is_some()
    }

    fn source(&self) -> Option<&BTreeSet<RegionId>> {
        self.source
            .get_or_init(|| match self.index.regions_overlapping(&self.location) {
                Ok(regions) => Some(regions),
                Err(err) => {
                    warn!(location = %self.location, error = %err, "overlap lookup failed, treating actor as non-member");
                    None
                }
            })
            .as_ref()
    }
}

impl RegionAssociable for DelayedRegionOverlap<'_> {
    fn association(&self, regions: &[&ProtectedRegion]) -> Association {
        let Some(source) = self.source() else {
            return Association::NonMember;
        };
        let owns = regions.iter().any(|region| {
            source.contains(&region.id) || (region.is_global() && source.is_empty())
        });
        if owns {
            Association::Owner
        } else {
            Association::NonMember
        }
    }
}

impl core::fmt::Debug for DelayedRegionOverlap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelayedRegionOverlap")
            .field("location", &self.location)
            .field("source", &self.source.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Associable
// ---------------------------------------------------------------------------

/// The subject resolved from a cause.
pub enum Associable<'a> {
    /// A connected player.
    Player(Arc<dyn ActorIdentity>),
    /// A disconnected player.
    Offline(OfflineIdentity),
    /// A non-player actor evaluated by location.
    Deferred(DelayedRegionOverlap<'a>),
    /// A fixed answer.
    Constant(Association),
}

impl Associable<'_> {
    /// The identity behind a player or offline subject.
    pub fn identity(&self) -> Option<&dyn ActorIdentity> {
        match self {
            Self::Player(identity) => Some(identity.as_ref()),
            Self::Offline(identity) => Some(identity as &dyn ActorIdentity),
            Self::Deferred(_) | Self::Constant(_) => None,
        }
    }
}

impl RegionAssociable for Associable<'_> {
    fn association(&self, regions: &[&ProtectedRegion]) -> Association {
        match self {
            Self::Player(identity) => identity_association(identity.as_ref(), regions),
            Self::Offline(identity) => identity_association(identity, regions),
            Self::Deferred(probe) => probe.association(regions),
            Self::Constant(association) => *association,
        }
    }
}

impl core::fmt::Debug for Associable<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Player(identity) => f.debug_tuple("Player").field(&identity.name()).finish(),
            Self::Offline(identity) => f.debug_tuple("Offline").field(identity).finish(),
            Self::Deferred(probe) => f.debug_tuple("Deferred").field(probe).finish(),
            Self::Constant(association) => f.debug_tuple("Constant").field(association).finish(),
        }
    }
}

/// Borrowed identity used where the caller already holds the actor.
pub struct ActorAssociable<'a, I: ?Sized>(pub &'a I);

impl<I: ActorIdentity + ?Sized> RegionAssociable for ActorAssociable<'_, I> {
    fn association(&self, regions: &[&ProtectedRegion]) -> Association {
        identity_association(self.0, regions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use regionward_types::{State, StateFlag, WorldId};

    use super::*;
    use crate::domain::RegionDomain;
    use crate::error::IndexError;

    struct Overlaps {
        regions: Result<BTreeSet<RegionId>, IndexError>,
        lookups: AtomicUsize,
    }

    impl Overlaps {
        fn of(names: &[&str]) -> Self {
            Self {
                regions: Ok(names.iter().map(|n| RegionId::new(n)).collect()),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    impl RegionIndex for Overlaps {
        fn query_state(
            &self,
            _location: &Location,
            _subject: Option<&dyn RegionAssociable>,
            flag: &StateFlag,
        ) -> Result<Option<State>, IndexError> {
            Ok(flag.default)
        }

        fn regions_overlapping(&self, _location: &Location) -> Result<BTreeSet<RegionId>, IndexError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.regions.clone()
        }
    }

    fn here() -> Location {
        Location::new(WorldId::new(), 0.0, 64.0, 0.0)
    }

    // =========================================================================
    // Identity rule
    // =========================================================================

    #[test]
    fn owner_beats_member() {
        let me = OfflineIdentity::bare(EntityId::new(), "me");
        let mut a = ProtectedRegion::new(RegionId::new("a"));
        a.members = RegionDomain::new().with_player(me.id);
        let mut b = ProtectedRegion::new(RegionId::new("b"));
        b.owners = RegionDomain::new().with_player(me.id);

        assert_eq!(identity_association(&me, &[&a]), Association::Member);
        assert_eq!(identity_association(&me, &[&a, &b]), Association::Owner);
    }

    #[test]
    fn group_membership_counts() {
        let mut me = OfflineIdentity::bare(EntityId::new(), "me");
        me.groups.push(String::from("Builders"));
        let mut region = ProtectedRegion::new(RegionId::new("site"));
        region.members = RegionDomain::new().with_group("builders");
        assert_eq!(identity_association(&me, &[&region]), Association::Member);
    }

    #[test]
    fn strangers_are_non_members() {
        let me = OfflineIdentity::bare(EntityId::new(), "me");
        let region = ProtectedRegion::new(RegionId::new("x"));
        assert_eq!(identity_association(&me, &[&region]), Association::NonMember);
        assert_eq!(identity_association(&me, &[]), Association::NonMember);
    }

    #[test]
    fn offline_identity_holds_no_permissions() {
        let me = OfflineIdentity::bare(EntityId::new(), "me");
        assert!(!me.has_permission("anything"));
    }

    // =========================================================================
    // Deferred probe
    // =========================================================================

    #[test]
    fn probe_owns_overlapping_regions() {
        let index = Overlaps::of(&["spawn"]);
        let probe = DelayedRegionOverlap::new(&index, here());
        let spawn = ProtectedRegion::new(RegionId::new("spawn"));
        let other = ProtectedRegion::new(RegionId::new("other"));
        assert_eq!(probe.association(&[&spawn]), Association::Owner);
        assert_eq!(probe.association(&[&other]), Association::NonMember);
    }

    #[test]
    fn probe_owns_global_only_outside_regions() {
        let global = ProtectedRegion::new(RegionId::global());
        let outside = Overlaps::of(&[]);
        let inside = Overlaps::of(&["spawn"]);
        assert_eq!(
            DelayedRegionOverlap::new(&outside, here()).association(&[&global]),
            Association::Owner
        );
        assert_eq!(
            DelayedRegionOverlap::new(&inside, here()).association(&[&global]),
            Association::NonMember
        );
    }

    #[test]
    fn probe_looks_up_once() {
        let index = Overlaps::of(&["a"]);
        let probe = DelayedRegionOverlap::new(&index, here());
        assert!(!probe.is_resolved());
        let region = ProtectedRegion::new(RegionId::new("a"));
        for _ in 0..3 {
            probe.association(&[&region]);
        }
        assert!(probe.is_resolved());
        assert_eq!(index.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn probe_failure_is_non_member() {
        let index = Overlaps {
            regions: Err(IndexError::Unavailable {
                reason: String::from("loading"),
            }),
            lookups: AtomicUsize::new(0),
        };
        let probe = DelayedRegionOverlap::new(&index, here());
        let global = ProtectedRegion::new(RegionId::global());
        assert_eq!(probe.association(&[&global]), Association::NonMember);
    }

    #[test]
    fn constant_answers_unconditionally() {
        let region = ProtectedRegion::new(RegionId::new("r"));
        let subject = Associable::Constant(Association::Member);
        assert_eq!(subject.association(&[&region]), Association::Member);
        assert!(subject.identity().is_none());
    }
}
