//! References to the things that can be responsible for an event.
//!
//! An [`ActorRef`] is a value snapshot handed over by the platform adapter.
//! Equality of two references is decided by their [`ActorKey`], never by the
//! snapshot data, because the same entity is reported at different positions
//! over its life.

use regionward_types::{BlockKind, BlockPos, EntityId, EntityKind, Location};
use serde::{Deserialize, Serialize};

/// A connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Stable player id.
    pub id: EntityId,
    /// Display name at the time of the event.
    pub name: String,
}

/// A player identity that is not currently connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Stable player id.
    pub id: EntityId,
    /// Last known name, if any.
    pub name: Option<String>,
}

/// A non-player entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity id.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Where the entity was when the reference was taken.
    pub location: Location,
    /// Where the entity was spawned, when the platform tracks it.
    pub origin: Option<Location>,
}

/// A block in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    /// Block cell.
    pub pos: BlockPos,
    /// Block kind.
    pub kind: BlockKind,
}

/// Something that can appear in a causal chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorRef {
    /// A connected player.
    Player(PlayerRef),
    /// A disconnected player identity.
    OfflineUser(UserRef),
    /// A non-player entity.
    Entity(EntityRef),
    /// A block.
    Block(BlockRef),
    /// Nothing identifiable. Skipped wherever a missing trigger would be.
    Unknown,
}

/// Identity used to deduplicate references.
///
/// A player and the offline user with the same id are one person and share
/// a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActorKey {
    /// A player, an offline user or a non-player entity.
    Id(EntityId),
    /// A block cell.
    Block(BlockPos),
}

impl ActorRef {
    /// Convenience constructor for a player reference.
    pub fn player(id: EntityId, name: impl Into<String>) -> Self {
        Self::Player(PlayerRef {
            id,
            name: name.into(),
        })
    }

    /// Convenience constructor for an entity reference without a spawn origin.
    pub const fn entity(id: EntityId, kind: EntityKind, location: Location) -> Self {
        Self::Entity(EntityRef {
            id,
            kind,
            location,
            origin: None,
        })
    }

    /// Convenience constructor for a block reference.
    pub const fn block(pos: BlockPos, kind: BlockKind) -> Self {
        Self::Block(BlockRef { pos, kind })
    }

    /// Identity of the reference, or `None` for [`ActorRef::Unknown`].
    pub const fn key(&self) -> Option<ActorKey> {
        match self {
            Self::Player(p) => Some(ActorKey::Id(p.id)),
            Self::OfflineUser(u) => Some(ActorKey::Id(u.id)),
            Self::Entity(e) => Some(ActorKey::Id(e.id)),
            Self::Block(b) => Some(ActorKey::Block(b.pos)),
            Self::Unknown => None,
        }
    }

    /// Entity kind for players and entities.
    pub const fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::Player(_) => Some(EntityKind::Player),
            Self::Entity(e) => Some(e.kind),
            Self::OfflineUser(_) | Self::Block(_) | Self::Unknown => None,
        }
    }

    /// Whether the reference is a player or a non-player entity.
    pub const fn is_entity(&self) -> bool {
        matches!(self, Self::Player(_) | Self::Entity(_))
    }

    /// Whether the reference is a vehicle or a primed explosive, i.e. a
    /// carrier that says nothing about who is responsible.
    pub const fn is_carrier(&self) -> bool {
        match self {
            Self::Entity(e) => e.kind.is_vehicle() || e.kind.is_primed_explosive(),
            Self::Player(_) | Self::OfflineUser(_) | Self::Block(_) | Self::Unknown => false,
        }
    }
}

impl core::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Player(p) => write!(f, "{}", p.name),
            Self::OfflineUser(u) => match &u.name {
                Some(name) => write!(f, "{name} (offline)"),
                None => write!(f, "{} (offline)", u.id),
            },
            Self::Entity(e) => write!(f, "{:?}[{}]", e.kind, e.id),
            Self::Block(b) => write!(f, "{:?}@{}", b.kind, b.pos),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
