//! Enumeration types shared across the engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The kind of an entity, as classified by the platform adapter.
///
/// Only the kinds the policy layer distinguishes are named; everything else
/// is [`EntityKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A connected player.
    Player,
    /// Arrow projectile.
    Arrow,
    /// Spectral arrow projectile.
    SpectralArrow,
    /// Thrown trident.
    Trident,
    /// Thrown snowball.
    Snowball,
    /// Thrown egg.
    Egg,
    /// Thrown ender pearl.
    EnderPearl,
    /// Large fireball.
    Fireball,
    /// Small fireball (blazes, dispensers).
    SmallFireball,
    /// Wither skull projectile.
    WitherSkull,
    /// Thrown splash or lingering potion.
    ThrownPotion,
    /// Ignited TNT waiting to explode.
    PrimedTnt,
    /// Rideable minecart.
    Minecart,
    /// Minecart carrying a chest.
    ChestMinecart,
    /// Minecart carrying a hopper.
    HopperMinecart,
    /// Minecart carrying a furnace.
    FurnaceMinecart,
    /// Minecart carrying TNT.
    TntMinecart,
    /// Boat.
    Boat,
    /// Lingering potion cloud.
    AreaEffectCloud,
    /// Creeper.
    Creeper,
    /// Zombie.
    Zombie,
    /// Skeleton.
    Skeleton,
    /// Spider.
    Spider,
    /// Enderman.
    Enderman,
    /// Ender dragon.
    EnderDragon,
    /// Wither boss.
    Wither,
    /// Ghast.
    Ghast,
    /// Shulker.
    Shulker,
    /// Ravager.
    Ravager,
    /// End crystal.
    EndCrystal,
    /// Snow golem.
    SnowGolem,
    /// Iron golem.
    IronGolem,
    /// Wolf.
    Wolf,
    /// Cat.
    Cat,
    /// Parrot.
    Parrot,
    /// Horse.
    Horse,
    /// Pig.
    Pig,
    /// Cow.
    Cow,
    /// Sheep.
    Sheep,
    /// Villager.
    Villager,
    /// Dropped item stack.
    Item,
    /// Armor stand.
    ArmorStand,
    /// Item frame.
    ItemFrame,
    /// Painting.
    Painting,
    /// Any kind the engine does not distinguish.
    Other,
}

impl EntityKind {
    /// Boats and every minecart variant.
    pub const fn is_vehicle(self) -> bool {
        matches!(self, Self::Boat) || self.is_minecart()
    }

    /// Every minecart variant.
    pub const fn is_minecart(self) -> bool {
        matches!(
            self,
            Self::Minecart
                | Self::ChestMinecart
                | Self::HopperMinecart
                | Self::FurnaceMinecart
                | Self::TntMinecart
        )
    }

    /// Ignited TNT.
    pub const fn is_primed_explosive(self) -> bool {
        matches!(self, Self::PrimedTnt)
    }
}

// ---------------------------------------------------------------------------
// BlockKind
// ---------------------------------------------------------------------------

/// The block kinds the policy layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Regular piston.
    Piston,
    /// Sticky piston.
    StickyPiston,
    /// The extended head of a piston.
    PistonHead,
    /// A block being moved by a piston.
    MovingPiston,
    /// Dispenser.
    Dispenser,
    /// Any other block.
    Other,
}

impl BlockKind {
    /// Any part of a piston mechanism.
    pub const fn is_piston(self) -> bool {
        matches!(
            self,
            Self::Piston | Self::StickyPiston | Self::PistonHead | Self::MovingPiston
        )
    }
}

// ---------------------------------------------------------------------------
// Association
// ---------------------------------------------------------------------------

/// Membership verdict of an identity against a set of regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Association {
    /// Owner of at least one of the regions.
    Owner,
    /// Member (but not owner) of at least one of the regions.
    Member,
    /// No standing in any of the regions.
    NonMember,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Value of a state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// The action is permitted.
    Allow,
    /// The action is forbidden.
    Deny,
}

// ---------------------------------------------------------------------------
// MoveType
// ---------------------------------------------------------------------------

/// How an actor's position is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    /// Respawning after death.
    Respawn,
    /// Getting into a vehicle.
    Embark,
    /// Walking, running, falling.
    Move,
    /// Gliding with wings.
    Glide,
    /// Swimming.
    Swim,
    /// Carried by a vehicle.
    Ride,
    /// Teleported.
    Teleport,
    /// Any other change that must not be refused.
    OtherNonCancellable,
    /// Any other change that may be refused.
    OtherCancellable,
}

impl MoveType {
    /// Whether a denied move of this type is rolled back.
    pub const fn is_cancellable(self) -> bool {
        !matches!(self, Self::Respawn | Self::OtherNonCancellable)
    }
}
