//! Normalized host events the listeners act on.
//!
//! The host translates its own place, break and damage notifications into
//! these types, runs them through the engine, and then honours whatever is
//! left: a cancelled event is undone entirely, and a block change only
//! affects the locations still in its list.

use regionward_cause::Cause;
use regionward_types::{EntityId, EntityKind, Location, WorldId};

/// Whether blocks are being created or destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockChange {
    /// Blocks are placed or spread.
    Place,
    /// Blocks are broken or exploded.
    Break,
}

/// A change to one or more blocks, with its cause.
#[derive(Debug, Clone)]
pub struct BlockChangeEvent {
    change: BlockChange,
    cause: Cause,
    world: WorldId,
    locations: Vec<Location>,
    cancelled: bool,
}

impl BlockChangeEvent {
    /// An event changing `locations` in `world`.
    pub const fn new(
        change: BlockChange,
        cause: Cause,
        world: WorldId,
        locations: Vec<Location>,
    ) -> Self {
        Self {
            change,
            cause,
            world,
            locations,
            cancelled: false,
        }
    }

    /// Place or break.
    pub const fn change(&self) -> BlockChange {
        self.change
    }

    /// Who is responsible.
    pub const fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The world the blocks are in.
    pub const fn world(&self) -> &WorldId {
        &self.world
    }

    /// Locations still affected.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Whether the whole event is cancelled.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel or un-cancel the whole event.
    pub const fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Drop every location `predicate` rejects.
    ///
    /// With `cancel_event_on_false`, the first rejection cancels the whole
    /// event instead and no location is removed. Returns whether anything was
    /// rejected.
    pub fn filter<P>(&mut self, mut predicate: P, cancel_event_on_false: bool) -> bool
    where
        P: FnMut(&Location) -> bool,
    {
        if cancel_event_on_false {
            let rejected = self.locations.iter().any(|location| !predicate(location));
            if rejected {
                self.cancelled = true;
            }
            return rejected;
        }
        let before = self.locations.len();
        self.locations.retain(|location| predicate(location));
        self.locations.len() != before
    }
}

/// Why an entity is being hurt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCause {
    /// Landing after a fall.
    Fall,
    /// Gliding into a wall.
    FlyIntoWall,
    /// Anything else.
    Other,
}

/// An entity about to take damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// The victim.
    pub victim: EntityId,
    /// What the victim is.
    pub kind: EntityKind,
    /// Where the victim is.
    pub location: Location,
    /// Why it is hurt.
    pub cause: DamageCause,
    cancelled: bool,
}

impl DamageEvent {
    /// A damage event that has not been cancelled.
    pub const fn new(
        victim: EntityId,
        kind: EntityKind,
        location: Location,
        cause: DamageCause,
    ) -> Self {
        Self {
            victim,
            kind,
            location,
            cause,
            cancelled: false,
        }
    }

    /// Whether the damage is cancelled.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel or un-cancel the damage.
    pub const fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Whether this is impact damage that the fall-damage flag governs.
    pub const fn is_impact(&self) -> bool {
        matches!(self.cause, DamageCause::Fall | DamageCause::FlyIntoWall)
    }
}
