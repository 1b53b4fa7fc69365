//! Positions in the world.
//!
//! A [`Location`] is a continuous position with a look direction. Policy is
//! evaluated at block granularity, so most callers only care whether two
//! locations fall in different [`BlockPos`] cells.

use serde::{Deserialize, Serialize};

use crate::ids::WorldId;

/// A continuous position in a world, with the direction the holder faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The world the position is in.
    pub world: WorldId,
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
    /// Horizontal look angle in degrees.
    pub yaw: f32,
    /// Vertical look angle in degrees.
    pub pitch: f32,
}

impl Location {
    /// Create a location facing yaw 0, pitch 0.
    pub const fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Return the same position facing the given direction.
    #[must_use]
    pub const fn with_direction(self, yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch, ..self }
    }

    /// The block cell containing this position.
    pub fn block(&self) -> BlockPos {
        BlockPos {
            world: self.world,
            x: block_coord(self.x),
            y: block_coord(self.y),
            z: block_coord(self.z),
        }
    }

    /// Whether `other` lies in a different block cell (or another world).
    pub fn is_different_block(&self, other: &Self) -> bool {
        self.block() != other.block()
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({:.2}, {:.2}, {:.2})", self.world, self.x, self.y, self.z)
    }
}

/// Integer block cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    /// The world the block is in.
    pub world: WorldId,
    /// East-west block coordinate.
    pub x: i32,
    /// Vertical block coordinate.
    pub y: i32,
    /// North-south block coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a block position.
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// The location at the center of the block's bottom face.
    pub fn center(&self) -> Location {
        Location::new(
            self.world,
            f64::from(self.x) + 0.5,
            f64::from(self.y),
            f64::from(self.z) + 0.5,
        )
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}[{}, {}, {}]", self.world, self.x, self.y, self.z)
    }
}

/// Floor a continuous coordinate to its block coordinate.
#[allow(clippy::cast_possible_truncation)]
fn block_coord(value: f64) -> i32 {
    // `as` saturates at the i32 bounds and maps NaN to 0.
    value.floor() as i32
}
