//! Shared type definitions for the Regionward access-control engine.
//!
//! Everything the attribution, association and session layers pass between
//! each other lives here, so the higher crates depend on one vocabulary.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for entities, worlds and regions
//! - [`location`] -- Continuous locations and block cells
//! - [`enums`] -- Entity and block kinds, associations, flag states, move types
//! - [`flags`] -- State flags and their failure categories
//! - [`config`] -- Per-world policy switches

pub mod config;
pub mod enums;
pub mod flags;
pub mod ids;
pub mod location;

// Re-export all public types at crate root for convenience.
pub use config::{WorldConfig, WorldConfigs};
pub use enums::{Association, BlockKind, EntityKind, MoveType, State};
pub use flags::{FlagCategory, StateFlag};
pub use ids::{EntityId, RegionId, WorldId};
pub use location::{BlockPos, Location};
