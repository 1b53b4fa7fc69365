//! Per-world policy switches.
//!
//! The engine never parses these on its own: the host (or `regionward-core`'s
//! YAML loader) hands them over already deserialized. Every field has a
//! default so a world with no explicit section behaves sensibly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::WorldId;

/// Switches that govern policy enforcement in one world.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Whether region protection is enforced in this world at all.
    #[serde(default = "default_true")]
    pub use_regions: bool,

    /// Whether an explosion flag denial cancels the whole explosion rather
    /// than sparing individual blocks.
    #[serde(default)]
    pub explosion_flag_cancellation: bool,

    /// Whether fake players (automation acting as a player) bypass
    /// protection.
    #[serde(default = "default_true")]
    pub fake_player_build_override: bool,

    /// Whether a non-player entity is associated at the location it was
    /// spawned instead of where it currently is.
    #[serde(default)]
    pub use_entity_origin: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            use_regions: default_true(),
            explosion_flag_cancellation: false,
            fake_player_build_override: default_true(),
            use_entity_origin: false,
        }
    }
}

/// Per-world configurations with a fallback for worlds not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfigs {
    /// Configuration for worlds without an explicit entry.
    #[serde(default)]
    pub default: WorldConfig,

    /// Explicit per-world entries.
    #[serde(default)]
    pub worlds: BTreeMap<WorldId, WorldConfig>,
}

impl WorldConfigs {
    /// The configuration in effect for `world`.
    pub fn get(&self, world: &WorldId) -> &WorldConfig {
        self.worlds.get(world).unwrap_or(&self.default)
    }

    /// Register or replace the configuration for a world.
    pub fn insert(&mut self, world: WorldId, config: WorldConfig) {
        self.worlds.insert(world, config);
    }
}

const fn default_true() -> bool {
    true
}
