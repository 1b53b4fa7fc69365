//! State flag definitions.
//!
//! A [`StateFlag`] names a policy setting that regions resolve to
//! [`State::Allow`] or [`State::Deny`]. Resolution (priorities, inheritance,
//! membership groups) belongs to the region index; this crate only carries
//! the flag's identity, the default the index falls back to, and the
//! [`FlagCategory`] that decides the verdict when the index cannot answer.

use serde::{Deserialize, Serialize};

use crate::enums::State;

/// What kind of consequence a flag guards, which fixes how a failed lookup
/// is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagCategory {
    /// Changes to the world (placing, breaking, explosions). Fails closed.
    Build,
    /// Entering or leaving places. Fails closed.
    Movement,
    /// No lasting consequence. Fails open.
    Cosmetic,
}

impl FlagCategory {
    /// The verdict to use when the region index is unavailable.
    pub const fn fail_verdict(self) -> bool {
        match self {
            Self::Build | Self::Movement => false,
            Self::Cosmetic => true,
        }
    }
}

/// A named allow/deny policy setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateFlag {
    /// Flag name as operators write it.
    pub name: &'static str,
    /// Value the index uses when no region sets the flag.
    pub default: Option<State>,
    /// Failure category.
    pub category: FlagCategory,
}

impl StateFlag {
    /// Define a flag.
    pub const fn new(name: &'static str, default: Option<State>, category: FlagCategory) -> Self {
        Self {
            name,
            default,
            category,
        }
    }
}

impl core::fmt::Display for StateFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

/// Building by actors.
pub const BUILD: StateFlag = StateFlag::new("build", None, FlagCategory::Build);

/// Pistons pushing or pulling blocks.
pub const PISTONS: StateFlag = StateFlag::new("pistons", Some(State::Allow), FlagCategory::Build);

/// Snow golems leaving snow.
pub const SNOWMAN_TRAILS: StateFlag =
    StateFlag::new("snowman-trails", Some(State::Allow), FlagCategory::Build);

/// Endermen picking up and placing blocks.
pub const ENDER_BUILD: StateFlag =
    StateFlag::new("enderman-grief", Some(State::Allow), FlagCategory::Build);

/// Creeper explosions destroying blocks.
pub const CREEPER_EXPLOSION: StateFlag =
    StateFlag::new("creeper-explosion", Some(State::Allow), FlagCategory::Build);

/// The ender dragon destroying blocks.
pub const ENDERDRAGON_BLOCK_DAMAGE: StateFlag =
    StateFlag::new("enderdragon-block-damage", Some(State::Allow), FlagCategory::Build);

/// Explosions other than creepers and TNT.
pub const OTHER_EXPLOSION: StateFlag =
    StateFlag::new("other-explosion", Some(State::Allow), FlagCategory::Build);

/// Ravagers trampling crops and leaves.
pub const RAVAGER_RAVAGE: StateFlag =
    StateFlag::new("ravager-grief", Some(State::Allow), FlagCategory::Build);

/// Players taking fall damage.
pub const FALL_DAMAGE: StateFlag =
    StateFlag::new("fall-damage", Some(State::Allow), FlagCategory::Cosmetic);

/// Entering a region.
pub const ENTRY: StateFlag = StateFlag::new("entry", Some(State::Allow), FlagCategory::Movement);

/// Leaving a region.
pub const EXIT: StateFlag = StateFlag::new("exit", Some(State::Allow), FlagCategory::Movement);
