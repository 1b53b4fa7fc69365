//! Type-safe identifier wrappers.
//!
//! Entities and worlds are identified by [`Uuid`] newtypes so that an entity
//! id can never be passed where a world id is expected. Regions are named by
//! the operators who define them, so [`RegionId`] wraps a lower-cased string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Stable identity of an entity, players included.
    ///
    /// Players keep the same id across sessions, which is what the session
    /// registry and region domains key on.
    EntityId
}

define_id! {
    /// Identity of a loaded world.
    WorldId
}

/// Name of a protected region.
///
/// Region names are case-insensitive, so the id is normalized to lower case
/// on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct RegionId(String);

impl RegionId {
    /// Reserved name of the region that spans a whole world.
    pub const GLOBAL: &'static str = "__global__";

    /// Create a region id, normalizing the name to lower case.
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    /// The id of the world-wide region.
    pub fn global() -> Self {
        Self(String::from(Self::GLOBAL))
    }

    /// Whether this id names the world-wide region.
    pub fn is_global(&self) -> bool {
        self.0 == Self::GLOBAL
    }

    /// Borrow the normalized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RegionId {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
