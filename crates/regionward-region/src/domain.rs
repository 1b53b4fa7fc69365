//! Region ownership data.
//!
//! The index owns region geometry and flag values. What the association
//! layer needs from a region is only who owns it and who is a member, so
//! that is all [`ProtectedRegion`] carries.

use std::collections::BTreeSet;

use regionward_types::{EntityId, RegionId};
use serde::{Deserialize, Serialize};

use crate::associable::ActorIdentity;

/// A set of players and permission groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDomain {
    /// Players listed by id.
    #[serde(default)]
    pub players: BTreeSet<EntityId>,
    /// Permission group names, lower case.
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl RegionDomain {
    /// An empty domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player.
    #[must_use]
    pub fn with_player(mut self, id: EntityId) -> Self {
        self.players.insert(id);
        self
    }

    /// Add a group. Group names are case-insensitive.
    #[must_use]
    pub fn with_group(mut self, group: &str) -> Self {
        self.groups.insert(group.to_lowercase());
        self
    }

    /// Whether the identity is listed directly or through one of its groups.
    pub fn contains<I: ActorIdentity + ?Sized>(&self, identity: &I) -> bool {
        self.players.contains(&identity.id())
            || self.groups.iter().any(|group| identity.has_group(group))
    }

    /// Whether nobody is listed.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.groups.is_empty()
    }
}

/// A named region with owner and member domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedRegion {
    /// Region name.
    pub id: RegionId,
    /// Higher priority regions override lower ones inside the index.
    #[serde(default)]
    pub priority: i32,
    /// Owners.
    #[serde(default)]
    pub owners: RegionDomain,
    /// Members. Owners count as members without being listed here.
    #[serde(default)]
    pub members: RegionDomain,
}

impl ProtectedRegion {
    /// A region with no owners or members.
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            priority: 0,
            owners: RegionDomain::new(),
            members: RegionDomain::new(),
        }
    }

    /// Whether this is the world-wide region.
    pub fn is_global(&self) -> bool {
        self.id.is_global()
    }

    /// Whether `identity` owns the region.
    pub fn is_owner<I: ActorIdentity + ?Sized>(&self, identity: &I) -> bool {
        self.owners.contains(identity)
    }

    /// Whether `identity` is a member or an owner.
    pub fn is_member<I: ActorIdentity + ?Sized>(&self, identity: &I) -> bool {
        self.members.contains(identity) || self.is_owner(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Builder {
        id: EntityId,
        groups: Vec<String>,
    }

    impl ActorIdentity for Builder {
        fn id(&self) -> EntityId {
            self.id
        }

        fn name(&self) -> &str {
            "builder"
        }

        fn groups(&self) -> &[String] {
            &self.groups
        }

        fn has_permission(&self, _permission: &str) -> bool {
            false
        }
    }

    #[test]
    fn region_loads_from_json() {
        let owner = EntityId::new();
        let json = format!(
            r#"{{"id":"Farm","owners":{{"players":["{}"]}},"members":{{"groups":["Builders"]}}}}"#,
            owner.into_inner()
        );
        let region: ProtectedRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(region.id, RegionId::new("farm"));
        assert_eq!(region.priority, 0);
        assert!(region.owners.players.contains(&owner));

        let builder = Builder {
            id: EntityId::new(),
            groups: vec![String::from("builders")],
        };
        assert!(region.is_member(&builder));
        assert!(!region.is_owner(&builder));
    }

    #[test]
    fn group_names_ignore_case_beyond_ascii() {
        let domain = RegionDomain::new().with_group("Bâtisseurs");
        let shouting = Builder {
            id: EntityId::new(),
            groups: vec![String::from("BÂTISSEURS")],
        };
        let outsider = Builder {
            id: EntityId::new(),
            groups: vec![String::from("batisseurs")],
        };
        assert!(domain.contains(&shouting));
        assert!(!domain.contains(&outsider));
    }
}
