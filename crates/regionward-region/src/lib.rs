//! Region association and policy queries for the Regionward access-control
//! engine.
//!
//! # Modules
//!
//! - [`domain`] -- Region owner and member domains
//! - [`associable`] -- Subjects a policy query is evaluated for
//! - [`index`] -- Boundary to the host's spatial region index
//! - [`query`] -- Boolean policy checks with fail-closed/fail-open fallback
//! - [`resolve`] -- Mapping causes to subjects
//! - [`error`] -- Error types

pub mod associable;
pub mod domain;
pub mod error;
pub mod index;
pub mod query;
pub mod resolve;

pub use associable::{
    ActorAssociable, ActorIdentity, Associable, DelayedRegionOverlap, OfflineIdentity,
    RegionAssociable, identity_association,
};
pub use domain::{ProtectedRegion, RegionDomain};
pub use error::IndexError;
pub use index::RegionIndex;
pub use query::PolicyQuery;
pub use resolve::{AssociationResolver, EntityLocator, IdentityProvider};
