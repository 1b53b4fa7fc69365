//! Actor attribution for the Regionward access-control engine.
//!
//! Given the raw objects that triggered an event, this crate works out who
//! is ultimately responsible for it.
//!
//! # Modules
//!
//! - [`actor`] -- References to players, users, entities and blocks
//! - [`attribution`] -- Side table of manually recorded provenance
//! - [`cause`] -- Causal chain reconstruction
//! - [`error`] -- Error types

pub mod actor;
pub mod attribution;
pub mod cause;
pub mod error;

pub use actor::{ActorKey, ActorRef, BlockRef, EntityRef, PlayerRef, UserRef};
pub use attribution::{AttributionStore, CAUSE_KEY};
pub use cause::{ActorGraph, Cause, CauseResolver, Link};
pub use error::AttributionError;
