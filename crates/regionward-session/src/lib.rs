//! Per-actor sessions and movement validation for the Regionward
//! access-control engine.
//!
//! # Modules
//!
//! - [`actor`] -- The live actor a session belongs to
//! - [`config`] -- Session tuning
//! - [`handlers`] -- Per-session policy components
//! - [`manager`] -- Session registry, move and vehicle validation, bypass
//! - [`profile`] -- Background profile cache
//! - [`session`] -- The session record
//! - [`vehicle`] -- Vehicle move verdicts
//! - [`error`] -- Error types

pub mod actor;
pub mod config;
pub mod error;
pub mod handlers;
pub mod manager;
pub mod profile;
pub mod session;
pub mod vehicle;

pub use actor::SessionActor;
pub use config::SessionConfig;
pub use error::SessionError;
pub use handlers::{
    EntryExitHandler, FlagSink, FlagWatchHandler, Handler, HandlerFactory, MoveContext,
};
pub use manager::SessionManager;
pub use profile::{Profile, ProfileCache};
pub use session::{Session, SessionPhase};
pub use vehicle::{PassengerCorrection, VehicleMove, VehicleVerdict};
