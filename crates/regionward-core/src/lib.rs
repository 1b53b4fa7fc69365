//! Configuration, event listeners and the tick-driven engine of the
//! Regionward access-control layer.
//!
//! The host translates its own notifications into [`event`] types and feeds
//! them, along with join, quit, move and tick callbacks, to a
//! [`GuardEngine`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with defaults and env overrides
//! - [`engine`] -- The engine and the host services it borrows
//! - [`event`] -- Block change and damage events
//! - [`listener`] -- Policy listeners
//! - [`logging`] -- `tracing` subscriber setup
//! - [`schedule`] -- Fixed-interval tick work

pub mod config;
pub mod engine;
pub mod event;
pub mod listener;
pub mod logging;
pub mod schedule;

pub use config::{ConfigError, GuardConfig, LoggingConfig, RegionsConfig};
pub use engine::{GuardEngine, HostServices};
pub use event::{BlockChange, BlockChangeEvent, DamageCause, DamageEvent};
pub use listener::{
    ListenerContext, ProtectionListener, RegionFlagsListener, ServerListener, VehicleListener,
};
pub use logging::{LoggingError, init_logging};
pub use schedule::TickSchedule;
