//! Per-session handlers.
//!
//! Every session owns one instance of each registered handler. A handler
//! keeps whatever sub-state it needs and gets a say in every movement that
//! crosses a block boundary.
//!
//! - [`entry_exit`] -- Entry and exit flag enforcement
//! - [`flag_watch`] -- Change notification for one flag at the actor's position

pub mod entry_exit;
pub mod flag_watch;

use std::collections::BTreeSet;

use regionward_region::{PolicyQuery, RegionAssociable};
use regionward_types::{Location, MoveType, RegionId};

use crate::actor::SessionActor;

pub use entry_exit::EntryExitHandler;
pub use flag_watch::{FlagSink, FlagWatchHandler};

/// Creates a fresh handler for a new session.
pub type HandlerFactory = Box<dyn Fn() -> Box<dyn Handler> + Send + Sync>;

/// Everything a handler may look at when judging a move.
pub struct MoveContext<'a> {
    /// The moving actor.
    pub actor: &'a dyn SessionActor,
    /// The actor as a policy subject.
    pub associable: &'a dyn RegionAssociable,
    /// Last valid position.
    pub from: Location,
    /// Requested position.
    pub to: Location,
    /// Regions containing `from`.
    pub from_regions: &'a BTreeSet<RegionId>,
    /// Regions containing `to`.
    pub to_regions: &'a BTreeSet<RegionId>,
    /// How the actor is moving.
    pub move_type: MoveType,
    /// Policy queries.
    pub query: PolicyQuery<'a>,
}

impl MoveContext<'_> {
    /// Regions contained in `to` but not `from`.
    pub fn entered(&self) -> impl Iterator<Item = &RegionId> {
        self.to_regions.difference(self.from_regions)
    }

    /// Regions contained in `from` but not `to`.
    pub fn exited(&self) -> impl Iterator<Item = &RegionId> {
        self.from_regions.difference(self.to_regions)
    }
}

/// A per-session policy component.
pub trait Handler: Send {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Called when the session is created or reset.
    fn initialize(&mut self, _actor: &dyn SessionActor, _location: &Location, _query: PolicyQuery<'_>) {}

    /// Whether the move may happen. Only consulted for moves that cross a
    /// block boundary.
    fn test_move_to(&mut self, _ctx: &MoveContext<'_>) -> bool {
        true
    }

    /// Called after a boundary-crossing move has been accepted.
    fn on_cross_boundary(&mut self, _ctx: &MoveContext<'_>) {}

    /// Called on every session tick.
    fn tick(&mut self, _actor: &dyn SessionActor, _query: PolicyQuery<'_>) {}
}
