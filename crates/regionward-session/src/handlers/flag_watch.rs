//! Watches one flag at the actor's position and reports every change.
//!
//! Used for flags whose effect the host applies itself (weather, game mode,
//! time): the sink re-applies the rule whenever the effective value flips.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use regionward_region::{ActorAssociable, PolicyQuery};
use regionward_types::{EntityId, Location, StateFlag};
use tracing::trace;

use super::{Handler, HandlerFactory, MoveContext};
use crate::actor::SessionActor;

/// Receives `(actor, flag, allowed)` whenever the watched value changes.
pub type FlagSink = Arc<dyn Fn(EntityId, &StateFlag, bool) + Send + Sync>;

/// Tracks the effective value of one flag for one actor.
pub struct FlagWatchHandler {
    flag: StateFlag,
    sink: FlagSink,
    last_value: Option<bool>,
    last_change: Option<DateTime<Utc>>,
}

impl FlagWatchHandler {
    /// Watch `flag`, reporting to `sink`.
    pub fn new(flag: StateFlag, sink: FlagSink) -> Self {
        Self {
            flag,
            sink,
            last_value: None,
            last_change: None,
        }
    }

    /// Factory for registration with the session manager.
    pub fn factory(flag: StateFlag, sink: FlagSink) -> HandlerFactory {
        Box::new(move || -> Box<dyn Handler> { Box::new(Self::new(flag, Arc::clone(&sink))) })
    }

    /// Last observed value.
    pub const fn last_value(&self) -> Option<bool> {
        self.last_value
    }

    /// When the value last changed.
    pub const fn last_change(&self) -> Option<DateTime<Utc>> {
        self.last_change
    }

    fn evaluate(&mut self, actor: &dyn SessionActor, location: &Location, query: PolicyQuery<'_>) {
        let subject = ActorAssociable(actor);
        let value = query.test_state(location, Some(&subject), &self.flag);
        if self.last_value == Some(value) {
            return;
        }
        trace!(actor = %actor.id(), flag = self.flag.name, value, "watched flag changed");
        self.last_value = Some(value);
        self.last_change = Some(Utc::now());
        (self.sink)(actor.id(), &self.flag, value);
    }
}

impl core::fmt::Debug for FlagWatchHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlagWatchHandler")
            .field("flag", &self.flag.name)
            .field("last_value", &self.last_value)
            .field("last_change", &self.last_change)
            .finish_non_exhaustive()
    }
}

impl Handler for FlagWatchHandler {
    fn name(&self) -> &'static str {
        self.flag.name
    }

    fn initialize(&mut self, actor: &dyn SessionActor, location: &Location, query: PolicyQuery<'_>) {
        self.evaluate(actor, location, query);
    }

    fn on_cross_boundary(&mut self, ctx: &MoveContext<'_>) {
        self.evaluate(ctx.actor, &ctx.to, ctx.query);
    }

    fn tick(&mut self, actor: &dyn SessionActor, query: PolicyQuery<'_>) {
        self.evaluate(actor, &actor.location(), query);
    }
}
