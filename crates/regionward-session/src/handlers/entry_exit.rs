//! Refuses moves into regions that deny entry and out of regions that deny
//! exit.

use regionward_types::flags;
use tracing::debug;

use super::{Handler, HandlerFactory, MoveContext};

/// Entry and exit enforcement.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryExitHandler;

impl EntryExitHandler {
    /// Factory for registration with the session manager.
    pub fn factory() -> HandlerFactory {
        Box::new(|| -> Box<dyn Handler> { Box::new(Self) })
    }
}

impl Handler for EntryExitHandler {
    fn name(&self) -> &'static str {
        "entry-exit"
    }

    fn test_move_to(&mut self, ctx: &MoveContext<'_>) -> bool {
        if ctx.entered().next().is_some()
            && !ctx
                .query
                .test_state(&ctx.to, Some(ctx.associable), &flags::ENTRY)
        {
            debug!(actor = %ctx.actor.id(), to = %ctx.to, "entry denied");
            return false;
        }
        if ctx.exited().next().is_some()
            && !ctx
                .query
                .test_state(&ctx.from, Some(ctx.associable), &flags::EXIT)
        {
            debug!(actor = %ctx.actor.id(), from = %ctx.from, "exit denied");
            return false;
        }
        true
    }
}
