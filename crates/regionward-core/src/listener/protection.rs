use regionward_cause::ActorRef;
use tracing::debug;

use super::ListenerContext;
use crate::event::BlockChangeEvent;

/// Gates block changes on the `build` flag for whoever caused them.
///
/// A player with bypass in the event's world is never checked. Everyone
/// else is mapped to a subject through the association resolver and each
/// location is tested for that subject; rejected locations are dropped and
/// an event left with no locations is cancelled.
#[derive(Debug, Clone, Copy)]
pub struct ProtectionListener<'a> {
    ctx: ListenerContext<'a>,
}

impl<'a> ProtectionListener<'a> {
    /// A listener reading from `ctx`.
    pub const fn new(ctx: ListenerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Blocks changed by a cause.
    pub fn on_change_block(&self, event: &mut BlockChangeEvent) {
        if event.is_cancelled() || !self.ctx.is_region_support_enabled(event.world()) {
            return;
        }
        if self.root_bypasses(event) {
            return;
        }

        let subject = self.ctx.associations.associate(event.cause());
        let query = self.ctx.query;
        if event.filter(|location| query.test_build(location, &subject), false) {
            if event.locations().is_empty() {
                event.set_cancelled(true);
            }
            debug!(
                cause = %event.cause(),
                change = ?event.change(),
                remaining = event.locations().len(),
                cancelled = event.is_cancelled(),
                "build denied"
            );
        }
    }

    fn root_bypasses(&self, event: &BlockChangeEvent) -> bool {
        let Some(ActorRef::Player(player)) = event.cause().root_cause() else {
            return false;
        };
        self.ctx
            .identities
            .player(player.id)
            .is_some_and(|identity| self.ctx.sessions.has_bypass(&*identity, event.world()))
    }
}
