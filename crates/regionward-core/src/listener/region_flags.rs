use regionward_region::{ActorAssociable, RegionAssociable};
use regionward_types::{EntityKind, StateFlag, flags};
use tracing::debug;

use super::ListenerContext;
use crate::event::{BlockChangeEvent, DamageEvent};

/// Applies the environmental flags that do not depend on who is acting.
///
/// Block changes are filtered location by location with no subject, so a
/// region denying e.g. `creeper-explosion` protects its own blocks while the
/// rest of the blast goes ahead. Where the world asks for it, explosion
/// flags cancel the whole event instead.
#[derive(Debug, Clone, Copy)]
pub struct RegionFlagsListener<'a> {
    ctx: ListenerContext<'a>,
}

impl<'a> RegionFlagsListener<'a> {
    /// A listener reading from `ctx`.
    pub const fn new(ctx: ListenerContext<'a>) -> Self {
        Self { ctx }
    }

    /// Blocks being placed or spread.
    pub fn on_place_block(&self, event: &mut BlockChangeEvent) {
        if event.is_cancelled() || !self.ctx.is_region_support_enabled(event.world()) {
            return;
        }
        let cause = event.cause();
        let piston = cause.first_block().is_some_and(|block| block.kind.is_piston());
        let snow_golem = cause.find_any(&[EntityKind::SnowGolem]).is_some();
        let enderman = cause.find_any(&[EntityKind::Enderman]).is_some();

        if piston {
            filter_by(&self.ctx, event, flags::PISTONS, false);
        }
        if snow_golem {
            filter_by(&self.ctx, event, flags::SNOWMAN_TRAILS, false);
        }
        if enderman {
            filter_by(&self.ctx, event, flags::ENDER_BUILD, false);
        }
    }

    /// Blocks being broken or blown up.
    pub fn on_break_block(&self, event: &mut BlockChangeEvent) {
        if event.is_cancelled() || !self.ctx.is_region_support_enabled(event.world()) {
            return;
        }
        let cancel = self.ctx.worlds.get(event.world()).explosion_flag_cancellation;
        let cause = event.cause();
        let piston = cause.first_block().is_some_and(|block| block.kind.is_piston());
        let checks = [
            (piston, flags::PISTONS, false),
            (
                cause.find_any(&[EntityKind::Creeper]).is_some(),
                flags::CREEPER_EXPLOSION,
                cancel,
            ),
            (
                cause.find_any(&[EntityKind::EnderDragon]).is_some(),
                flags::ENDERDRAGON_BLOCK_DAMAGE,
                cancel,
            ),
            (
                cause.find_any(&[EntityKind::EndCrystal]).is_some(),
                flags::OTHER_EXPLOSION,
                cancel,
            ),
            (
                cause.find_any(&[EntityKind::Enderman]).is_some(),
                flags::ENDER_BUILD,
                false,
            ),
            (
                cause.find_any(&[EntityKind::Ravager]).is_some(),
                flags::RAVAGER_RAVAGE,
                false,
            ),
        ];

        for (applies, flag, cancel_event) in checks {
            if applies {
                filter_by(&self.ctx, event, flag, cancel_event);
            }
        }
    }

    /// A player hitting the ground or a wall.
    pub fn on_entity_damage(&self, event: &mut DamageEvent) {
        if event.is_cancelled() || !self.ctx.is_region_support_enabled(&event.location.world) {
            return;
        }
        if event.kind != EntityKind::Player || !event.is_impact() {
            return;
        }
        let Some(identity) = self.ctx.identities.player(event.victim) else {
            return;
        };
        let subject: &dyn RegionAssociable = &ActorAssociable(&*identity);
        if !self
            .ctx
            .query
            .test_state(&event.location, Some(subject), &flags::FALL_DAMAGE)
        {
            event.set_cancelled(true);
            debug!(victim = %event.victim, cause = ?event.cause, "fall damage cancelled");
        }
    }
}

fn filter_by(
    ctx: &ListenerContext<'_>,
    event: &mut BlockChangeEvent,
    flag: StateFlag,
    cancel_event: bool,
) {
    if event.filter(ctx.query.state_predicate(flag), cancel_event) {
        debug!(
            flag = flag.name,
            change = ?event.change(),
            remaining = event.locations().len(),
            cancelled = event.is_cancelled(),
            "block change narrowed by flag"
        );
    }
}
