use regionward_region::PolicyQuery;
use regionward_session::{SessionActor, SessionManager, VehicleMove, VehicleVerdict};
use tracing::info;

/// Applies movement policy to vehicles through their riding players.
///
/// The host passes only the passengers that are players; other riders have
/// no session and cannot be refused.
pub struct VehicleListener<'a> {
    sessions: &'a mut SessionManager,
    query: PolicyQuery<'a>,
}

impl<'a> VehicleListener<'a> {
    /// A listener judging moves against `sessions`.
    pub const fn new(sessions: &'a mut SessionManager, query: PolicyQuery<'a>) -> Self {
        Self { sessions, query }
    }

    /// A vehicle changing position.
    pub fn on_vehicle_move(
        &mut self,
        movement: &VehicleMove,
        passengers: &[&dyn SessionActor],
    ) -> VehicleVerdict {
        let verdict = self
            .sessions
            .test_vehicle_move(movement, passengers, self.query);
        if let VehicleVerdict::Rejected { passenger, .. } = &verdict {
            info!(
                vehicle = %movement.vehicle,
                from = %movement.from,
                to = %movement.to,
                passenger_corrected = passenger.is_some(),
                "vehicle move rolled back"
            );
        }
        verdict
    }
}

impl core::fmt::Debug for VehicleListener<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VehicleListener")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
