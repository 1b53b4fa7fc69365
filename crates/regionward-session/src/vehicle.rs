//! Vehicle movement verdicts.
//!
//! A vehicle cannot be refused on its own behalf, only on behalf of the
//! players riding it. When one of them may not go where the vehicle is
//! heading, the host stops the vehicle and puts it back. If the rider's last
//! valid position is somewhere else entirely, the rider alone is moved there
//! too, so the vehicle is not dragged back and forth every tick.

use regionward_types::{EntityId, Location};

/// A vehicle changing position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleMove {
    /// The vehicle.
    pub vehicle: EntityId,
    /// Position before the move.
    pub from: Location,
    /// Requested position.
    pub to: Location,
}

/// A rider to teleport individually after a refused vehicle move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassengerCorrection {
    /// The rider.
    pub actor: EntityId,
    /// Where to put them, facing the way they currently face.
    pub to: Location,
}

/// Outcome of a vehicle move check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleVerdict {
    /// Let the vehicle move.
    Allowed,
    /// Zero the vehicle's velocity and teleport it to `rollback`, then apply
    /// the passenger correction if there is one.
    Rejected {
        /// The vehicle.
        vehicle: EntityId,
        /// Position to put the vehicle back at.
        rollback: Location,
        /// The refused rider's own correction.
        passenger: Option<PassengerCorrection>,
    },
}

impl VehicleVerdict {
    /// Whether the move was refused.
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
