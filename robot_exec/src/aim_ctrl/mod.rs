//! # Aim control module
//!
//! Aim control turns the robot onto the tracked target while leaving the operator in charge of
//! translation. Each aim cycle it takes the operator's translational velocity, asks the tracker
//! for the target bearing compensated for that velocity, and applies a proportional rotation:
//!
//! ```text
//! rot = clamp(k_p * radians(compensated_bearing), -max_rot_rate, max_rot_rate)
//! ```
//!
//! With no target visible the rotation is zero, the robot never hunts for a target on its own.
//! The translation demanded by the operator is passed to the drivetrain unmodified in every case.
//!
//! The gain and latency are runtime tunables read from the dashboard each cycle, see
//! [`AimTunables`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

use comms_if::eqpt::DriveDem;
use util::params::ConfigError;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The drivetrain, taking a demand every command cycle.
pub trait Drivetrain {
    fn apply(&mut self, dem: DriveDem);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AimCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum AimCtrlError {
    #[error("Invalid aim configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
