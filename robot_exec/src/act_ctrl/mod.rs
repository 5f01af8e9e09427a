//! # Actuator control module
//!
//! Actuator control drives a single geared actuator (an arm joint for example) to a setpoint
//! given in degrees of the output shaft. The motor controller runs the closed loop and the
//! trapezoidal motion profile itself; this module converts the setpoint into motor rotations,
//! re-asserts the profiled position demand every cycle, and reports when the actuator has
//! converged on the goal.
//!
//! The demand must be re-issued on every cycle even when the goal has not changed. A cycle
//! without a demand is a cycle without control output, and a loaded arm will sag.
//!
//! Stale or garbage telemetry from the driver is not detected here: the position reported by
//! `current_physical_position` is whatever the driver last read.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

use comms_if::eqpt::ProfiledPositionDem;
use util::params::ConfigError;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The motor controller driving the actuator.
pub trait ActuatorDriver {
    /// Command the motor controller to follow a motion profile to the demanded position, and
    /// hold it there until the next demand.
    fn apply_profiled_position(&mut self, dem: ProfiledPositionDem);

    /// The position last measured by the motor controller.
    ///
    /// Units: motor rotations
    fn measured_position_rot(&self) -> f64;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ActCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ActCtrlError {
    #[error("Invalid actuator configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Actuator goal is not a finite number: {0}")]
    InvalidGoal(f64),

    #[error("No setpoint named \"{0}\" in the actuator parameters")]
    UnknownSetpoint(String),
}
