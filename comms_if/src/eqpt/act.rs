//! # Actuator Equipment Commands
//!
//! All quantities in this module are in mechanism units, i.e. rotations of the motor shaft before
//! any gear reduction.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Closed loop gains loaded into the motor controller's slot.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    #[serde(default)]
    pub k_i: f64,

    /// Derivative gain
    #[serde(default)]
    pub k_d: f64,

    /// Velocity feedforward gain
    #[serde(default)]
    pub k_v: f64,
}

/// A profiled position demand.
///
/// The motor controller generates a trapezoidal profile toward `target_rot`, never exceeding the
/// cruise velocity or acceleration, and holds the target once reached.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ProfiledPositionDem {
    /// The target position.
    ///
    /// Units: motor rotations
    pub target_rot: f64,

    /// The maximum velocity of the profile.
    ///
    /// Units: motor rotations/second
    pub cruise_rps: f64,

    /// The maximum acceleration of the profile.
    ///
    /// Units: motor rotations/second^2
    pub accel_rps2: f64,

    /// Closed loop gains used to follow the profile.
    pub gains: PidGains,
}

/// A closed loop velocity demand.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VelocityDem {
    /// The target velocity. The sign is passed to the motor untouched.
    ///
    /// Units: motor rotations/second
    pub target_rps: f64,

    /// Closed loop gains used to hold the velocity.
    pub gains: PidGains,
}
