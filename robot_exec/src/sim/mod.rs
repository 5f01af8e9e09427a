//! # Simulated equipment
//!
//! Simple kinematic stand-ins for the motor controllers, the drivetrain and the vision frontend.
//! They let the executable run on a development machine and give the tests a deterministic plant
//! to close the loop around. Every simulated device advances by one cycle period each time it is
//! given a demand.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod actuator;
mod velocity;
mod world;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use actuator::SimActuator;
pub use velocity::SimVelocity;
pub use world::SimWorld;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Params {
    /// Position of the target in the world frame.
    ///
    /// Units: meters
    pub target_pos_m: [f64; 3],

    /// Fiducial ID reported for the target.
    pub target_id: i32,

    /// Height of the camera above the ground.
    ///
    /// Units: meters
    pub camera_height_m: f64,

    /// Full horizontal field of view of the camera.
    ///
    /// Units: degrees
    pub camera_fov_deg: f64,

    /// Initial robot pose as `[x_m, y_m, heading_deg]` in the world frame.
    pub initial_pose: [f64; 3],

    /// Initial position of the actuator output shaft.
    ///
    /// Units: degrees
    pub act_initial_deg: f64,

    /// Fraction of the velocity error removed by the simulated velocity loop each cycle.
    pub velocity_response: f64,

    /// Whether the simulated frontend advertises client mode.
    #[serde(default)]
    pub supports_client_mode: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            target_pos_m: [4.0, 1.0, 1.5],
            target_id: 7,
            camera_height_m: 0.5,
            camera_fov_deg: 70.0,
            initial_pose: [0.0, 0.0, 0.0],
            act_initial_deg: 0.0,
            velocity_response: 0.3,
            supports_client_mode: false,
        }
    }
}
