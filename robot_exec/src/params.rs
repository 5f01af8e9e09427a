//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::params::{require_positive, ConfigError, Validate};

use crate::sim;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RobotExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    #[serde(default = "default_cycle_period_s")]
    pub cycle_period_s: f64,

    /// Number of cycles to run before stopping.
    pub num_cycles: u64,

    /// When true each cycle is padded out to the cycle period, otherwise cycles run back to back.
    #[serde(default = "default_realtime")]
    pub realtime: bool,

    /// Actuator goal commanded at start. Takes precedence over `act_setpoint`.
    ///
    /// Units: degrees
    #[serde(default)]
    pub act_goal_deg: Option<f64>,

    /// Named actuator setpoint commanded at start.
    #[serde(default)]
    pub act_setpoint: Option<String>,

    /// Speed held by the velocity controlled motor.
    ///
    /// Units: motor rotations/second
    #[serde(default)]
    pub vel_target_rps: f64,

    /// Operator translation demand held for the whole run, `[vx, vy]` in the robot frame.
    ///
    /// Units: meters/second
    #[serde(default)]
    pub operator_vel_ms: [f64; 2],

    /// Simulation parameters
    #[serde(default)]
    pub sim: sim::Params,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Validate for RobotExecParams {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("cycle_period_s", self.cycle_period_s)?;
        require_positive("sim.camera_fov_deg", self.sim.camera_fov_deg)?;

        if self.operator_vel_ms.iter().all(|v| v.is_finite()) {
            Ok(())
        }
        else {
            Err(ConfigError::Unsupported {
                name: "operator_vel_ms",
                reason: String::from("velocities must be finite"),
            })
        }
    }
}

fn default_cycle_period_s() -> f64 {
    crate::DEFAULT_CYCLE_PERIOD_S
}

fn default_realtime() -> bool {
    true
}
