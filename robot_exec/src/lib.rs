//! # Robot library.
//!
//! This library holds the controller modules driven by the `robot_exec` main loop, so that they
//! can be tested and benchmarked without the executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Unit conversion between output shaft degrees and motor rotations
pub mod units;

/// Actuator control - drives a geared actuator to a setpoint under a motion profile
pub mod act_ctrl;

/// Velocity control - holds a motor at a demanded speed (intake, shooter)
pub mod vel_ctrl;

/// Target tracking - turns vision detections into range and motion compensated bearing
pub mod tgt_track;

/// Aim control - steers the robot onto the tracked target while the operator translates
pub mod aim_ctrl;

/// Command lifecycle glue run by the scheduler
pub mod cmd;

/// Dashboard telemetry and runtime tunables
pub mod telemetry;

/// Simulated equipment used by the executable and the tests
pub mod sim;

/// Global data store for the executable
pub mod data_store;

/// Parameters of the executable itself
pub mod params;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default target period of one control cycle.
pub const DEFAULT_CYCLE_PERIOD_S: f64 = 0.02;
