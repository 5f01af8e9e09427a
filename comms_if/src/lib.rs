//! # Communications interface crate.
//!
//! Provides the interface types exchanged between the controller and the
//! equipment it drives or reads (actuator drivers, the vision frontend and the
//! drivetrain).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command and telemetry definitions for equipment
pub mod eqpt;
