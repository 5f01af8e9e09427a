//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with equipment drivers.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

/// Actuator (motor controller) demands
pub mod act;

/// Drivetrain demands
pub mod drive;

/// Vision frontend detections and capabilities
pub mod vision;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use act::{PidGains, ProfiledPositionDem, VelocityDem};
pub use drive::DriveDem;
pub use vision::{FrontendCaps, RawDetection};
