//! # Velocity control module
//!
//! Velocity control holds a motor (an intake roller or a shooter wheel) at a demanded speed. The
//! closed loop runs in the motor controller, this module only keeps the demand asserted once per
//! cycle and stops the motor when asked.
//!
//! The sign of the demanded speed is passed to the motor untouched, callers choose the
//! direction.

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

use comms_if::eqpt::VelocityDem;
use util::params::ConfigError;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The motor controller running the velocity loop.
pub trait VelocityDriver {
    fn apply_velocity(&mut self, dem: VelocityDem);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during VelCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum VelCtrlError {
    #[error("Invalid velocity configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Demanded velocity is not a finite number: {0}")]
    InvalidDemand(f64),
}
