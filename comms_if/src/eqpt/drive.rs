//! # Drivetrain Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand sent to the drivetrain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum DriveDem {
    /// Velocity demand, in the frame the drivetrain is configured for.
    Velocity {
        /// Forward velocity, positive forward.
        ///
        /// Units: meters/second
        vx_ms: f64,

        /// Lateral velocity, positive left.
        ///
        /// Units: meters/second
        vy_ms: f64,

        /// Rotational rate, positive counter-clockwise.
        ///
        /// Units: radians/second
        rot_rads: f64,
    },

    /// Neutral output, all motors released.
    Idle,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for DriveDem {
    fn default() -> Self {
        DriveDem::Idle
    }
}

impl DriveDem {
    /// The rotational rate demanded, zero for `Idle`.
    pub fn rot_rads(&self) -> f64 {
        match self {
            DriveDem::Velocity { rot_rads, .. } => *rot_rads,
            DriveDem::Idle => 0.0,
        }
    }

    /// The translation demanded as `(vx, vy)`, zero for `Idle`.
    pub fn translation_ms(&self) -> (f64, f64) {
        match self {
            DriveDem::Velocity { vx_ms, vy_ms, .. } => (*vx_ms, *vy_ms),
            DriveDem::Idle => (0.0, 0.0),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DriveDem::Idle)
    }
}
