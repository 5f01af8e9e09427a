//! # Unit conversion
//!
//! Setpoints are given in degrees of the output shaft, while the motor controller works in
//! rotations of the motor shaft. The two are related by the gear ratio, the number of motor
//! rotations per output rotation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use util::params::{require_positive, ConfigError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Degrees in one revolution of the output shaft.
pub const DEG_PER_REV: f64 = 360.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Converts between physical (output shaft) and mechanism (motor shaft) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitConverter {
    /// Motor rotations per output rotation, always finite and positive.
    gear_ratio: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl UnitConverter {
    /// Create a new converter, rejecting a zero, negative or non-finite gear ratio.
    pub fn new(gear_ratio: f64) -> Result<Self, ConfigError> {
        require_positive("gear_ratio", gear_ratio)?;
        Ok(Self { gear_ratio })
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    /// Output shaft degrees to motor rotations.
    pub fn to_mechanism(&self, physical_deg: f64) -> f64 {
        physical_deg / DEG_PER_REV * self.gear_ratio
    }

    /// Motor rotations to output shaft degrees.
    pub fn to_physical(&self, mechanism_rot: f64) -> f64 {
        mechanism_rot / self.gear_ratio * DEG_PER_REV
    }

    /// Output shaft rate (rotations per second, or per second squared) to motor rate.
    ///
    /// Rates are already expressed per revolution so only the gear ratio applies.
    pub fn rate_to_mechanism(&self, physical_rate: f64) -> f64 {
        physical_rate * self.gear_ratio
    }

    /// Motor rate to output shaft rate.
    pub fn rate_to_physical(&self, mechanism_rate: f64) -> f64 {
        mechanism_rate / self.gear_ratio
    }
}
