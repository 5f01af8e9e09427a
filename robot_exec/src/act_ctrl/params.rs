//! Parameters structure for ActCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;

use comms_if::eqpt::PidGains;
use serde::{Deserialize, Serialize};
use util::params::{require_non_negative, require_positive, ConfigError, Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Actuator control.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Motor rotations per output shaft rotation. A direct drive is 1.0, a
    /// 25:1 reduction is 25.0.
    pub gear_ratio: f64,

    // ---- MOTION PROFILE ----

    /// Cruise velocity of the output shaft.
    ///
    /// Units: output rotations/second
    pub cruise_rps: f64,

    /// Acceleration of the output shaft.
    ///
    /// Units: output rotations/second^2
    pub accel_rps2: f64,

    /// Closed loop gains loaded into the motor controller.
    pub gains: PidGains,

    // ---- CONVERGENCE ----

    /// Half width of the band around the goal inside which the actuator is
    /// considered at its goal.
    ///
    /// Units: degrees
    pub tolerance_deg: f64,

    /// Named setpoints which can be selected by name.
    ///
    /// Units: degrees
    #[serde(default)]
    pub setpoints_deg: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        let mut setpoints_deg = BTreeMap::new();
        setpoints_deg.insert(String::from("stowed"), 0.0);
        setpoints_deg.insert(String::from("deployed"), 90.0);

        Self {
            gear_ratio: 1.0,
            cruise_rps: 0.5,
            accel_rps2: 0.5,
            gains: PidGains {
                k_p: 50.0,
                ..Default::default()
            },
            tolerance_deg: 2.0,
            setpoints_deg,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("gear_ratio", self.gear_ratio)?;
        require_positive("cruise_rps", self.cruise_rps)?;
        require_positive("accel_rps2", self.accel_rps2)?;
        require_non_negative("tolerance_deg", self.tolerance_deg)?;

        for (name, deg) in self.setpoints_deg.iter() {
            if !deg.is_finite() {
                return Err(ConfigError::Unsupported {
                    name: "setpoints_deg",
                    reason: format!("setpoint \"{}\" is not finite ({})", name, deg),
                });
            }
        }

        Ok(())
    }
}
