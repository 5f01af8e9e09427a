//! Parameters structure for VelCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::PidGains;
use serde::{Deserialize, Serialize};
use util::params::{require_non_negative, ConfigError, Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for velocity control.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Params {
    /// Closed loop gains loaded into the motor controller.
    pub gains: PidGains,

    /// Speed demanded when the module starts.
    ///
    /// Units: motor rotations/second
    #[serde(default)]
    pub initial_target_rps: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            gains: PidGains {
                k_p: 0.12,
                k_v: 0.12,
                ..Default::default()
            },
            initial_target_rps: 0.0,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("gains.k_p", self.gains.k_p)?;
        require_non_negative("gains.k_i", self.gains.k_i)?;
        require_non_negative("gains.k_d", self.gains.k_d)?;
        require_non_negative("gains.k_v", self.gains.k_v)?;

        if self.initial_target_rps.is_finite() {
            Ok(())
        }
        else {
            Err(ConfigError::Unsupported {
                name: "initial_target_rps",
                reason: format!("{} is not a finite speed", self.initial_target_rps),
            })
        }
    }
}
