//! Aim control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::params::{require_non_negative, ConfigError, Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for aim control
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Params {
    /// Maximum magnitude of the demanded rotation.
    ///
    /// Units: radians/second
    pub max_rot_rate_rads: f64,

    /// Proportional gain used until the dashboard provides one.
    ///
    /// Units: (radians/second)/radian
    pub default_k_p: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            max_rot_rate_rads: std::f64::consts::PI,
            default_k_p: 3.0,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("max_rot_rate_rads", self.max_rot_rate_rads)?;
        require_non_negative("default_k_p", self.default_k_p)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let mut p = Params::default();
        p.max_rot_rate_rads = -1.0;
        assert_eq!(
            p.validate(),
            Err(ConfigError::Negative {
                name: "max_rot_rate_rads",
                value: -1.0
            })
        );

        let mut p = Params::default();
        p.default_k_p = f64::INFINITY;
        assert!(p.validate().is_err());
    }
}
