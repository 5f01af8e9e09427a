//! Simulated closed loop velocity motor controller

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::VelocityDem;

use crate::vel_ctrl::VelocityDriver;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A motor whose speed follows the demand with a first order lag.
#[derive(Debug, Clone)]
pub struct SimVelocity {
    /// Units: motor rotations/second
    velocity_rps: f64,

    /// Fraction of the error removed per demand, between 0 and 1.
    response: f64,

    last_dem: Option<VelocityDem>,

    num_dems: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimVelocity {
    pub fn new(response: f64) -> Self {
        Self {
            velocity_rps: 0.0,
            response: response.max(0.0).min(1.0),
            last_dem: None,
            num_dems: 0,
        }
    }

    pub fn velocity_rps(&self) -> f64 {
        self.velocity_rps
    }

    pub fn last_dem(&self) -> Option<&VelocityDem> {
        self.last_dem.as_ref()
    }

    pub fn num_dems(&self) -> u64 {
        self.num_dems
    }
}

impl VelocityDriver for SimVelocity {
    fn apply_velocity(&mut self, dem: VelocityDem) {
        self.velocity_rps += (dem.target_rps - self.velocity_rps) * self.response;
        self.last_dem = Some(dem);
        self.num_dems += 1;
    }
}
