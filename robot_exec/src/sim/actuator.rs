//! Simulated profiled position motor controller

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::ProfiledPositionDem;
use util::maths::clamp_abs;

use crate::act_ctrl::ActuatorDriver;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A motor controller following trapezoidal profiles with perfect tracking.
#[derive(Debug, Clone)]
pub struct SimActuator {
    /// Units: motor rotations
    position_rot: f64,

    /// Units: motor rotations/second
    velocity_rps: f64,

    period_s: f64,

    last_dem: Option<ProfiledPositionDem>,

    num_dems: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimActuator {
    /// Create a new actuator at rest at the given position.
    pub fn new(position_rot: f64, period_s: f64) -> Self {
        Self {
            position_rot,
            velocity_rps: 0.0,
            period_s,
            last_dem: None,
            num_dems: 0,
        }
    }

    pub fn velocity_rps(&self) -> f64 {
        self.velocity_rps
    }

    pub fn last_dem(&self) -> Option<&ProfiledPositionDem> {
        self.last_dem.as_ref()
    }

    /// Number of demands received since creation.
    pub fn num_dems(&self) -> u64 {
        self.num_dems
    }

    /// Advance the profile by one period toward the demand.
    fn step(&mut self, dem: &ProfiledPositionDem) {
        let dt = self.period_s;
        let accel = dem.accel_rps2;
        let error = dem.target_rot - self.position_rot;

        // Fastest speed from which we can still stop at the target
        let v_des = (2.0 * accel * error.abs())
            .sqrt()
            .min(dem.cruise_rps)
            .copysign(error);

        self.velocity_rps += clamp_abs(v_des - self.velocity_rps, accel * dt);

        let new_pos = self.position_rot + self.velocity_rps * dt;
        let new_error = dem.target_rot - new_pos;

        // Settle on the target once we would reach it at a speed we can kill in one step
        let crossed = new_error == 0.0 || new_error.signum() != error.signum();
        if crossed && self.velocity_rps.abs() <= 2.0 * accel * dt {
            self.position_rot = dem.target_rot;
            self.velocity_rps = 0.0;
        }
        else {
            self.position_rot = new_pos;
        }
    }
}

impl ActuatorDriver for SimActuator {
    fn apply_profiled_position(&mut self, dem: ProfiledPositionDem) {
        self.step(&dem);
        self.last_dem = Some(dem);
        self.num_dems += 1;
    }

    fn measured_position_rot(&self) -> f64 {
        self.position_rot
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::PidGains;

    fn dem(target_rot: f64) -> ProfiledPositionDem {
        ProfiledPositionDem {
            target_rot,
            cruise_rps: 1.0,
            accel_rps2: 2.0,
            gains: PidGains::default(),
        }
    }

    #[test]
    fn test_respects_limits() {
        let mut sim = SimActuator::new(0.0, 0.01);
        let mut prev_v = 0.0;

        for _ in 0..300 {
            sim.apply_profiled_position(dem(2.0));
            let v = sim.velocity_rps();
            assert!(v.abs() <= 1.0 + 1e-9);
            assert!((v - prev_v).abs() <= 2.0 * 0.01 + 1e-9 || v == 0.0);
            prev_v = v;
        }

        assert_eq!(sim.measured_position_rot(), 2.0);
        assert_eq!(sim.velocity_rps(), 0.0);
        assert_eq!(sim.num_dems(), 300);
    }

    #[test]
    fn test_holds_at_target() {
        let mut sim = SimActuator::new(-1.0, 0.02);
        for _ in 0..10 {
            sim.apply_profiled_position(dem(-1.0));
            assert_eq!(sim.measured_position_rot(), -1.0);
        }
    }
}
