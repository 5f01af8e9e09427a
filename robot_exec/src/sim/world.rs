//! Simulated drivetrain and vision frontend
//!
//! The world holds a single stationary target and a holonomic robot carrying a forward facing
//! camera. Drive demands are interpreted in the robot frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::Utc;
use comms_if::eqpt::{DriveDem, FrontendCaps, RawDetection};
use nalgebra::{Rotation2, Vector2, Vector3};
use util::maths::wrap_pi;

use crate::{aim_ctrl::Drivetrain, tgt_track::VisionFrontend};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The simulated robot and its surroundings.
#[derive(Debug, Clone)]
pub struct SimWorld {
    /// Robot position in the world frame.
    ///
    /// Units: meters
    position_m: Vector2<f64>,

    /// Robot heading in the world frame, positive counter-clockwise.
    ///
    /// Units: radians
    heading_rad: f64,

    /// Units: meters
    target_pos_m: Vector3<f64>,

    target_id: i32,

    camera_height_m: f64,

    half_fov_rad: f64,

    caps: FrontendCaps,

    period_s: f64,

    last_dem: DriveDem,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimWorld {
    pub fn new(params: &super::Params, period_s: f64) -> Self {
        Self {
            position_m: Vector2::new(params.initial_pose[0], params.initial_pose[1]),
            heading_rad: params.initial_pose[2].to_radians(),
            target_pos_m: Vector3::from(params.target_pos_m),
            target_id: params.target_id,
            camera_height_m: params.camera_height_m,
            half_fov_rad: params.camera_fov_deg.to_radians() / 2.0,
            caps: FrontendCaps {
                api_version: (1, 0),
                supports_client_mode: params.supports_client_mode,
            },
            period_s,
            last_dem: DriveDem::Idle,
        }
    }

    /// Units: meters
    pub fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }

    /// Units: radians
    pub fn heading_rad(&self) -> f64 {
        self.heading_rad
    }

    pub fn last_dem(&self) -> DriveDem {
        self.last_dem
    }

    /// Camera to target translation in the robot frame.
    ///
    /// Units: meters
    pub fn target_offset_m(&self) -> Vector3<f64> {
        let world_delta = Vector2::new(
            self.target_pos_m.x - self.position_m.x,
            self.target_pos_m.y - self.position_m.y,
        );
        let robot_delta = Rotation2::new(-self.heading_rad) * world_delta;

        Vector3::new(
            robot_delta.x,
            robot_delta.y,
            self.target_pos_m.z - self.camera_height_m,
        )
    }
}

impl Drivetrain for SimWorld {
    fn apply(&mut self, dem: DriveDem) {
        if let DriveDem::Velocity { vx_ms, vy_ms, rot_rads } = dem {
            let world_vel = Rotation2::new(self.heading_rad) * Vector2::new(vx_ms, vy_ms);
            self.position_m += world_vel * self.period_s;
            self.heading_rad = wrap_pi(self.heading_rad + rot_rads * self.period_s);
        }

        self.last_dem = dem;
    }
}

impl VisionFrontend for SimWorld {
    fn caps(&self) -> FrontendCaps {
        self.caps
    }

    fn latest_detection(&mut self) -> Option<RawDetection> {
        let offset = self.target_offset_m();
        let bearing_rad = offset.y.atan2(offset.x);

        if offset.x <= 0.0 || bearing_rad.abs() > self.half_fov_rad {
            return Some(RawDetection::no_target(Utc::now()));
        }

        let elevation_rad = offset.z.atan2(offset.x.hypot(offset.y));

        Some(RawDetection::with_target(
            Utc::now(),
            [offset.x, offset.y, offset.z],
            bearing_rad.to_degrees(),
            elevation_rad.to_degrees(),
            self.target_id,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::Params;

    #[test]
    fn test_offset_follows_pose() {
        let mut params = Params::default();
        params.target_pos_m = [3.0, 0.0, 1.0];
        params.camera_height_m = 0.0;
        let mut world = SimWorld::new(&params, 0.5);

        let det = world.latest_detection().unwrap();
        assert!(det.has_target);
        assert_eq!(det.best_offset_m, Some([3.0, 0.0, 1.0]));
        assert_eq!(det.bearing_deg, 0.0);

        // Drive forward for one period at 2 m/s
        world.apply(DriveDem::Velocity { vx_ms: 2.0, vy_ms: 0.0, rot_rads: 0.0 });
        let off = world.target_offset_m();
        assert!((off.x - 2.0).abs() < 1e-12);
        assert!(off.y.abs() < 1e-12);
    }

    #[test]
    fn test_out_of_view() {
        let mut params = Params::default();
        params.target_pos_m = [0.0, 5.0, 1.0];
        params.camera_fov_deg = 60.0;
        let mut world = SimWorld::new(&params, 0.02);

        let det = world.latest_detection().unwrap();
        assert!(!det.has_target);
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut world = SimWorld::new(&Params::default(), 0.02);
        world.apply(DriveDem::Idle);
        assert_eq!(world.position_m(), Vector2::new(0.0, 0.0));
        assert_eq!(world.heading_rad(), 0.0);
        assert!(world.last_dem().is_idle());
    }
}
