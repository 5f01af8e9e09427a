//! Per cycle target snapshot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::RawDetection;
use nalgebra::{Vector2, Vector3};
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The best target seen in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetObs {
    /// Camera to target translation, X forward, Y left, Z up.
    ///
    /// Units: meters,
    /// Frame: Camera
    pub offset_m: Vector3<f64>,

    /// Units: degrees
    pub bearing_deg: f64,

    /// Units: degrees
    pub elevation_deg: f64,

    pub id: i32,
}

/// The tracker's view of the target for one cycle.
///
/// A snapshot is never modified, the next cycle replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TargetSnapshot {
    NoTarget,
    Target(TargetObs),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for TargetSnapshot {
    fn default() -> Self {
        TargetSnapshot::NoTarget
    }
}

impl TargetSnapshot {
    /// Build a snapshot from a frontend detection.
    ///
    /// A detection claiming a target but without a translation, or with any
    /// non-finite value, gives `NoTarget`.
    pub fn from_detection(det: &RawDetection) -> Self {
        if !det.has_target {
            return TargetSnapshot::NoTarget;
        }

        let offset = match det.best_offset_m {
            Some(o) => Vector3::from(o),
            None => return TargetSnapshot::NoTarget,
        };

        let all_finite = offset.iter().all(|v| v.is_finite())
            && det.bearing_deg.is_finite()
            && det.elevation_deg.is_finite();
        if !all_finite {
            return TargetSnapshot::NoTarget;
        }

        TargetSnapshot::Target(TargetObs {
            offset_m: offset,
            bearing_deg: det.bearing_deg,
            elevation_deg: det.elevation_deg,
            id: det.id,
        })
    }

    pub fn is_present(&self) -> bool {
        matches!(self, TargetSnapshot::Target(_))
    }

    pub fn target(&self) -> Option<&TargetObs> {
        match self {
            TargetSnapshot::Target(t) => Some(t),
            TargetSnapshot::NoTarget => None,
        }
    }

    /// Distance to the target in the XY plane, ignoring height.
    ///
    /// Units: meters
    pub fn horizontal_range_m(&self) -> Option<f64> {
        self.target().map(|t| t.offset_m.x.hypot(t.offset_m.y))
    }

    /// Bearing as reported by the frontend.
    ///
    /// Units: degrees
    pub fn bearing_deg(&self) -> Option<f64> {
        self.target().map(|t| t.bearing_deg)
    }

    /// Elevation as reported by the frontend.
    ///
    /// Units: degrees
    pub fn elevation_deg(&self) -> Option<f64> {
        self.target().map(|t| t.elevation_deg)
    }

    pub fn id(&self) -> Option<i32> {
        self.target().map(|t| t.id)
    }

    /// The XY translation to the target after the robot has moved at
    /// `vel_ms` for `latency_s`.
    ///
    /// Units: meters
    pub fn predicted_offset_m(&self, vel_ms: Vector2<f64>, latency_s: f64) -> Option<Vector2<f64>> {
        self.target()
            .map(|t| Vector2::new(t.offset_m.x, t.offset_m.y) - vel_ms * latency_s)
    }

    /// The bearing of the target after the robot has moved at `vel_ms` for
    /// `latency_s`.
    ///
    /// Units: degrees
    pub fn compensated_bearing_deg(&self, vel_ms: Vector2<f64>, latency_s: f64) -> Option<f64> {
        self.predicted_offset_m(vel_ms, latency_s)
            .map(|p| p.y.atan2(p.x).to_degrees())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn snapshot(offset: [f64; 3]) -> TargetSnapshot {
        TargetSnapshot::from_detection(&RawDetection::with_target(
            Utc::now(),
            offset,
            10.0,
            -3.0,
            4,
        ))
    }

    #[test]
    fn test_no_target() {
        let snap = TargetSnapshot::from_detection(&RawDetection::no_target(Utc::now()));
        let vel = Vector2::new(1.0, 0.5);

        assert!(!snap.is_present());
        assert_eq!(snap.horizontal_range_m(), None);
        assert_eq!(snap.bearing_deg(), None);
        assert_eq!(snap.elevation_deg(), None);
        assert_eq!(snap.id(), None);
        assert_eq!(snap.predicted_offset_m(vel, 0.05), None);
        assert_eq!(snap.compensated_bearing_deg(vel, 0.05), None);
    }

    #[test]
    fn test_flag_without_translation() {
        let mut det = RawDetection::with_target(Utc::now(), [1.0, 0.0, 0.0], 0.0, 0.0, 1);
        det.best_offset_m = None;
        assert_eq!(TargetSnapshot::from_detection(&det), TargetSnapshot::NoTarget);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(!snapshot([f64::NAN, 0.0, 0.0]).is_present());

        let det = RawDetection::with_target(Utc::now(), [1.0, 0.0, 0.0], f64::INFINITY, 0.0, 1);
        assert!(!TargetSnapshot::from_detection(&det).is_present());
    }

    #[test]
    fn test_passthrough() {
        let snap = snapshot([3.0, 4.0, 12.0]);
        assert!(snap.is_present());
        assert_eq!(snap.bearing_deg(), Some(10.0));
        assert_eq!(snap.elevation_deg(), Some(-3.0));
        assert_eq!(snap.id(), Some(4));
        // Height is ignored
        assert_eq!(snap.horizontal_range_m(), Some(5.0));
    }

    #[test]
    fn test_forward_motion_compensation() {
        let snap = snapshot([2.0, 0.0, 0.0]);
        let vel = Vector2::new(1.0, 0.0);

        assert_eq!(snap.predicted_offset_m(vel, 0.5), Some(Vector2::new(1.5, 0.0)));
        assert_eq!(snap.compensated_bearing_deg(vel, 0.5), Some(0.0));
    }

    #[test]
    fn test_diagonal_target() {
        let snap = snapshot([1.0, 1.0, 0.0]);

        for latency in [0.0, 0.05, 0.5, 3.0].iter() {
            let b = snap.compensated_bearing_deg(Vector2::zeros(), *latency).unwrap();
            assert!((b - 45.0).abs() < 1e-12);
        }

        let r = snap.horizontal_range_m().unwrap();
        assert!((r - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_motion_compensation() {
        // Robot strafing left, so the target appears to swing right
        let snap = snapshot([2.0, 0.0, 0.0]);
        let b = snap
            .compensated_bearing_deg(Vector2::new(0.0, 2.0), 1.0)
            .unwrap();
        assert!((b + 45.0).abs() < 1e-12);
    }
}
