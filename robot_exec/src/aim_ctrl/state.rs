//! Implementations for the AimCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{AimCtrlError, Params};
use crate::{
    telemetry::{keys, TelemetrySink, TunableSource},
    tgt_track::TargetSnapshot,
};
use comms_if::eqpt::DriveDem;
use util::{
    archive::{Archived, Archiver},
    maths::clamp_abs,
    module::State,
    params::Validate,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Aim control module state
pub struct AimCtrl {
    params: Params,

    last_dem: DriveDem,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Values which can be changed while the robot is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimTunables {
    /// Units: (radians/second)/radian
    pub k_p: f64,

    /// Units: seconds
    pub latency_s: f64,
}

/// Input data to aim control.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Operator translation demand as `(vx, vy)` in the robot frame.
    ///
    /// Units: meters/second
    pub operator_vel_ms: (f64, f64),

    /// Latest target snapshot from the tracker.
    pub snapshot: TargetSnapshot,

    pub tunables: AimTunables,
}

/// Status report for aim control.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub has_target: bool,

    /// Units: degrees
    pub compensated_bearing_deg: Option<f64>,

    /// Units: radians/second
    pub rot_rads: f64,

    /// True if the rotation was limited to the maximum rate.
    pub saturated: bool,

    /// True if the correction was not a finite number and was zeroed.
    pub invalid_correction: bool,

    pub k_p: f64,

    /// Units: seconds
    pub latency_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AimCtrl {

    pub fn new(params: &Params) -> Result<Self, AimCtrlError> {
        params.validate()?;

        Ok(Self {
            params: params.clone(),
            last_dem: DriveDem::Idle,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Start archiving the status report into the session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report = Archiver::from_path(session, "aim_ctrl/status_report.csv")?;
        Ok(())
    }

    /// The tunables to use with their default values.
    ///
    /// The latency default is owned by the target tracker, see
    /// [`TgtTracker::default_latency_s`](crate::tgt_track::TgtTracker::default_latency_s).
    pub fn default_tunables(&self, default_latency_s: f64) -> AimTunables {
        AimTunables {
            k_p: self.params.default_k_p,
            latency_s: default_latency_s,
        }
    }

    /// Read the tunables from the dashboard.
    ///
    /// Missing values take their default. Values which could not be used (non-finite or negative)
    /// are also replaced by the default, and a warning is raised.
    pub fn read_tunables(&self, source: &dyn TunableSource, default_latency_s: f64) -> AimTunables {
        let defaults = self.default_tunables(default_latency_s);

        AimTunables {
            k_p: tunable_or_default(source, keys::AIM_K_P, defaults.k_p),
            latency_s: tunable_or_default(source, keys::LATENCY_S, defaults.latency_s),
        }
    }

    /// Calculate the drive demand for one aim cycle.
    ///
    /// The translation in the demand is always `(vx_ms, vy_ms)`, only the rotation is computed.
    pub fn aim(
        &mut self,
        vx_ms: f64,
        vy_ms: f64,
        snapshot: &TargetSnapshot,
        tunables: AimTunables,
    ) -> DriveDem {
        let bearing_deg =
            snapshot.compensated_bearing_deg(Vector2::new(vx_ms, vy_ms), tunables.latency_s);

        let max = self.params.max_rot_rate_rads;
        let mut invalid_correction = false;
        let mut saturated = false;

        let rot_rads = match bearing_deg {
            Some(b) => {
                let unclamped = tunables.k_p * b.to_radians();
                if unclamped.is_finite() {
                    saturated = unclamped.abs() > max;
                    clamp_abs(unclamped, max)
                }
                else {
                    warn!("Aim correction is not finite (bearing {} deg), holding heading", b);
                    invalid_correction = true;
                    0.0
                }
            }
            None => 0.0,
        };

        if snapshot.is_present() != self.report.has_target {
            debug!("Aiming {}", if snapshot.is_present() { "at target" } else { "idle, no target" });
        }

        self.report = StatusReport {
            has_target: snapshot.is_present(),
            compensated_bearing_deg: bearing_deg,
            rot_rads,
            saturated,
            invalid_correction,
            k_p: tunables.k_p,
            latency_s: tunables.latency_s,
        };

        self.last_dem = DriveDem::Velocity {
            vx_ms,
            vy_ms,
            rot_rads,
        };

        self.last_dem
    }

    /// The demand to send when aiming stops, interrupted or not.
    pub fn end(&mut self) -> DriveDem {
        debug!("Aim ended, releasing the drivetrain");
        self.last_dem = DriveDem::Idle;
        self.last_dem
    }

    pub fn last_dem(&self) -> DriveDem {
        self.last_dem
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    /// Publish the last aim cycle to the dashboard.
    pub fn publish(&self, sink: &mut dyn TelemetrySink) {
        match self.report.compensated_bearing_deg {
            Some(b) => {
                sink.put_number(keys::PREDICTED_YAW_DEG, b);
                sink.put_string(keys::TARGET_STATUS, "Target");
            }
            None => sink.put_string(keys::TARGET_STATUS, "NoTarget"),
        }
    }
}

impl State for AimCtrl {
    type InputData = InputData;
    type OutputData = DriveDem;
    type StatusReport = StatusReport;
    type ProcError = AimCtrlError;

    /// Perform cyclic processing of aim control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let (vx, vy) = input_data.operator_vel_ms;
        let dem = self.aim(vx, vy, &input_data.snapshot, input_data.tunables);

        trace!("AimCtrl output: {:?}", dem);

        Ok((dem, self.report))
    }
}

impl Archived for AimCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn tunable_or_default(source: &dyn TunableSource, key: &str, default: f64) -> f64 {
    let value = source.get_number(key, default);

    if value.is_finite() && value >= 0.0 {
        value
    }
    else {
        warn!("Tunable {} = {} cannot be used, using {}", key, value, default);
        default
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::telemetry::{Dashboard, Entry};
    use chrono::Utc;
    use comms_if::eqpt::RawDetection;

    fn snapshot(offset: [f64; 3]) -> TargetSnapshot {
        TargetSnapshot::from_detection(&RawDetection::with_target(Utc::now(), offset, 0.0, 0.0, 1))
    }

    fn aim_ctrl(max_rot_rate_rads: f64) -> AimCtrl {
        let mut p = Params::default();
        p.max_rot_rate_rads = max_rot_rate_rads;
        AimCtrl::new(&p).unwrap()
    }

    #[test]
    fn test_no_target_no_rotation() {
        let mut a = aim_ctrl(1.0);
        let tun = a.default_tunables(0.05);

        let dem = a.aim(1.5, -0.5, &TargetSnapshot::NoTarget, tun);
        assert_eq!(
            dem,
            DriveDem::Velocity {
                vx_ms: 1.5,
                vy_ms: -0.5,
                rot_rads: 0.0
            }
        );
        assert!(!a.report().has_target);
        assert_eq!(a.report().compensated_bearing_deg, None);
    }

    #[test]
    fn test_centred_target() {
        let mut a = aim_ctrl(1.0);
        let tun = AimTunables {
            k_p: 3.0,
            latency_s: 0.5,
        };

        let dem = a.aim(1.0, 0.0, &snapshot([2.0, 0.0, 0.0]), tun);
        assert_eq!(dem.rot_rads(), 0.0);
        assert_eq!(dem.translation_ms(), (1.0, 0.0));
    }

    #[test]
    fn test_proportional_and_clamped() {
        // 10 degrees left
        let off = [1.0, 10f64.to_radians().tan(), 0.0];
        let tun = AimTunables {
            k_p: 3.0,
            latency_s: 0.0,
        };

        let mut a = aim_ctrl(10.0);
        let rot = a.aim(0.0, 0.0, &snapshot(off), tun).rot_rads();
        assert!((rot - 3.0 * 10f64.to_radians()).abs() < 1e-9);
        assert!(!a.report().saturated);

        let mut a = aim_ctrl(0.2);
        assert_eq!(a.aim(0.0, 0.0, &snapshot(off), tun).rot_rads(), 0.2);
        assert!(a.report().saturated);

        // 45 degrees right
        assert_eq!(a.aim(0.0, 0.0, &snapshot([1.0, -1.0, 0.0]), tun).rot_rads(), -0.2);
    }

    #[test]
    fn test_rotation_always_bounded() {
        let max = 0.75;
        let mut a = aim_ctrl(max);
        let tun = AimTunables {
            k_p: 25.0,
            latency_s: 0.05,
        };

        for i in 0..72 {
            let ang = (i as f64 * 5.0).to_radians();
            let snap = snapshot([ang.cos() * 3.0, ang.sin() * 3.0, 0.0]);

            for &(vx, vy) in &[(0.0, 0.0), (2.0, -1.0), (-3.0, 4.0)] {
                let dem = a.aim(vx, vy, &snap, tun);
                assert!(dem.rot_rads().abs() <= max);
                assert_eq!(dem.translation_ms(), (vx, vy));
            }
        }
    }

    #[test]
    fn test_non_finite_correction() {
        let mut a = aim_ctrl(1.0);
        let tun = AimTunables {
            k_p: 3.0,
            latency_s: 0.05,
        };

        let dem = a.aim(f64::NAN, 0.0, &snapshot([1.0, 1.0, 0.0]), tun);
        assert_eq!(dem.rot_rads(), 0.0);
        assert!(a.report().invalid_correction);
    }

    #[test]
    fn test_end_is_idle() {
        let mut a = aim_ctrl(1.0);
        let tun = a.default_tunables(0.05);
        a.aim(1.0, 0.0, &snapshot([1.0, 1.0, 0.0]), tun);
        assert!(!a.last_dem().is_idle());

        assert_eq!(a.end(), DriveDem::Idle);
        assert!(a.last_dem().is_idle());
    }

    #[test]
    fn test_tunables() {
        let a = aim_ctrl(1.0);
        let mut dash = Dashboard::default();

        assert_eq!(
            a.read_tunables(&dash, 0.05),
            AimTunables {
                k_p: 3.0,
                latency_s: 0.05
            }
        );

        dash.put_number(keys::AIM_K_P, 5.0);
        dash.put_number(keys::LATENCY_S, -0.1);
        assert_eq!(
            a.read_tunables(&dash, 0.05),
            AimTunables {
                k_p: 5.0,
                latency_s: 0.05
            }
        );
    }

    #[test]
    fn test_invalid_params() {
        let mut p = Params::default();
        p.default_k_p = -3.0;
        assert!(matches!(AimCtrl::new(&p), Err(AimCtrlError::InvalidConfig(_))));
    }

    #[test]
    fn test_proc_and_publish() {
        let mut a = aim_ctrl(1.0);
        let mut dash = Dashboard::default();

        let input = InputData {
            operator_vel_ms: (0.5, 0.0),
            snapshot: TargetSnapshot::NoTarget,
            tunables: a.default_tunables(0.05),
        };
        let (dem, report) = a.proc(&input).unwrap();
        assert_eq!(dem.rot_rads(), 0.0);
        assert!(!report.has_target);

        a.publish(&mut dash);
        assert_eq!(
            dash.get(keys::TARGET_STATUS),
            Some(&Entry::String(String::from("NoTarget")))
        );
        assert_eq!(dash.get(keys::PREDICTED_YAW_DEG), None);

        let input = InputData {
            snapshot: snapshot([1.0, 0.0, 0.0]),
            ..input
        };
        a.proc(&input).unwrap();
        a.publish(&mut dash);
        assert_eq!(
            dash.get(keys::TARGET_STATUS),
            Some(&Entry::String(String::from("Target")))
        );
        assert_eq!(dash.get(keys::PREDICTED_YAW_DEG), Some(&Entry::Number(0.0)));
    }

    #[test]
    fn test_saturation_flag() {
        let tun = AimTunables {
            k_p: 3.0,
            latency_s: 0.0,
        };

        // A centred target never saturates, even with no rotation allowed
        let mut a = aim_ctrl(0.0);
        assert_eq!(a.aim(0.0, 0.0, &snapshot([2.0, 0.0, 0.0]), tun).rot_rads(), 0.0);
        assert!(!a.report().saturated);

        assert_eq!(a.aim(0.0, 0.0, &snapshot([1.0, 1.0, 0.0]), tun).rot_rads(), 0.0);
        assert!(a.report().saturated);

        // Just inside the limit is not saturated
        let mut a = aim_ctrl(3.0 * 45f64.to_radians() + 1e-9);
        a.aim(0.0, 0.0, &snapshot([1.0, 1.0, 0.0]), tun);
        assert!(!a.report().saturated);
    }

    #[test]
    fn test_latency_default_passed_in() {
        let a = aim_ctrl(1.0);
        let dash = Dashboard::default();

        assert_eq!(a.read_tunables(&dash, 0.3).latency_s, 0.3);
        assert_eq!(a.default_tunables(0.0).latency_s, 0.0);
    }
}
