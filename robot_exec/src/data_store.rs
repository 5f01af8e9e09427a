//! # Data Store

use log::trace;

use crate::{act_ctrl, aim_ctrl, telemetry::Dashboard, tgt_track, vel_ctrl};
use comms_if::eqpt::{DriveDem, ProfiledPositionDem, VelocityDem};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Time since the start of the session
    pub elapsed_s: f64,

    // Operator input
    /// Operator translation demand in the robot frame, meters/second
    pub operator_vel_ms: (f64, f64),

    // ActCtrl
    pub act_ctrl_input: act_ctrl::InputData,
    pub act_ctrl_output: Option<ProfiledPositionDem>,
    pub act_ctrl_status_rpt: act_ctrl::StatusReport,

    // VelCtrl
    pub vel_ctrl_output: Option<VelocityDem>,
    pub vel_ctrl_status_rpt: vel_ctrl::StatusReport,

    // TgtTrack
    pub tgt_track_input: tgt_track::InputData,
    pub tgt_track_output: tgt_track::TargetSnapshot,
    pub tgt_track_status_rpt: tgt_track::StatusReport,

    // AimCtrl
    pub aim_ctrl_output: DriveDem,
    pub aim_ctrl_status_rpt: aim_ctrl::StatusReport,

    /// Operator dashboard, also the source of the runtime tunables
    pub dashboard: Dashboard,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of cycle overruns since the start
    pub num_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    /// The dashboard is not cleared, it holds the last published value of every key.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u64).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.act_ctrl_input = act_ctrl::InputData::default();
        self.act_ctrl_output = None;
        self.act_ctrl_status_rpt = act_ctrl::StatusReport::default();

        self.vel_ctrl_output = None;
        self.vel_ctrl_status_rpt = vel_ctrl::StatusReport::default();

        self.tgt_track_input = tgt_track::InputData::default();
        self.tgt_track_output = tgt_track::TargetSnapshot::NoTarget;
        self.tgt_track_status_rpt = tgt_track::StatusReport::default();

        self.aim_ctrl_output = DriveDem::Idle;
        self.aim_ctrl_status_rpt = aim_ctrl::StatusReport::default();

        self.elapsed_s = util::session::get_elapsed_seconds();

        trace!("Cycle {} start at {:.3} s", self.num_cycles, self.elapsed_s);
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }

    /// Record the result of comparing the cycle's duration with the target period.
    pub fn record_overrun(&mut self, overran: bool) {
        if overran {
            self.num_consec_cycle_overruns += 1;
            self.num_cycle_overruns += 1;
        }
        else {
            self.num_consec_cycle_overruns = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cycle_start() {
        let mut ds = DataStore::default();
        ds.act_ctrl_input.new_goal_deg = Some(10.0);
        ds.aim_ctrl_output = DriveDem::Velocity {
            vx_ms: 1.0,
            vy_ms: 0.0,
            rot_rads: 0.5,
        };

        ds.cycle_start(50.0);
        assert!(ds.is_1_hz_cycle);
        assert_eq!(ds.act_ctrl_input.new_goal_deg, None);
        assert!(ds.aim_ctrl_output.is_idle());

        ds.cycle_end();
        ds.cycle_start(50.0);
        assert!(!ds.is_1_hz_cycle);
        assert_eq!(ds.num_cycles, 1);
    }

    #[test]
    fn test_overruns() {
        let mut ds = DataStore::default();
        ds.record_overrun(true);
        ds.record_overrun(true);
        assert_eq!(ds.num_consec_cycle_overruns, 2);

        ds.record_overrun(false);
        assert_eq!(ds.num_consec_cycle_overruns, 0);
        assert_eq!(ds.num_cycle_overruns, 2);
    }
}
