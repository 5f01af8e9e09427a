//! # Commands
//!
//! A command is a unit of behaviour run against a subsystem by the scheduler. The scheduler
//! calls `initialize` once, then `execute` once per cycle until `is_finished` returns true or
//! the command is interrupted, and finally `end`.
//!
//! Commands here are generic over the thing they act on, so a command only borrows its
//! subsystem for the duration of each call.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};

use crate::{
    act_ctrl::{ActCtrl, ActuatorDriver},
    aim_ctrl::{self, AimCtrl, Drivetrain},
    telemetry::{TelemetrySink, TunableSource},
    tgt_track::TgtTracker,
    vel_ctrl::{self, VelCtrl, VelocityDriver},
};
use comms_if::eqpt::DriveDem;
use util::module::State;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Lifecycle hooks of a scheduled command acting on `S`.
pub trait Command<S> {
    fn initialize(&mut self, _sys: &mut S) {}

    fn execute(&mut self, _sys: &mut S) {}

    /// Called once when the command stops, `interrupted` is true if it did not finish by itself.
    fn end(&mut self, _sys: &mut S, _interrupted: bool) {}

    fn is_finished(&self, _sys: &S) -> bool {
        false
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The goal an [`ActGoalCmd`] moves the actuator to.
#[derive(Debug, Clone, PartialEq)]
pub enum ActGoal {
    /// Units: degrees
    Degrees(f64),

    /// One of the named setpoints in the actuator parameters.
    Named(String),
}

/// Move the actuator to a goal, finishing once it is there.
///
/// The actuator controller keeps re-asserting its goal on its own cycle, this command only
/// changes the goal.
#[derive(Debug, Clone)]
pub struct ActGoalCmd {
    goal: ActGoal,
}

/// Hold a motor at a speed until interrupted, then stop it.
#[derive(Debug, Clone)]
pub struct VelCmd {
    /// Units: motor rotations/second
    target_rps: f64,
}

/// Everything the aim command touches during one cycle.
pub struct AimContext<'a, T: TunableSource + TelemetrySink> {
    pub tracker: &'a TgtTracker,

    pub drive: &'a mut dyn Drivetrain,

    pub dashboard: &'a mut T,

    /// Operator translation demand in the robot frame.
    ///
    /// Units: meters/second
    pub operator_vel_ms: (f64, f64),
}

/// Keep the robot turned toward the target while the operator drives. Never finishes by itself.
pub struct AimCmd {
    ctrl: AimCtrl,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActGoalCmd {
    pub fn new(goal: ActGoal) -> Self {
        Self { goal }
    }

    pub fn goal(&self) -> &ActGoal {
        &self.goal
    }
}

impl<D: ActuatorDriver> Command<ActCtrl<D>> for ActGoalCmd {
    fn initialize(&mut self, sys: &mut ActCtrl<D>) {
        let res = match &self.goal {
            ActGoal::Degrees(deg) => sys.set_goal(*deg),
            ActGoal::Named(name) => sys.set_goal_named(name),
        };

        if let Err(e) = res {
            warn!("{}, holding the current goal", e);
        }
    }

    fn is_finished(&self, sys: &ActCtrl<D>) -> bool {
        sys.at_goal()
    }
}

impl VelCmd {
    pub fn new(target_rps: f64) -> Self {
        Self { target_rps }
    }

    fn assert_target<D: VelocityDriver>(&self, sys: &mut VelCtrl<D>) {
        let input = vel_ctrl::InputData {
            new_target_rps: Some(self.target_rps),
        };

        if let Err(e) = sys.proc(&input) {
            warn!("Velocity command failed: {}", e);
        }
    }
}

impl<D: VelocityDriver> Command<VelCtrl<D>> for VelCmd {
    fn initialize(&mut self, sys: &mut VelCtrl<D>) {
        self.assert_target(sys);
    }

    fn execute(&mut self, sys: &mut VelCtrl<D>) {
        self.assert_target(sys);
    }

    fn end(&mut self, sys: &mut VelCtrl<D>, interrupted: bool) {
        debug!("Velocity command ended (interrupted: {})", interrupted);
        sys.stop();
    }
}

impl AimCmd {
    pub fn new(ctrl: AimCtrl) -> Self {
        Self { ctrl }
    }

    pub fn ctrl(&self) -> &AimCtrl {
        &self.ctrl
    }

    pub fn ctrl_mut(&mut self) -> &mut AimCtrl {
        &mut self.ctrl
    }
}

impl<'a, T: TunableSource + TelemetrySink> Command<AimContext<'a, T>> for AimCmd {
    fn execute(&mut self, ctx: &mut AimContext<'a, T>) {
        let input = aim_ctrl::InputData {
            operator_vel_ms: ctx.operator_vel_ms,
            snapshot: *ctx.tracker.latest(),
            tunables: self
                .ctrl
                .read_tunables(&*ctx.dashboard, ctx.tracker.default_latency_s()),
        };

        let dem = match self.ctrl.proc(&input) {
            Ok((dem, _)) => dem,
            Err(e) => {
                warn!("Aim processing failed: {}", e);
                DriveDem::Idle
            }
        };

        ctx.drive.apply(dem);
        self.ctrl.publish(&mut *ctx.dashboard);
    }

    fn end(&mut self, ctx: &mut AimContext<'a, T>, interrupted: bool) {
        debug!("Aim command ended (interrupted: {})", interrupted);
        let dem = self.ctrl.end();
        ctx.drive.apply(dem);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        act_ctrl, sim::{self, SimActuator, SimVelocity, SimWorld}, telemetry::Dashboard, tgt_track,
    };
    use chrono::Utc;
    use comms_if::eqpt::{FrontendCaps, RawDetection};
    use crate::tgt_track::VisionFrontend;

    #[derive(Default)]
    struct RecordingDrive {
        dems: Vec<DriveDem>,
    }

    impl Drivetrain for RecordingDrive {
        fn apply(&mut self, dem: DriveDem) {
            self.dems.push(dem);
        }
    }

    /// Run one aim cycle at a fixed target with the given tracker default latency.
    fn aim_rot_with_default_latency(default_latency_s: f64) -> f64 {
        let mut p = tgt_track::Params::default();
        p.default_latency_s = default_latency_s;
        let mut tracker = TgtTracker::new(&p, &FrontendCaps::default()).unwrap();
        tracker.update(Some(&RawDetection::with_target(Utc::now(), [4.0, 1.0, 0.0], 0.0, 0.0, 1)));

        let mut cmd = AimCmd::new(AimCtrl::new(&aim_ctrl::Params::default()).unwrap());
        let mut drive = RecordingDrive::default();
        let mut dash = Dashboard::default();

        let mut ctx = AimContext {
            tracker: &tracker,
            drive: &mut drive,
            dashboard: &mut dash,
            operator_vel_ms: (0.0, 1.0),
        };
        cmd.execute(&mut ctx);

        assert_eq!(cmd.ctrl().report().latency_s, default_latency_s);
        drive.dems.last().unwrap().rot_rads()
    }

    #[test]
    fn test_act_goal_cmd() {
        let mut act = ActCtrl::new(SimActuator::new(0.0, 0.02), &act_ctrl::Params::default())
            .unwrap();
        let mut cmd = ActGoalCmd::new(ActGoal::Named(String::from("deployed")));

        cmd.initialize(&mut act);
        assert_eq!(act.goal_deg(), 90.0);
        assert!(!cmd.is_finished(&act));

        let mut cycles = 0;
        while !cmd.is_finished(&act) && cycles < 1000 {
            act.proc(&act_ctrl::InputData::default()).unwrap();
            cmd.execute(&mut act);
            cycles += 1;
        }
        assert!(cmd.is_finished(&act));
        cmd.end(&mut act, false);

        // Unknown setpoints keep the old goal
        let mut cmd = ActGoalCmd::new(ActGoal::Named(String::from("launch")));
        cmd.initialize(&mut act);
        assert_eq!(act.goal_deg(), 90.0);
    }

    #[test]
    fn test_vel_cmd() {
        let mut vel = VelCtrl::new(SimVelocity::new(1.0), &vel_ctrl::Params::default()).unwrap();
        let mut cmd = VelCmd::new(-30.0);

        cmd.initialize(&mut vel);
        for _ in 0..5 {
            cmd.execute(&mut vel);
            assert!(!cmd.is_finished(&vel));
        }
        assert_eq!(vel.driver().num_dems(), 6);
        assert_eq!(vel.driver().velocity_rps(), -30.0);

        cmd.end(&mut vel, true);
        assert_eq!(vel.driver().velocity_rps(), 0.0);
        assert_eq!(vel.target_rps(), 0.0);
    }

    #[test]
    fn test_aim_cmd_turns_to_target() {
        let mut params = sim::Params::default();
        params.target_pos_m = [4.0, 1.0, 1.5];
        let mut world = SimWorld::new(&params, 0.02);

        let mut tracker =
            TgtTracker::new(&tgt_track::Params::default(), &FrontendCaps::default()).unwrap();
        let mut cmd = AimCmd::new(AimCtrl::new(&aim_ctrl::Params::default()).unwrap());
        let mut dash = Dashboard::default();

        for _ in 0..200 {
            let det = world.latest_detection();
            tracker.update(det.as_ref());

            let mut ctx = AimContext {
                tracker: &tracker,
                drive: &mut world,
                dashboard: &mut dash,
                operator_vel_ms: (0.0, 0.0),
            };
            cmd.execute(&mut ctx);
        }

        let bearing = tracker.raw_bearing_deg().unwrap();
        assert!(bearing.abs() < 0.5);
        assert!(!world.last_dem().is_idle());

        let mut ctx = AimContext {
            tracker: &tracker,
            drive: &mut world,
            dashboard: &mut dash,
            operator_vel_ms: (1.0, 0.0),
        };
        cmd.end(&mut ctx, true);
        assert!(world.last_dem().is_idle());
    }

    #[test]
    fn test_aim_cmd_uses_tracker_default_latency() {
        let rot_no_latency = aim_rot_with_default_latency(0.0);
        let rot_latency = aim_rot_with_default_latency(0.5);

        assert!(rot_no_latency > 0.0);
        assert!((rot_no_latency - rot_latency).abs() > 1e-3);
    }
}
