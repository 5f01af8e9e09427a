//! Implementations for the ActCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::BTreeMap;

use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::{ActCtrlError, ActuatorDriver, Params};
use crate::units::UnitConverter;
use comms_if::eqpt::{PidGains, ProfiledPositionDem};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params::Validate,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Actuator control module state
pub struct ActCtrl<D: ActuatorDriver> {
    driver: D,

    conv: UnitConverter,

    /// Profile limits, already converted into motor units.
    cruise_rps: f64,
    accel_rps2: f64,
    gains: PidGains,

    tolerance_deg: f64,

    setpoints_deg: BTreeMap<String, f64>,

    /// The goal in motor rotations. Only written by `set_goal`.
    goal_rot: f64,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to Actuator Control.
#[derive(Default, Debug, Clone, Copy)]
pub struct InputData {
    /// A new goal for the actuator, or `None` to keep the current goal.
    ///
    /// Units: degrees
    pub new_goal_deg: Option<f64>,
}

/// Status report for ActCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// Units: degrees
    pub goal_deg: f64,

    /// Units: degrees
    pub position_deg: f64,

    /// Goal minus position.
    ///
    /// Units: degrees
    pub error_deg: f64,

    pub at_goal: bool,

    /// True if a new goal was refused this cycle.
    pub goal_rejected: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: ActuatorDriver> ActCtrl<D> {

    /// Create a new actuator controller.
    ///
    /// The goal is set to the position the driver currently measures, so that the actuator holds
    /// still until it is given a new goal.
    pub fn new(driver: D, params: &Params) -> Result<Self, ActCtrlError> {
        params.validate()?;

        let conv = UnitConverter::new(params.gear_ratio)?;
        let goal_rot = driver.measured_position_rot();

        debug!(
            "ActCtrl holding initial position {:.3} deg (gear ratio {})",
            conv.to_physical(goal_rot),
            params.gear_ratio
        );

        Ok(Self {
            driver,
            conv,
            cruise_rps: conv.rate_to_mechanism(params.cruise_rps),
            accel_rps2: conv.rate_to_mechanism(params.accel_rps2),
            gains: params.gains,
            tolerance_deg: params.tolerance_deg,
            setpoints_deg: params.setpoints_deg.clone(),
            goal_rot,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Start archiving the status report into the session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report = Archiver::from_path(session, "act_ctrl/status_report.csv")?;
        Ok(())
    }

    /// Set a new goal for the actuator.
    ///
    /// The goal is not checked against the actuator's travel. An unreachable
    /// goal means `at_goal` never becomes true. A non-finite goal is refused
    /// and the previous goal kept.
    ///
    /// Units: degrees
    pub fn set_goal(&mut self, goal_deg: f64) -> Result<(), ActCtrlError> {
        if !goal_deg.is_finite() {
            return Err(ActCtrlError::InvalidGoal(goal_deg));
        }

        self.goal_rot = self.conv.to_mechanism(goal_deg);
        debug!("New ActCtrl goal: {:.3} deg ({:.4} rot)", goal_deg, self.goal_rot);

        Ok(())
    }

    /// Set the goal to one of the named setpoints from the parameters.
    pub fn set_goal_named(&mut self, name: &str) -> Result<(), ActCtrlError> {
        match self.setpoints_deg.get(name) {
            Some(deg) => {
                let deg = *deg;
                self.set_goal(deg)
            }
            None => Err(ActCtrlError::UnknownSetpoint(name.to_string())),
        }
    }

    /// Issue the profiled position demand for the current goal to the driver.
    ///
    /// Must be called once every cycle.
    pub fn tick(&mut self) -> ProfiledPositionDem {
        let dem = ProfiledPositionDem {
            target_rot: self.goal_rot,
            cruise_rps: self.cruise_rps,
            accel_rps2: self.accel_rps2,
            gains: self.gains,
        };

        self.driver.apply_profiled_position(dem);

        dem
    }

    /// The position of the output shaft, read from the driver on every call.
    ///
    /// Units: degrees
    pub fn current_physical_position(&self) -> f64 {
        self.conv.to_physical(self.driver.measured_position_rot())
    }

    /// True if the output shaft is within the tolerance band of the goal.
    pub fn at_goal(&self) -> bool {
        (self.current_physical_position() - self.goal_deg()).abs() <= self.tolerance_deg
    }

    /// Units: degrees
    pub fn goal_deg(&self) -> f64 {
        self.conv.to_physical(self.goal_rot)
    }

    /// Units: motor rotations
    pub fn goal_rot(&self) -> f64 {
        self.goal_rot
    }

    pub fn tolerance_deg(&self) -> f64 {
        self.tolerance_deg
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.conv
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: ActuatorDriver> State for ActCtrl<D> {
    type InputData = InputData;
    type OutputData = ProfiledPositionDem;
    type StatusReport = StatusReport;
    type ProcError = ActCtrlError;

    /// Perform cyclic processing of Actuator Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut goal_rejected = false;

        if let Some(goal_deg) = input_data.new_goal_deg {
            if let Err(e) = self.set_goal(goal_deg) {
                warn!("{}", e);
                goal_rejected = true;
            }
        }

        let dem = self.tick();

        let position_deg = self.current_physical_position();
        let goal_deg = self.goal_deg();
        self.report = StatusReport {
            goal_deg,
            position_deg,
            error_deg: goal_deg - position_deg,
            at_goal: self.at_goal(),
            goal_rejected,
        };

        trace!(
            "ActCtrl output: target {:.4} rot, position {:.3} deg, at goal {}",
            dem.target_rot,
            position_deg,
            self.report.at_goal
        );

        Ok((dem, self.report))
    }
}

impl<D: ActuatorDriver> Archived for ActCtrl<D> {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimActuator;

    /// Driver which records every demand and never moves.
    struct RecordingDriver {
        position_rot: f64,
        dems: Vec<ProfiledPositionDem>,
    }

    impl ActuatorDriver for RecordingDriver {
        fn apply_profiled_position(&mut self, dem: ProfiledPositionDem) {
            self.dems.push(dem);
        }

        fn measured_position_rot(&self) -> f64 {
            self.position_rot
        }
    }

    fn recording(position_rot: f64) -> RecordingDriver {
        RecordingDriver {
            position_rot,
            dems: Vec::new(),
        }
    }

    #[test]
    fn test_holds_initial_position() {
        let mut params = Params::default();
        params.gear_ratio = 25.0;

        let mut act = ActCtrl::new(recording(12.5), &params).unwrap();

        // 12.5 motor rotations at 25:1 is half an output turn
        assert_eq!(act.goal_rot(), 12.5);
        assert_eq!(act.goal_deg(), 180.0);
        assert!(act.at_goal());

        let dem = act.tick();
        assert_eq!(dem.target_rot, 12.5);
    }

    #[test]
    fn test_sim_start_from_converter() {
        let mut params = Params::default();
        params.gear_ratio = 25.0;
        let units = UnitConverter::new(params.gear_ratio).unwrap();

        let act = ActCtrl::new(SimActuator::new(units.to_mechanism(-30.0), 0.02), &params)
            .unwrap();
        assert!((act.current_physical_position() + 30.0).abs() < 1e-9);
        assert!((act.goal_deg() + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_limits_converted_once() {
        let mut params = Params::default();
        params.gear_ratio = 25.0;
        params.cruise_rps = 0.5;
        params.accel_rps2 = 2.0;

        let mut act = ActCtrl::new(recording(0.0), &params).unwrap();
        let dem = act.tick();

        assert_eq!(dem.cruise_rps, 12.5);
        assert_eq!(dem.accel_rps2, 50.0);
        assert_eq!(dem.gains.k_p, 50.0);
    }

    #[test]
    fn test_invalid_config() {
        let mut params = Params::default();
        params.gear_ratio = -1.0;
        assert!(matches!(
            ActCtrl::new(recording(0.0), &params),
            Err(ActCtrlError::InvalidConfig(_))
        ));

        let mut params = Params::default();
        params.tolerance_deg = -0.1;
        assert!(ActCtrl::new(recording(0.0), &params).is_err());
    }

    #[test]
    fn test_tick_idempotent() {
        let mut act = ActCtrl::new(recording(0.0), &Params::default()).unwrap();
        act.set_goal(45.0).unwrap();

        for _ in 0..10 {
            act.tick();
        }

        let dems = &act.driver().dems;
        assert_eq!(dems.len(), 10);
        assert!(dems.iter().all(|d| *d == dems[0]));
        assert_eq!(dems[0].target_rot, 0.125);
    }

    #[test]
    fn test_tick_does_not_change_goal() {
        let mut act = ActCtrl::new(SimActuator::new(0.0, 0.02), &Params::default()).unwrap();
        act.set_goal(30.0).unwrap();
        let goal = act.goal_rot();

        for _ in 0..50 {
            act.tick();
            assert_eq!(act.goal_rot(), goal);
        }
    }

    #[test]
    fn test_position_read_fresh() {
        let mut act = ActCtrl::new(recording(0.0), &Params::default()).unwrap();
        assert_eq!(act.current_physical_position(), 0.0);

        act.driver_mut().position_rot = 0.5;
        assert_eq!(act.current_physical_position(), 180.0);
    }

    #[test]
    fn test_at_goal_band() {
        let mut act = ActCtrl::new(recording(0.0), &Params::default()).unwrap();
        let tol = act.tolerance_deg();

        let current = act.current_physical_position();
        act.set_goal(current).unwrap();
        assert!(act.at_goal());

        act.set_goal(current + tol * 10.0).unwrap();
        assert!(!act.at_goal());

        act.set_goal(current + tol * 0.5).unwrap();
        assert!(act.at_goal());

        act.set_goal(current - tol * 10.0).unwrap();
        assert!(!act.at_goal());
    }

    #[test]
    fn test_named_setpoints() {
        let mut act = ActCtrl::new(recording(0.0), &Params::default()).unwrap();

        act.set_goal_named("deployed").unwrap();
        assert_eq!(act.goal_deg(), 90.0);

        assert!(matches!(
            act.set_goal_named("launch"),
            Err(ActCtrlError::UnknownSetpoint(_))
        ));
        assert_eq!(act.goal_deg(), 90.0);
    }

    #[test]
    fn test_converges_in_sim() {
        let params = Params::default();
        let mut act = ActCtrl::new(SimActuator::new(0.0, 0.02), &params).unwrap();

        act.set_goal(90.0).unwrap();
        assert!(!act.at_goal());

        let mut converged_at = None;
        for i in 0..1000 {
            let (_, report) = act.proc(&InputData::default()).unwrap();
            if report.at_goal {
                converged_at = Some(i);
                break;
            }
        }
        assert!(converged_at.is_some());

        for _ in 0..500 {
            let (dem, report) = act.proc(&InputData::default()).unwrap();
            assert!(report.at_goal);
            assert_eq!(dem.target_rot, 0.25);
        }
    }

    #[test]
    fn test_converges_geared() {
        let mut params = Params::default();
        params.gear_ratio = 25.0;
        let mut act = ActCtrl::new(SimActuator::new(0.0, 0.02), &params).unwrap();

        let input = InputData {
            new_goal_deg: Some(-60.0),
        };
        act.proc(&input).unwrap();

        for _ in 0..1000 {
            act.proc(&InputData::default()).unwrap();
        }

        assert!(act.at_goal());
        assert!((act.current_physical_position() + 60.0).abs() <= params.tolerance_deg);
    }

    #[test]
    fn test_non_finite_goal_rejected() {
        let mut act = ActCtrl::new(SimActuator::new(0.0, 0.02), &Params::default()).unwrap();
        act.set_goal(30.0).unwrap();

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY].iter() {
            assert!(matches!(act.set_goal(*bad), Err(ActCtrlError::InvalidGoal(_))));
            assert!((act.goal_deg() - 30.0).abs() < 1e-9);
        }

        let input = InputData {
            new_goal_deg: Some(f64::NAN),
        };
        let (dem, report) = act.proc(&input).unwrap();
        assert!(report.goal_rejected);
        assert!(dem.target_rot.is_finite());
        assert!(act.current_physical_position().is_finite());

        // A valid goal afterwards is still reached
        act.set_goal(90.0).unwrap();
        for _ in 0..1000 {
            act.proc(&InputData::default()).unwrap();
        }
        assert!(act.at_goal());
    }
}
