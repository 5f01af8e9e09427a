//! Implementations for the VelCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;

// Internal
use super::{Params, VelCtrlError, VelocityDriver};
use comms_if::eqpt::{PidGains, VelocityDem};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params::Validate,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Velocity control module state
pub struct VelCtrl<D: VelocityDriver> {
    driver: D,

    gains: PidGains,

    /// Units: motor rotations/second
    target_rps: f64,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to velocity control.
#[derive(Default, Debug, Clone, Copy)]
pub struct InputData {
    /// A new speed, or `None` to keep the current one.
    ///
    /// Units: motor rotations/second
    pub new_target_rps: Option<f64>,
}

/// Status report for velocity control.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// Units: motor rotations/second
    pub target_rps: f64,

    /// True if a demand was refused this cycle.
    pub demand_rejected: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: VelocityDriver> VelCtrl<D> {

    pub fn new(driver: D, params: &Params) -> Result<Self, VelCtrlError> {
        params.validate()?;

        Ok(Self {
            driver,
            gains: params.gains,
            target_rps: params.initial_target_rps,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Start archiving the status report into the session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report = Archiver::from_path(session, "vel_ctrl/status_report.csv")?;
        Ok(())
    }

    /// Set the speed to hold. Takes effect on the next `tick`.
    pub fn set_target_rps(&mut self, target_rps: f64) -> Result<(), VelCtrlError> {
        if !target_rps.is_finite() {
            return Err(VelCtrlError::InvalidDemand(target_rps));
        }

        if target_rps != self.target_rps {
            debug!("New VelCtrl target: {:.3} rps", target_rps);
        }
        self.target_rps = target_rps;

        Ok(())
    }

    /// Send the current demand to the driver.
    pub fn tick(&mut self) -> VelocityDem {
        let dem = VelocityDem {
            target_rps: self.target_rps,
            gains: self.gains,
        };

        self.driver.apply_velocity(dem);

        dem
    }

    /// Demand zero speed immediately.
    pub fn stop(&mut self) -> VelocityDem {
        self.target_rps = 0.0;
        self.tick()
    }

    pub fn target_rps(&self) -> f64 {
        self.target_rps
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: VelocityDriver> State for VelCtrl<D> {
    type InputData = InputData;
    type OutputData = VelocityDem;
    type StatusReport = StatusReport;
    type ProcError = VelCtrlError;

    /// Perform cyclic processing of velocity control.
    ///
    /// A refused demand is reported but does not stop processing, the previous speed is held.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut demand_rejected = false;

        if let Some(rps) = input_data.new_target_rps {
            if let Err(e) = self.set_target_rps(rps) {
                warn!("{}", e);
                demand_rejected = true;
            }
        }

        let dem = self.tick();

        self.report = StatusReport {
            target_rps: dem.target_rps,
            demand_rejected,
        };

        trace!("VelCtrl output: {:?}", dem);

        Ok((dem, self.report))
    }
}

impl<D: VelocityDriver> Archived for VelCtrl<D> {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}
