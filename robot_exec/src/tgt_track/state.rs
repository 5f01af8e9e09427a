//! Implementations for the TgtTracker state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use log::{debug, info, trace, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{check_frontend_caps, Params, TargetSnapshot, TgtTrackError};
use crate::telemetry::{keys, TelemetrySink};
use comms_if::eqpt::{FrontendCaps, RawDetection};
use util::{
    archive::{Archived, Archiver},
    module::State,
    params::{require_non_negative, ConfigError, Validate},
    session::Session,
    time::duration_to_seconds,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Target tracking module state
pub struct TgtTracker {
    default_latency_s: f64,

    latest: TargetSnapshot,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to target tracking.
#[derive(Default, Debug, Clone)]
pub struct InputData {
    /// The frontend's latest result, `None` if it has not published one.
    pub detection: Option<RawDetection>,
}

/// Status report for target tracking.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub has_target: bool,

    /// Units: meters
    pub range_m: Option<f64>,

    /// Units: degrees
    pub bearing_deg: Option<f64>,

    /// Units: degrees
    pub elevation_deg: Option<f64>,

    pub id: Option<i32>,

    /// True if the frontend claimed a target that could not be used.
    pub detection_rejected: bool,

    /// Time between the frontend stamping the detection and this update.
    ///
    /// Units: seconds
    pub detection_age_s: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TgtTracker {

    /// Create a new tracker for a frontend with the given capabilities.
    ///
    /// The capability check is done once here, a frontend unable to provide
    /// what the parameters require is a configuration error.
    pub fn new(params: &Params, caps: &FrontendCaps) -> Result<Self, TgtTrackError> {
        params.validate()?;
        check_frontend_caps(caps, params)?;

        if let Some(host) = &params.frontend_host {
            info!("Vision frontend will connect as a client to {}", host);
        }

        Ok(Self {
            default_latency_s: params.default_latency_s,
            latest: TargetSnapshot::NoTarget,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Start archiving the status report into the session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report = Archiver::from_path(session, "tgt_track/status_report.csv")?;
        Ok(())
    }

    /// Replace the latest snapshot with one built from this cycle's detection.
    pub fn update(&mut self, detection: Option<&RawDetection>) -> &TargetSnapshot {
        let snapshot = match detection {
            Some(det) => TargetSnapshot::from_detection(det),
            None => TargetSnapshot::NoTarget,
        };

        let rejected = match detection {
            Some(det) => det.has_target && !snapshot.is_present(),
            None => false,
        };
        if rejected {
            warn!("Frontend reported a target without a usable translation, ignoring it");
        }

        let detection_age_s = detection
            .and_then(|det| duration_to_seconds(Utc::now() - det.timestamp));
        if let Some(age) = detection_age_s {
            trace!("Detection age: {:.3} s", age);
        }

        if snapshot.is_present() != self.latest.is_present() {
            match snapshot.id() {
                Some(id) => debug!("Target acquired (id {})", id),
                None => debug!("Target lost"),
            }
        }

        self.latest = snapshot;
        self.report = StatusReport {
            has_target: snapshot.is_present(),
            range_m: snapshot.horizontal_range_m(),
            bearing_deg: snapshot.bearing_deg(),
            elevation_deg: snapshot.elevation_deg(),
            id: snapshot.id(),
            detection_rejected: rejected,
            detection_age_s,
        };

        &self.latest
    }

    pub fn latest(&self) -> &TargetSnapshot {
        &self.latest
    }

    pub fn has_target(&self) -> bool {
        self.latest.is_present()
    }

    /// Units: meters
    pub fn horizontal_range(&self) -> Option<f64> {
        self.latest.horizontal_range_m()
    }

    /// Units: degrees
    pub fn raw_bearing_deg(&self) -> Option<f64> {
        self.latest.bearing_deg()
    }

    /// Units: degrees
    pub fn raw_elevation_deg(&self) -> Option<f64> {
        self.latest.elevation_deg()
    }

    /// Bearing of the target once the robot has moved at `(vx_ms, vy_ms)`
    /// for `latency_s`. Velocities are in the robot frame, X forward, Y left.
    ///
    /// `None` if there is no target or the inputs give a non-finite bearing.
    ///
    /// Units: degrees
    pub fn motion_compensated_bearing_deg(
        &self,
        vx_ms: f64,
        vy_ms: f64,
        latency_s: f64,
    ) -> Option<f64> {
        self.latest
            .compensated_bearing_deg(Vector2::new(vx_ms, vy_ms), latency_s)
            .filter(|b| b.is_finite())
    }

    /// As `motion_compensated_bearing_deg` using the default latency.
    pub fn motion_compensated_bearing_deg_default(&self, vx_ms: f64, vy_ms: f64) -> Option<f64> {
        self.motion_compensated_bearing_deg(vx_ms, vy_ms, self.default_latency_s)
    }

    /// Units: seconds
    pub fn default_latency_s(&self) -> f64 {
        self.default_latency_s
    }

    /// Change the default latency used for motion compensation.
    pub fn set_default_latency_s(&mut self, latency_s: f64) -> Result<(), ConfigError> {
        require_non_negative("default_latency_s", latency_s)?;
        self.default_latency_s = latency_s;
        Ok(())
    }

    /// Publish the latest snapshot to the dashboard.
    pub fn publish(&self, sink: &mut dyn TelemetrySink) {
        sink.put_bool(keys::HAS_TARGET, self.has_target());

        if let Some(t) = self.latest.target() {
            if let Some(range) = self.horizontal_range() {
                sink.put_number(keys::DISTANCE_M, range);
            }
            sink.put_number(keys::TARGET_YAW_DEG, t.bearing_deg);
            sink.put_number(keys::TARGET_PITCH_DEG, t.elevation_deg);
            sink.put_number(keys::TARGET_ID, t.id as f64);
        }
    }
}

impl State for TgtTracker {
    type InputData = InputData;
    type OutputData = TargetSnapshot;
    type StatusReport = StatusReport;
    type ProcError = TgtTrackError;

    /// Perform cyclic processing of target tracking.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let snapshot = *self.update(input_data.detection.as_ref());

        trace!("TgtTrack output: {:?}", snapshot);

        Ok((snapshot, self.report))
    }
}

impl Archived for TgtTracker {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;

        Ok(())
    }
}
