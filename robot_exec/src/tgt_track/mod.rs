//! # Target tracking module
//!
//! Target tracking reads the best target reported by the vision frontend once per cycle and
//! keeps it as a [`TargetSnapshot`]. Only the latest snapshot is kept, there is no history.
//!
//! The frontend reports the camera to target translation as it was when the frame was
//! captured. By the time a correction based on it is actuated the robot has moved on, so the
//! tracker can predict the bearing the target will have after a given latency. The prediction
//! assumes the target is stationary and the robot keeps its current velocity:
//!
//! ```text
//! predicted_x = x - vx * latency
//! predicted_y = y - vy * latency
//! bearing     = atan2(predicted_y, predicted_x)
//! ```
//!
//! This is a first order extrapolation, not a filter. It adds no lag of its own, but is wrong
//! while the robot accelerates.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod snapshot;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use snapshot::*;
pub use state::*;

use comms_if::eqpt::{FrontendCaps, RawDetection};
use util::params::ConfigError;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The vision frontend, polled once per cycle.
pub trait VisionFrontend {
    /// Capabilities of this frontend, checked once when the tracker is built.
    fn caps(&self) -> FrontendCaps;

    /// The latest result published by the frontend, or `None` if it has not
    /// published anything yet.
    fn latest_detection(&mut self) -> Option<RawDetection>;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TgtTrack operation.
#[derive(Debug, thiserror::Error)]
pub enum TgtTrackError {
    #[error("Invalid target tracking configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that the frontend can provide what the parameters ask of it.
pub fn check_frontend_caps(caps: &FrontendCaps, params: &Params) -> Result<(), ConfigError> {
    if caps.api_version < params.min_api_version {
        return Err(ConfigError::Unsupported {
            name: "min_api_version",
            reason: format!(
                "frontend API version {}.{} is older than the required {}.{}",
                caps.api_version.0,
                caps.api_version.1,
                params.min_api_version.0,
                params.min_api_version.1
            ),
        });
    }

    if let Some(host) = &params.frontend_host {
        if !caps.supports_client_mode {
            return Err(ConfigError::Unsupported {
                name: "frontend_host",
                reason: format!(
                    "frontend cannot run as a client, connect it to {} manually",
                    host
                ),
            });
        }
    }

    Ok(())
}
