//! # Vision Frontend Communications Module
//!
//! The frontend reports the best target it can see in the camera frame. Translation axes follow
//! the camera frame: X forward, Y left, Z up.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The latest result published by the vision frontend.
///
/// When `has_target` is false the remaining fields carry no meaning.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawDetection {
    /// UTC timestamp at which the frame was captured
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// True if at least one target was found in the frame
    pub has_target: bool,

    /// Camera to best target translation, if the frontend could solve for it.
    ///
    /// Units: meters,
    /// Frame: Camera
    #[serde(default)]
    pub best_offset_m: Option<[f64; 3]>,

    /// Yaw of the best target, positive left.
    ///
    /// Units: degrees
    #[serde(default)]
    pub bearing_deg: f64,

    /// Pitch of the best target, positive up.
    ///
    /// Units: degrees
    #[serde(default)]
    pub elevation_deg: f64,

    /// Fiducial ID of the best target, -1 if it has none
    #[serde(default = "no_fiducial")]
    pub id: i32,
}

/// Capabilities advertised by a vision frontend.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FrontendCaps {
    /// API version as `(major, minor)`
    pub api_version: (u16, u16),

    /// True if the frontend can be reached as a client of a remote table server
    pub supports_client_mode: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RawDetection {
    /// A detection containing no target.
    pub fn no_target(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            has_target: false,
            best_offset_m: None,
            bearing_deg: 0.0,
            elevation_deg: 0.0,
            id: no_fiducial(),
        }
    }

    /// A detection of a single target.
    pub fn with_target(
        timestamp: DateTime<Utc>,
        best_offset_m: [f64; 3],
        bearing_deg: f64,
        elevation_deg: f64,
        id: i32,
    ) -> Self {
        Self {
            timestamp,
            has_target: true,
            best_offset_m: Some(best_offset_m),
            bearing_deg,
            elevation_deg,
            id,
        }
    }
}

impl Default for FrontendCaps {
    fn default() -> Self {
        Self {
            api_version: (1, 0),
            supports_client_mode: false,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn no_fiducial() -> i32 {
    -1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_no_target() {
        let det: RawDetection =
            serde_json::from_str(r#"{"timestamp": 1000, "has_target": false}"#).unwrap();

        assert!(!det.has_target);
        assert_eq!(det.best_offset_m, None);
        assert_eq!(det.id, -1);
        assert_eq!(det.timestamp.timestamp_millis(), 1000);
    }

    #[test]
    fn test_parse_target() {
        let det: RawDetection = serde_json::from_str(
            r#"{
                "timestamp": 1650000000123,
                "has_target": true,
                "best_offset_m": [2.0, -0.5, 0.3],
                "bearing_deg": -14.0,
                "elevation_deg": 8.5,
                "id": 7
            }"#,
        )
        .unwrap();

        assert!(det.has_target);
        assert_eq!(det.best_offset_m, Some([2.0, -0.5, 0.3]));
        assert_eq!(det.id, 7);
    }
}
