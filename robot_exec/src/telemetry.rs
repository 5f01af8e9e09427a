//! # Dashboard telemetry
//!
//! The controller publishes observational values to an operator dashboard as key/value entries,
//! and reads a few tunables back from it every cycle. Nothing the controller does depends on
//! what it publishes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Dashboard keys.
pub mod keys {
    pub const HAS_TARGET: &str = "Vision/HasTarget";
    pub const DISTANCE_M: &str = "Vision/DistanceMeters";
    pub const TARGET_YAW_DEG: &str = "Vision/TargetYawDeg";
    pub const TARGET_PITCH_DEG: &str = "Vision/TargetPitchDeg";
    pub const TARGET_ID: &str = "Vision/TargetID";
    pub const PREDICTED_YAW_DEG: &str = "Vision/PredictedYawDeg";
    pub const TARGET_STATUS: &str = "Vision/TargetStatus";

    /// Tunable aim proportional gain
    pub const AIM_K_P: &str = "Vision/AimP";

    /// Tunable motion compensation latency
    pub const LATENCY_S: &str = "Vision/Latency";

    pub const ACT_POSITION_DEG: &str = "Act/PositionDeg";
    pub const ACT_GOAL_DEG: &str = "Act/GoalDeg";
    pub const ACT_AT_GOAL: &str = "Act/AtGoal";
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Somewhere to publish telemetry to.
pub trait TelemetrySink {
    fn put_number(&mut self, key: &str, value: f64);

    fn put_bool(&mut self, key: &str, value: bool);

    fn put_string(&mut self, key: &str, value: &str);
}

/// Somewhere to read runtime tunables from.
pub trait TunableSource {
    /// The number stored under `key`, or `default` if there is none.
    fn get_number(&self, key: &str, default: f64) -> f64;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single dashboard value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Number(f64),
    Bool(bool),
    String(String),
}

/// In-memory dashboard table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    entries: BTreeMap<String, Entry>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the whole table as pretty printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl TelemetrySink for Dashboard {
    fn put_number(&mut self, key: &str, value: f64) {
        self.entries.insert(key.to_string(), Entry::Number(value));
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), Entry::Bool(value));
    }

    fn put_string(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), Entry::String(value.to_string()));
    }
}

impl TunableSource for Dashboard {
    fn get_number(&self, key: &str, default: f64) -> f64 {
        match self.entries.get(key) {
            Some(Entry::Number(n)) => *n,
            _ => default,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tunable_default() {
        let mut dash = Dashboard::new();
        assert_eq!(dash.get_number(keys::AIM_K_P, 3.0), 3.0);

        dash.put_number(keys::AIM_K_P, 4.5);
        assert_eq!(dash.get_number(keys::AIM_K_P, 3.0), 4.5);

        // Entries of the wrong type fall back to the default
        dash.put_string(keys::LATENCY_S, "fast");
        assert_eq!(dash.get_number(keys::LATENCY_S, 0.05), 0.05);
    }

    #[test]
    fn test_to_json() {
        let mut dash = Dashboard::new();
        dash.put_bool(keys::HAS_TARGET, true);
        dash.put_number(keys::TARGET_ID, 7.0);
        dash.put_string(keys::TARGET_STATUS, "Target");

        let json: serde_json::Value = serde_json::from_str(&dash.to_json().unwrap()).unwrap();
        assert_eq!(json[keys::HAS_TARGET], serde_json::json!(true));
        assert_eq!(json[keys::TARGET_ID], serde_json::json!(7.0));
        assert_eq!(json[keys::TARGET_STATUS], serde_json::json!("Target"));
        assert_eq!(dash.len(), 3);
    }
}
