//! Target tracking parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::params::{require_non_negative, ConfigError, Validate};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for target tracking
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Params {
    /// Latency used for motion compensation when the caller does not give
    /// one. Covers processing and network time between capture and
    /// actuation.
    ///
    /// Units: seconds
    pub default_latency_s: f64,

    /// Oldest frontend API version which can be used, as `[major, minor]`.
    #[serde(default = "default_min_api_version")]
    pub min_api_version: (u16, u16),

    /// Host of a remote table server the frontend should connect to as a
    /// client. `None` if the frontend serves its own tables.
    #[serde(default)]
    pub frontend_host: Option<String>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            default_latency_s: 0.05,
            min_api_version: default_min_api_version(),
            frontend_host: None,
        }
    }
}

impl Validate for Params {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("default_latency_s", self.default_latency_s)
    }
}

fn default_min_api_version() -> (u16, u16) {
    (1, 0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let p: Params = util::params::from_str(
            "default_latency_s = 0.08\nmin_api_version = [2, 0]\nfrontend_host = \"10.0.0.11\"",
        )
        .unwrap();

        assert_eq!(p.default_latency_s, 0.08);
        assert_eq!(p.min_api_version, (2, 0));
        assert_eq!(p.frontend_host.as_deref(), Some("10.0.0.11"));

        let p: Params = util::params::from_str("default_latency_s = 0.05").unwrap();
        assert_eq!(p.min_api_version, (1, 0));
        assert!(p.frontend_host.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let mut p = Params::default();
        p.default_latency_s = -0.01;
        assert!(p.validate().is_err());
    }
}
