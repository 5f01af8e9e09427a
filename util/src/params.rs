//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A parameter structure which can check its own values.
///
/// Parameters shall be validated before a module is built from them, so that
/// bad configuration is caught at construction rather than during operation.
pub trait Validate {
    /// Check every value in the parameters, returning the first problem found.
    fn validate(&self) -> Result<(), ConfigError>;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (ROBOT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),

    #[error("Invalid parameter: {0}")]
    Invalid(ConfigError)
}

/// A parameter value outside of its allowed range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be finite and strictly positive, found {value}")]
    NotPositive {
        name: &'static str,
        value: f64
    },

    #[error("`{name}` must be finite and non-negative, found {value}")]
    Negative {
        name: &'static str,
        value: f64
    },

    #[error("`{name}` is not supported: {reason}")]
    Unsupported {
        name: &'static str,
        reason: String
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$ROBOT_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError> 
where
    P: DeserializeOwned
{
    // Get the params dir
    let mut path = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");

    load_from(path, param_file_path)
}

/// Load a parameter file from an explicit parameter directory.
pub fn load_from<P, D>(params_dir: D, param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    D: AsRef<Path>
{
    let path = params_dir.as_ref().join(param_file_path);

    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e))
    };

    from_str(params_str.as_str())
}

/// Parse a parameter structure from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    match toml::from_str(params_str) {
        Ok(p) => Ok(p),
        Err(e) => Err(LoadError::DeserialiseError(e))
    }
}

/// Load a parameter file and validate it.
pub fn load_validated<P, D>(params_dir: D, param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned + Validate,
    D: AsRef<Path>
{
    let params: P = load_from(params_dir, param_file_path)?;
    params.validate().map_err(LoadError::Invalid)?;
    Ok(params)
}

/// Check that a value is finite and greater than zero.
pub fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    }
    else {
        Err(ConfigError::NotPositive { name, value })
    }
}

/// Check that a value is finite and not less than zero.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    }
    else {
        Err(ConfigError::Negative { name, value })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Dummy {
        gain: f64,
        name: String
    }

    impl Validate for Dummy {
        fn validate(&self) -> Result<(), ConfigError> {
            require_positive("gain", self.gain)
        }
    }

    #[test]
    fn test_from_str() {
        let d: Dummy = from_str("gain = 2.5\nname = \"arm\"").unwrap();
        assert_eq!(d.gain, 2.5);
        assert_eq!(d.name, "arm");

        assert!(matches!(
            from_str::<Dummy>("gain = \"fast\""),
            Err(LoadError::DeserialiseError(_))
        ));
    }

    #[test]
    fn test_require() {
        assert!(require_positive("x", 1.0).is_ok());
        assert_eq!(
            require_positive("x", 0.0),
            Err(ConfigError::NotPositive { name: "x", value: 0.0 })
        );
        assert!(require_positive("x", f64::INFINITY).is_err());
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", -0.1).is_err());
        assert!(require_non_negative("x", f64::NAN).is_err());
    }

    #[test]
    fn test_load_validated_missing_file() {
        let res: Result<Dummy, _> = load_validated("/nonexistent/params", "dummy.toml");
        assert!(matches!(res, Err(LoadError::FileLoadError(_))));
    }

    #[test]
    fn test_validate() {
        let d: Dummy = from_str("gain = -1.0\nname = \"arm\"").unwrap();
        assert!(d.validate().is_err());
    }
}
