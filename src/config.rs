//! Runtime configuration loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::estimator::EstimatorConfig;
use crate::teleop::TeleopConfig;
use crate::telemetry::TelemetryConfig;
use crate::{Error, Result};

/// Every tunable the robot program reads at startup.
///
/// Missing sections and fields fall back to their defaults, so an empty
/// object `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub estimator: EstimatorConfig,
    pub teleop: TeleopConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Read, parse, and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to read config '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: RuntimeConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.estimator.validate()?;
        self.teleop.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
