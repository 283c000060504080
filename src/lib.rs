//! # tagrange - fiducial-tag distance estimation
//!
//! Turns per-frame fiducial pose detections into one stabilized
//! distance-to-target reading for a competition robot, plus the thin driver
//! glue around it.
//!
//! ## Features
//!
//! - Distance estimator with dropout hysteresis and staleness reset
//! - Pluggable detection sources (scripted, latest-frame mailbox, recording replay)
//! - Driver-station telemetry with transmission throttling
//! - Two-button servo teleop loop
//! - JSON runtime configuration and a console/file logger
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagrange::{DistanceEstimator, EstimatorConfig};
//! use tagrange::source::ScriptedSource;
//!
//! let source = ScriptedSource::from_depths(&[&[0.8], &[]]);
//! let mut estimator = DistanceEstimator::new(source, EstimatorConfig::default()).unwrap();
//!
//! assert_eq!(estimator.update(), 0.8);
//! assert_eq!(estimator.update(), 0.8); // short dropout is held
//! ```

pub mod detection;
pub mod source;
pub mod estimator;
pub mod telemetry;
pub mod teleop;
pub mod opmode;
pub mod config;
pub mod logger;

// Re-exports for convenience
pub use detection::{Detection, DetectionFrame, Orientation, Pose};
pub use source::DetectionSource;
pub use estimator::{DistanceEstimator, EstimatorConfig, EstimatorState, PoseReadout};
pub use config::RuntimeConfig;
pub use opmode::InitLoop;
pub use teleop::{GamepadState, TeleopConfig, TeleopLoop};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors raised while configuring or wiring up the robot program.
    ///
    /// The estimator's update path itself never fails.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Invalid recording at line {line}: {reason}")]
        InvalidRecording { line: usize, reason: String },

        #[error("Config parse error: {0}")]
        ConfigParse(#[from] serde_json::Error),

        #[error("Logger setup failed: {0}")]
        Logger(#[from] log::SetLoggerError),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for tagrange operations
    pub type Result<T> = std::result::Result<T, Error>;
}
