//! Distance estimation from fiducial detections.
//!
//! This module provides:
//! - `EstimatorConfig` - dropout thresholds
//! - `EstimatorState` - state record with the pure `step` function
//! - `DistanceEstimator` - polls a source and keeps the state

mod config;
mod state;
mod distance;

pub use config::EstimatorConfig;
pub use state::EstimatorState;
pub use distance::{DistanceEstimator, PoseReadout};
