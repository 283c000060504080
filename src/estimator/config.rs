//! Tuning constants for the distance estimator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Policy knobs for dropout handling.
///
/// Both values encode field tuning (camera range and loop rate), so they are
/// configuration rather than literals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Once more than this many consecutive empty frames have been seen,
    /// the reported distance is forced to zero.
    pub stale_reset_frames: u32,

    /// A held reading above this distance (meters) is dropped to zero on the
    /// first empty frame instead of being carried forward.
    pub far_reading_ceiling_meters: f64,
}

impl EstimatorConfig {
    pub fn new(stale_reset_frames: u32, far_reading_ceiling_meters: f64) -> Self {
        Self {
            stale_reset_frames,
            far_reading_ceiling_meters,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.far_reading_ceiling_meters.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "far_reading_ceiling_meters must be finite, got {}",
                self.far_reading_ceiling_meters
            )));
        }
        if self.far_reading_ceiling_meters < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "far_reading_ceiling_meters must be non-negative, got {}",
                self.far_reading_ceiling_meters
            )));
        }
        Ok(())
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            stale_reset_frames: 30,
            far_reading_ceiling_meters: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.stale_reset_frames, 30);
        assert_eq!(config.far_reading_ceiling_meters, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ceiling() {
        assert!(EstimatorConfig::new(30, -0.5).validate().is_err());
        assert!(EstimatorConfig::new(30, f64::NAN).validate().is_err());
        assert!(EstimatorConfig::new(30, f64::INFINITY).validate().is_err());
        assert!(EstimatorConfig::new(0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EstimatorConfig = serde_json::from_str(r#"{"stale_reset_frames": 10}"#).unwrap();
        assert_eq!(config.stale_reset_frames, 10);
        assert_eq!(config.far_reading_ceiling_meters, 1.0);
    }
}
