//! Estimator state and the pure update step.

use super::config::EstimatorConfig;
use crate::DetectionFrame;

/// State carried between estimator cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EstimatorState {
    last_distance: f64,
    consecutive_empty_frames: u32,
}

impl EstimatorState {
    /// Fresh state: no reading yet, no empty frames counted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from saved values.
    pub fn resume(last_distance: f64, consecutive_empty_frames: u32) -> Self {
        Self {
            last_distance,
            consecutive_empty_frames,
        }
    }

    /// Most recent distance returned to the caller, in meters.
    pub fn last_distance(&self) -> f64 {
        self.last_distance
    }

    /// Empty frames seen since the last non-empty one.
    pub fn consecutive_empty_frames(&self) -> u32 {
        self.consecutive_empty_frames
    }

    /// Advance the state by one frame.
    ///
    /// The candidate distance is the mean z of the frame, or zero when the
    /// frame is empty. A non-zero candidate replaces the held value. A zero
    /// candidate keeps the held value unless it is beyond the far-reading
    /// ceiling. Independently, too many consecutive empty frames force zero.
    pub fn step(self, frame: &DetectionFrame, config: &EstimatorConfig) -> Self {
        // Counted up front; a non-empty frame resets it below.
        let mut consecutive_empty_frames = self.consecutive_empty_frames.saturating_add(1);

        let candidate = match frame.mean_z() {
            Some(mean) => {
                consecutive_empty_frames = 0;
                mean
            }
            None => 0.0,
        };

        let mut last_distance = if candidate != 0.0 {
            candidate
        } else if self.last_distance > config.far_reading_ceiling_meters {
            0.0
        } else {
            self.last_distance
        };

        if consecutive_empty_frames > config.stale_reset_frames {
            last_distance = 0.0;
        }

        Self {
            last_distance,
            consecutive_empty_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detection;
    use approx::assert_relative_eq;

    fn frame(depths: &[f64]) -> DetectionFrame {
        depths.iter().map(|&z| Detection::at_depth(0, z)).collect()
    }

    #[test]
    fn test_non_empty_frame_takes_mean() {
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(0.3, 12).step(&frame(&[2.0, 3.0, 4.0]), &config);

        assert_relative_eq!(state.last_distance(), 3.0);
        assert_eq!(state.consecutive_empty_frames(), 0);
    }

    #[test]
    fn test_empty_frame_holds_near_reading() {
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(0.6, 0).step(&DetectionFrame::empty(), &config);

        assert_relative_eq!(state.last_distance(), 0.6);
        assert_eq!(state.consecutive_empty_frames(), 1);
    }

    #[test]
    fn test_empty_frame_drops_far_reading() {
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(1.01, 0).step(&DetectionFrame::empty(), &config);

        assert_eq!(state.last_distance(), 0.0);
    }

    #[test]
    fn test_ceiling_boundary_is_held() {
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(1.0, 0).step(&DetectionFrame::empty(), &config);

        assert_relative_eq!(state.last_distance(), 1.0);
    }

    #[test]
    fn test_staleness_overrides_hysteresis() {
        let config = EstimatorConfig::default();

        let held = EstimatorState::resume(0.5, 29).step(&DetectionFrame::empty(), &config);
        assert_relative_eq!(held.last_distance(), 0.5);
        assert_eq!(held.consecutive_empty_frames(), 30);

        let dropped = held.step(&DetectionFrame::empty(), &config);
        assert_eq!(dropped.last_distance(), 0.0);
        assert_eq!(dropped.consecutive_empty_frames(), 31);
    }

    #[test]
    fn test_zero_mean_frame_resets_counter_but_holds() {
        // Detections averaging to exactly zero give a zero candidate, which
        // falls through to the hold rule while still counting as "seen".
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(0.4, 20).step(&frame(&[-0.5, 0.5]), &config);

        assert_relative_eq!(state.last_distance(), 0.4);
        assert_eq!(state.consecutive_empty_frames(), 0);
    }

    #[test]
    fn test_counter_saturates() {
        let config = EstimatorConfig::default();
        let state = EstimatorState::resume(0.0, u32::MAX).step(&DetectionFrame::empty(), &config);

        assert_eq!(state.consecutive_empty_frames(), u32::MAX);
        assert_eq!(state.last_distance(), 0.0);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = EstimatorConfig::new(2, 3.0);
        let mut state = EstimatorState::new().step(&frame(&[2.5]), &config);

        state = state.step(&DetectionFrame::empty(), &config);
        assert_relative_eq!(state.last_distance(), 2.5);
        state = state.step(&DetectionFrame::empty(), &config);
        assert_relative_eq!(state.last_distance(), 2.5);
        state = state.step(&DetectionFrame::empty(), &config);
        assert_eq!(state.last_distance(), 0.0);
    }
}
