//! Distance estimator driving a detection source.

use log::{debug, trace};

use super::config::EstimatorConfig;
use super::state::EstimatorState;
use crate::source::DetectionSource;
use crate::{Detection, DetectionFrame, Result};

/// Per-detection readout of the last polled frame, for diagnostic display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseReadout {
    pub id: i32,
    /// Meters.
    pub x: f64,
    /// Meters.
    pub y: f64,
    /// Meters.
    pub z: f64,
    /// Degrees.
    pub yaw: f64,
    /// Degrees.
    pub pitch: f64,
    /// Degrees.
    pub roll: f64,
}

impl From<&Detection> for PoseReadout {
    fn from(detection: &Detection) -> Self {
        let orientation = detection.pose.orientation();
        Self {
            id: detection.id,
            x: detection.x(),
            y: detection.y(),
            z: detection.z(),
            yaw: orientation.yaw.to_degrees(),
            pitch: orientation.pitch.to_degrees(),
            roll: orientation.roll.to_degrees(),
        }
    }
}

/// Stabilized distance-to-target estimator.
///
/// Polls its source once per [`update`](DistanceEstimator::update) and folds
/// the frame into [`EstimatorState`]. The last frame is kept only for the
/// diagnostic accessors; it never feeds back into the estimate.
pub struct DistanceEstimator<S> {
    source: S,
    config: EstimatorConfig,
    state: EstimatorState,
    last_frame: DetectionFrame,
}

impl<S: DetectionSource> DistanceEstimator<S> {
    /// Create an estimator after validating its configuration.
    pub fn new(source: S, config: EstimatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            config,
            state: EstimatorState::new(),
            last_frame: DetectionFrame::empty(),
        })
    }

    /// Create an estimator with the default thresholds.
    pub fn with_defaults(source: S) -> Self {
        Self {
            source,
            config: EstimatorConfig::default(),
            state: EstimatorState::new(),
            last_frame: DetectionFrame::empty(),
        }
    }

    /// Poll the source and return the stabilized distance in meters.
    pub fn update(&mut self) -> f64 {
        let frame = self.source.poll();
        let previous = self.state;
        self.state = previous.step(&frame, &self.config);

        trace!(
            "Frame with {} detections: {:.3} m -> {:.3} m ({} empty)",
            frame.len(),
            previous.last_distance(),
            self.state.last_distance(),
            self.state.consecutive_empty_frames()
        );
        if previous.last_distance() != 0.0 && self.state.last_distance() == 0.0 {
            debug!(
                "Distance reset to 0 after {} empty frames (held {:.3} m)",
                self.state.consecutive_empty_frames(),
                previous.last_distance()
            );
        }

        self.last_frame = frame;
        self.state.last_distance()
    }

    /// Distance returned by the most recent update.
    pub fn distance(&self) -> f64 {
        self.state.last_distance()
    }

    pub fn state(&self) -> EstimatorState {
        self.state
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Forget the held reading and the empty-frame count.
    pub fn reset(&mut self) {
        self.state = EstimatorState::new();
        self.last_frame = DetectionFrame::empty();
    }

    /// Frame consumed by the most recent update.
    pub fn last_frame(&self) -> &DetectionFrame {
        &self.last_frame
    }

    /// Pose readouts for every detection in the last frame.
    pub fn readouts(&self) -> Vec<PoseReadout> {
        self.last_frame.iter().map(PoseReadout::from).collect()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
