//! Pre-start loop: estimate the distance each cycle and show it on telemetry.

use std::thread;
use std::time::Duration;

use log::info;

use crate::estimator::DistanceEstimator;
use crate::source::DetectionSource;
use crate::telemetry::{detection_lines, format_distance, Telemetry, TelemetryConfig};

/// Drives a [`DistanceEstimator`] once per cycle and publishes the result.
pub struct InitLoop<S, T> {
    estimator: DistanceEstimator<S>,
    telemetry: T,
    config: TelemetryConfig,
    cycles: usize,
}

impl<S: DetectionSource, T: Telemetry> InitLoop<S, T> {
    pub fn new(estimator: DistanceEstimator<S>, telemetry: T, config: TelemetryConfig) -> Self {
        Self {
            estimator,
            telemetry,
            config,
            cycles: 0,
        }
    }

    /// Run one estimator update, publish one telemetry page, return meters.
    pub fn run_cycle(&mut self) -> f64 {
        let distance = self.estimator.update();
        self.cycles += 1;

        self.telemetry
            .add_line(format_distance(distance, self.config.units));
        if self.config.show_detections {
            for detection in self.estimator.last_frame() {
                for line in detection_lines(detection, self.config.units) {
                    self.telemetry.add_line(line);
                }
            }
        }
        self.telemetry.update();

        distance
    }

    /// Cycle while `keep_running` holds, sleeping `period` between cycles.
    ///
    /// The predicate sees the number of cycles completed so far. Returns the
    /// number of cycles run by this call.
    pub fn run_until<F>(&mut self, mut keep_running: F, period: Duration) -> usize
    where
        F: FnMut(usize) -> bool,
    {
        info!("Init loop started");
        let mut ran = 0;
        while keep_running(ran) {
            self.run_cycle();
            ran += 1;
            if !period.is_zero() {
                thread::sleep(period);
            }
        }
        info!(
            "Init loop stopped after {} cycles at {:.3} m",
            ran,
            self.estimator.distance()
        );
        ran
    }

    /// Total cycles since construction.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn estimator(&self) -> &DistanceEstimator<S> {
        &self.estimator
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn into_parts(self) -> (DistanceEstimator<S>, T) {
        (self.estimator, self.telemetry)
    }
}
