//! Driver-station telemetry: a line-oriented display sink and the formatting
//! used for distance and per-tag diagnostics.

use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

use crate::Detection;

/// Conversion factor used for imperial readouts.
pub const FEET_PER_METER: f64 = 3.28084;

/// Unit used when displaying distances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Feet,
}

impl DistanceUnit {
    /// Convert a value in meters to this unit.
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Feet => meters * FEET_PER_METER,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Feet => "ft",
        }
    }
}

/// Display settings for the init loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Minimum time between two published pages.
    pub transmission_interval_ms: u64,
    pub units: DistanceUnit,
    /// Add per-tag pose lines under the distance.
    pub show_detections: bool,
}

impl TelemetryConfig {
    pub fn transmission_interval(&self) -> Duration {
        Duration::from_millis(self.transmission_interval_ms)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            transmission_interval_ms: 50,
            units: DistanceUnit::Meters,
            show_detections: false,
        }
    }
}

/// A display that is filled line by line and then published as a page.
pub trait Telemetry {
    fn add_line(&mut self, line: String);

    /// Publish the buffered lines and start a new page.
    fn update(&mut self);
}

/// `Distance: 0.800 m`
pub fn format_distance(meters: f64, unit: DistanceUnit) -> String {
    format!("Distance: {:.3} {}", unit.convert(meters), unit.suffix())
}

/// Diagnostic lines for one detection: id, position, and orientation.
pub fn detection_lines(detection: &Detection, unit: DistanceUnit) -> Vec<String> {
    let orientation = detection.pose.orientation();
    let suffix = unit.suffix();
    vec![
        format!("Detected tag ID={}", detection.id),
        format!("Position x: {:.3} {}", unit.convert(detection.x()), suffix),
        format!("Position y: {:.3} {}", unit.convert(detection.y()), suffix),
        format!("Position z: {:.3} {}", unit.convert(detection.z()), suffix),
        format!("Rotation Yaw: {:.2} degrees", orientation.yaw.to_degrees()),
        format!("Rotation Pitch: {:.2} degrees", orientation.pitch.to_degrees()),
        format!("Rotation Roll: {:.2} degrees", orientation.roll.to_degrees()),
    ]
}

/// Publishes pages through the `log` facade under the `telemetry` target.
///
/// Pages arriving faster than the transmission interval are dropped.
#[derive(Debug)]
pub struct LogTelemetry {
    interval: Duration,
    lines: Vec<String>,
    last_sent: Option<Instant>,
    published: usize,
    dropped: usize,
}

impl LogTelemetry {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            lines: Vec::new(),
            last_sent: None,
            published: 0,
            dropped: 0,
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.transmission_interval())
    }

    /// Pages sent to the log so far.
    pub fn published(&self) -> usize {
        self.published
    }

    /// Pages discarded by the transmission interval.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Telemetry for LogTelemetry {
    fn add_line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let due = self
            .last_sent
            .map_or(true, |sent| now.duration_since(sent) >= self.interval);

        if due {
            for line in &self.lines {
                info!(target: "telemetry", "{}", line);
            }
            self.last_sent = Some(now);
            self.published += 1;
        } else {
            self.dropped += 1;
        }
        self.lines.clear();
    }
}

/// Keeps every published page in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryTelemetry {
    pending: Vec<String>,
    pages: Vec<Vec<String>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn last_page(&self) -> Option<&[String]> {
        self.pages.last().map(Vec::as_slice)
    }
}

impl Telemetry for MemoryTelemetry {
    fn add_line(&mut self, line: String) {
        self.pending.push(line);
    }

    fn update(&mut self) {
        self.pages.push(std::mem::take(&mut self.pending));
    }
}
