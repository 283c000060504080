//! Replay of recorded detection logs.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};
use nalgebra::Vector3;

use super::traits::DetectionSource;
use crate::detection::{Orientation, Pose};
use crate::{Detection, DetectionFrame, Error, Result};

/// Minimum fields per line: `frame,id,x,y,z`.
const MIN_FIELDS: usize = 5;

/// Highest frame number accepted; about nine hours of capture at 30 fps.
pub const MAX_FRAME: usize = 1_000_000;

/// Source backed by a recorded detection log.
///
/// The log is CSV with one detection per line:
/// `frame,id,x,y,z,yaw_deg,pitch_deg,roll_deg`
///
/// Frames are 1-indexed. A frame number that never appears replays as an
/// empty frame, and once the last recorded frame has been served every
/// further poll is empty. The rotation columns are optional.
#[derive(Clone, Debug)]
pub struct RecordingSource {
    frames: Vec<DetectionFrame>,
    current_frame: usize,
}

impl RecordingSource {
    /// Open and parse a recording file.
    pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to open recording '{}': {}", path.display(), e),
            ))
        })?;

        let source = Self::from_reader(file)?;
        info!(
            "Loaded recording {} ({} frames)",
            path.display(),
            source.num_frames()
        );
        Ok(source)
    }

    /// Parse a recording from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut frames: Vec<DetectionFrame> = Vec::new();

        for (idx, line_result) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line_result.map_err(Error::IoError)?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("frame") {
                continue;
            }

            let (frame, detection) = parse_line(trimmed, line_no)?;
            if frames.len() < frame {
                frames.resize_with(frame, DetectionFrame::default);
            }
            frames[frame - 1].push(detection);
        }

        Ok(Self {
            frames,
            current_frame: 0,
        })
    }

    /// Number of recorded frames (including empty gaps).
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get a recorded frame (0-indexed) without advancing playback.
    pub fn frame(&self, index: usize) -> Option<&DetectionFrame> {
        self.frames.get(index)
    }

    /// True once every recorded frame has been polled.
    pub fn is_exhausted(&self) -> bool {
        self.current_frame >= self.frames.len()
    }

    /// Restart playback from the first frame.
    pub fn rewind(&mut self) {
        self.current_frame = 0;
    }
}

impl DetectionSource for RecordingSource {
    fn poll(&mut self) -> DetectionFrame {
        match self.frames.get(self.current_frame) {
            Some(frame) => {
                self.current_frame += 1;
                frame.clone()
            }
            None => {
                debug!("Recording exhausted, reporting empty frame");
                DetectionFrame::empty()
            }
        }
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<(usize, Detection)> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < MIN_FIELDS {
        return Err(Error::InvalidRecording {
            line: line_no,
            reason: format!("expected at least {} fields, got {}", MIN_FIELDS, parts.len()),
        });
    }

    let frame: usize = parse_field(parts[0], "frame", line_no)?;
    if frame == 0 {
        return Err(Error::InvalidRecording {
            line: line_no,
            reason: "frame numbers start at 1".to_string(),
        });
    }
    if frame > MAX_FRAME {
        return Err(Error::InvalidRecording {
            line: line_no,
            reason: format!("frame {} exceeds the limit of {}", frame, MAX_FRAME),
        });
    }
    let id: i32 = parse_field(parts[1], "id", line_no)?;
    let x: f64 = parse_field(parts[2], "x", line_no)?;
    let y: f64 = parse_field(parts[3], "y", line_no)?;
    let z: f64 = parse_field(parts[4], "z", line_no)?;

    let angle = |index: usize, name: &str| -> Result<f64> {
        match parts.get(index) {
            Some(value) if !value.is_empty() => parse_field(value, name, line_no),
            _ => Ok(0.0),
        }
    };
    let orientation = Orientation::from_degrees(angle(5, "yaw")?, angle(6, "pitch")?, angle(7, "roll")?);

    let pose = Pose::new(Vector3::new(x, y, z), orientation.to_rotation());
    Ok((frame, Detection::new(id, pose)))
}

fn parse_field<T>(value: &str, name: &str, line_no: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| Error::InvalidRecording {
        line: line_no,
        reason: format!("invalid {} '{}': {}", name, value, e),
    })
}
