//! Pose and detection types consumed by the estimator.
//!
//! These are plain data: nothing here depends on the vision pipeline that
//! produced them. Positions are camera-relative and in meters. Rotations are
//! stored as a rotation matrix; Euler readouts use the intrinsic Y-X-Z order
//! (yaw about Y, pitch about X, roll about Z).

use nalgebra::{Rotation3, Vector3};

/// Values of `|sin(pitch)|` above this are treated as gimbal lock.
const GIMBAL_LOCK_EPS: f64 = 1e-9;

/// Intrinsic Y-X-Z Euler angles, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the camera Y axis.
    pub yaw: f64,
    /// Rotation about the rotated X axis.
    pub pitch: f64,
    /// Rotation about the twice-rotated Z axis.
    pub roll: f64,
}

impl Orientation {
    /// Build from angles in degrees.
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            yaw: yaw.to_radians(),
            pitch: pitch.to_radians(),
            roll: roll.to_radians(),
        }
    }

    /// The rotation `Ry(yaw) * Rx(pitch) * Rz(roll)`.
    pub fn to_rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.roll)
    }

    /// Decompose a rotation into intrinsic Y-X-Z angles.
    ///
    /// At gimbal lock (pitch of ±90°) roll is pinned to zero and the whole
    /// remaining rotation is reported as yaw.
    pub fn from_rotation(rotation: &Rotation3<f64>) -> Self {
        let m = rotation.matrix();
        let sin_pitch = (-m[(1, 2)]).clamp(-1.0, 1.0);
        let pitch = sin_pitch.asin();

        if 1.0 - sin_pitch.abs() > GIMBAL_LOCK_EPS {
            Self {
                yaw: m[(0, 2)].atan2(m[(2, 2)]),
                pitch,
                roll: m[(1, 0)].atan2(m[(1, 1)]),
            }
        } else if sin_pitch > 0.0 {
            Self {
                yaw: m[(0, 1)].atan2(m[(0, 0)]),
                pitch,
                roll: 0.0,
            }
        } else {
            Self {
                yaw: (-m[(0, 1)]).atan2(m[(0, 0)]),
                pitch,
                roll: 0.0,
            }
        }
    }
}

/// Camera-relative 3D pose of a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    /// Translation in meters; `z` points out of the lens.
    pub position: Vector3<f64>,
    /// Marker orientation relative to the camera frame.
    pub rotation: Rotation3<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, rotation: Rotation3<f64>) -> Self {
        Self { position, rotation }
    }

    /// A pose with identity rotation.
    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self::new(Vector3::new(x, y, z), Rotation3::identity())
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_rotation(&self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_position(0.0, 0.0, 0.0)
    }
}

/// One observed marker in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Marker identifier. Not unique within a frame.
    pub id: i32,
    pub pose: Pose,
}

impl Detection {
    pub fn new(id: i32, pose: Pose) -> Self {
        Self { id, pose }
    }

    /// Detection with only a depth reading; handy for scripted sources.
    pub fn at_depth(id: i32, z: f64) -> Self {
        Self::new(id, Pose::from_position(0.0, 0.0, z))
    }

    pub fn x(&self) -> f64 {
        self.pose.position.x
    }

    pub fn y(&self) -> f64 {
        self.pose.position.y
    }

    pub fn z(&self) -> f64 {
        self.pose.position.z
    }

    /// Yaw in degrees.
    pub fn yaw(&self) -> f64 {
        self.pose.orientation().yaw.to_degrees()
    }

    /// Pitch in degrees.
    pub fn pitch(&self) -> f64 {
        self.pose.orientation().pitch.to_degrees()
    }

    /// Roll in degrees.
    pub fn roll(&self) -> f64 {
        self.pose.orientation().roll.to_degrees()
    }
}

/// All detections produced by a single poll of a source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFrame {
    detections: Vec<Detection>,
}

impl DetectionFrame {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Arithmetic mean of the z positions, or `None` for an empty frame.
    pub fn mean_z(&self) -> Option<f64> {
        if self.detections.is_empty() {
            return None;
        }
        let sum: f64 = self.detections.iter().map(Detection::z).sum();
        Some(sum / self.detections.len() as f64)
    }

    pub(crate) fn push(&mut self, detection: Detection) {
        self.detections.push(detection);
    }
}

impl From<Vec<Detection>> for DetectionFrame {
    fn from(detections: Vec<Detection>) -> Self {
        Self::new(detections)
    }
}

impl FromIterator<Detection> for DetectionFrame {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for DetectionFrame {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetectionFrame {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
