//! Source trait for the vision side of the estimator.

use crate::DetectionFrame;

/// Anything that can hand over the detections of its latest processed frame.
///
/// Implementations must return promptly. "No marker visible" is reported as
/// an empty frame, never as an error, and callers must not assume that a
/// detection seen in one poll is still present in the next.
pub trait DetectionSource {
    /// Return the current frame of detections (possibly empty).
    fn poll(&mut self) -> DetectionFrame;
}

impl<S: DetectionSource + ?Sized> DetectionSource for Box<S> {
    fn poll(&mut self) -> DetectionFrame {
        (**self).poll()
    }
}

impl<S: DetectionSource + ?Sized> DetectionSource for &mut S {
    fn poll(&mut self) -> DetectionFrame {
        (**self).poll()
    }
}
