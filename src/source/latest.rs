//! Latest-frame mailbox shared between a capture worker and the control loop.
//!
//! The worker owns a [`FramePublisher`] and overwrites the slot every time it
//! finishes a frame. The control loop polls [`LatestDetections`], which copies
//! whatever was published last and never waits on capture.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use super::traits::DetectionSource;
use crate::DetectionFrame;

#[derive(Debug, Default)]
struct Slot {
    frame: DetectionFrame,
    sequence: u64,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("Detection slot poisoned by a panicked publisher, recovering last frame");
        poisoned.into_inner()
    })
}

/// Polling side of the mailbox.
#[derive(Clone, Debug, Default)]
pub struct LatestDetections {
    slot: Arc<Mutex<Slot>>,
}

impl LatestDetections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a publisher writing into this mailbox.
    pub fn publisher(&self) -> FramePublisher {
        FramePublisher {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Number of frames published so far.
    pub fn sequence(&self) -> u64 {
        lock(&self.slot).sequence
    }
}

impl DetectionSource for LatestDetections {
    fn poll(&mut self) -> DetectionFrame {
        lock(&self.slot).frame.clone()
    }
}

/// Writing side of the mailbox, handed to the capture worker.
#[derive(Clone, Debug)]
pub struct FramePublisher {
    slot: Arc<Mutex<Slot>>,
}

impl FramePublisher {
    /// Replace the latest frame.
    pub fn publish(&self, frame: DetectionFrame) {
        let mut slot = lock(&self.slot);
        slot.sequence += 1;
        debug!(
            "Published frame {} with {} detections",
            slot.sequence,
            frame.len()
        );
        slot.frame = frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detection;
    use std::thread;

    #[test]
    fn test_latest_starts_empty() {
        let mut latest = LatestDetections::new();
        assert!(latest.poll().is_empty());
        assert_eq!(latest.sequence(), 0);
    }

    #[test]
    fn test_latest_repeats_until_next_publish() {
        let mut latest = LatestDetections::new();
        let publisher = latest.publisher();

        publisher.publish(vec![Detection::at_depth(1, 0.4)].into());
        assert_eq!(latest.poll().len(), 1);
        assert_eq!(latest.poll().len(), 1);

        publisher.publish(DetectionFrame::empty());
        assert!(latest.poll().is_empty());
        assert_eq!(latest.sequence(), 2);
    }

    #[test]
    fn test_latest_across_threads() {
        let mut latest = LatestDetections::new();
        let publisher = latest.publisher();

        let worker = thread::spawn(move || {
            for i in 1..=10 {
                publisher.publish(vec![Detection::at_depth(i, i as f64 * 0.1)].into());
            }
        });
        worker.join().unwrap();

        let frame = latest.poll();
        assert_eq!(frame.detections()[0].id, 10);
        assert_eq!(latest.sequence(), 10);
    }
}
