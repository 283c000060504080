//! Source that plays back a fixed list of frames.

use std::collections::VecDeque;

use super::traits::DetectionSource;
use crate::{Detection, DetectionFrame};

/// Plays a prepared sequence of frames, then reports empty frames forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<DetectionFrame>,
    polls: usize,
}

impl ScriptedSource {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = DetectionFrame>,
    {
        Self {
            frames: frames.into_iter().collect(),
            polls: 0,
        }
    }

    /// Build from per-frame depth lists. Each inner slice is one frame; every
    /// depth becomes a detection with id 0 and identity rotation.
    pub fn from_depths(frames: &[&[f64]]) -> Self {
        Self::new(frames.iter().map(|depths| {
            depths
                .iter()
                .map(|&z| Detection::at_depth(0, z))
                .collect::<DetectionFrame>()
        }))
    }

    /// Queue another frame at the end of the script.
    pub fn push(&mut self, frame: DetectionFrame) {
        self.frames.push_back(frame);
    }

    /// Frames not yet handed out.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Total number of polls served, including those past the end.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl DetectionSource for ScriptedSource {
    fn poll(&mut self) -> DetectionFrame {
        self.polls += 1;
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_plays_in_order() {
        let mut source = ScriptedSource::from_depths(&[&[0.5], &[], &[0.7, 0.9]]);
        assert_eq!(source.remaining(), 3);

        assert_eq!(source.poll().len(), 1);
        assert!(source.poll().is_empty());
        assert_eq!(source.poll().len(), 2);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_scripted_source_empty_after_end() {
        let mut source = ScriptedSource::from_depths(&[&[0.5]]);
        source.poll();

        for _ in 0..5 {
            assert!(source.poll().is_empty());
        }
        assert_eq!(source.polls(), 6);
    }

    #[test]
    fn test_scripted_source_push() {
        let mut source = ScriptedSource::default();
        assert!(source.poll().is_empty());

        source.push(vec![Detection::at_depth(3, 1.0)].into());
        let frame = source.poll();
        assert_eq!(frame.detections()[0].id, 3);
    }
}
