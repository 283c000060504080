//! Detection sources feeding the distance estimator.
//!
//! - `ScriptedSource` - fixed frame list, for tests and simulation
//! - `LatestDetections` - latest-frame mailbox written by a capture worker
//! - `RecordingSource` - replay of a recorded CSV detection log

mod traits;
mod scripted;
mod latest;
mod recording;

pub use traits::DetectionSource;
pub use scripted::ScriptedSource;
pub use latest::{FramePublisher, LatestDetections};
pub use recording::RecordingSource;
