//! Guidance sequencing
//!
//! Turns an ordered list of path segments into the single active segment
//! the path follower tracks, and decides tick by tick when to move on.

pub mod goal;
pub mod progress;
pub mod sequencer;
pub mod status;
pub mod supervisor;

pub use goal::{GoalDetector, GoalInput};
pub use progress::ArcProgress;
pub use sequencer::{segment_timeout_s, SegmentSequencer};
pub use status::{PathStatus, PreviousLocus, SequencerStatus, UNBOUNDED_TIMEOUT_S};
pub use supervisor::{overshot, OvershootSupervisor, TimeoutSupervisor};
