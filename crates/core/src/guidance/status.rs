//! Sequencer status types
//!
//! The status record is the sequencer's only output to the path follower:
//! the follower watches `path_counter` to detect a new path and
//! `active_segment` to know which descriptor to fly.

use crate::geometry::NedPosition;

/// Timeout value meaning "no bound"
pub const UNBOUNDED_TIMEOUT_S: u16 = u16::MAX;

/// Segment execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PathStatus {
    /// Segment being flown normally
    #[default]
    InProgress,
    /// Segment exceeded its computed timeout
    TimedOut,
    /// Vehicle flew well past the end of a straight segment
    Overshoot,
}

impl PathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::InProgress => "InProgress",
            PathStatus::TimedOut => "TimedOut",
            PathStatus::Overshoot => "Overshoot",
        }
    }
}

/// Published sequencer status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SequencerStatus {
    /// Index of the descriptor being flown
    pub active_segment: u16,
    /// Incremented (wrapping) on every path activation
    pub path_counter: u16,
    pub status: PathStatus,
    /// Time budget of the active segment in seconds
    pub timeout_s: u16,
}

/// Where the active segment started
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PreviousLocus {
    pub position: NedPosition,
    pub velocity: f32,
}
