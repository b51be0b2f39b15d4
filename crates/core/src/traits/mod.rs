//! Core traits for platform-agnostic path manager functionality.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Runtime implementations (tokio, RTOS) live outside the core crate

pub mod io;
pub mod time;

pub use io::{
    AlarmSink, FollowerMonitor, MockFollower, MockModeSource, MockPosition,
    ModeSource, PositionSource, RecordingAlarm, RecordingStatusSink,
    StatusSink,
};
pub use time::{MockTime, TimeSource};
