//! Collaborator interfaces of the path manager task.
//!
//! Every external datum is sampled through one of these traits once per
//! cycle (copy-in) and every output leaves through one of them (copy-out).

use crate::geometry::NedPosition;
use crate::guidance::SequencerStatus;
use crate::mode::FlightMode;

/// Current vehicle position in the local NED frame
pub trait PositionSource {
    fn position(&self) -> NedPosition;
}

/// Receives the sequencer status whenever it changes
pub trait StatusSink {
    fn publish(&mut self, status: &SequencerStatus);
}

/// Critical "path manager" alarm
pub trait AlarmSink {
    fn set_critical(&mut self);
    fn clear(&mut self);
}

/// Reports whether the path follower task is running
pub trait FollowerMonitor {
    fn follower_running(&self) -> bool;
}

/// External mode signal sampled by the dispatcher
///
/// Resolvers read whichever field their variant needs.
pub trait ModeSource {
    fn flight_mode(&self) -> FlightMode;
    fn planner_path_ready(&self) -> bool;
}

// ============================================================================
// Recording mocks
// ============================================================================

/// Fixed position source, settable between cycles
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPosition {
    pub position: NedPosition,
}

impl MockPosition {
    pub fn new(north: f32, east: f32) -> Self {
        Self {
            position: NedPosition::new(north, east, 0.0),
        }
    }

    pub fn set(&mut self, north: f32, east: f32) {
        self.position = NedPosition::new(north, east, self.position.down);
    }
}

impl PositionSource for MockPosition {
    fn position(&self) -> NedPosition {
        self.position
    }
}

/// Status sink keeping the most recent publications
#[derive(Debug, Default)]
pub struct RecordingStatusSink {
    pub published: heapless::Vec<SequencerStatus, 64>,
    /// Total publications, including those beyond the buffer capacity
    pub count: usize,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SequencerStatus> {
        self.published.last()
    }
}

impl StatusSink for RecordingStatusSink {
    fn publish(&mut self, status: &SequencerStatus) {
        if self.published.is_full() {
            self.published.remove(0);
        }
        let _ = self.published.push(*status);
        self.count += 1;
    }
}

/// Alarm sink tracking the current alarm state and how often it was raised
#[derive(Debug, Default)]
pub struct RecordingAlarm {
    pub critical: bool,
    pub raised: u32,
    pub cleared: u32,
}

impl AlarmSink for RecordingAlarm {
    fn set_critical(&mut self) {
        self.critical = true;
        self.raised += 1;
    }

    fn clear(&mut self) {
        self.critical = false;
        self.cleared += 1;
    }
}

/// Follower monitor with a settable running flag
#[derive(Debug, Default)]
pub struct MockFollower {
    pub running: bool,
}

impl FollowerMonitor for MockFollower {
    fn follower_running(&self) -> bool {
        self.running
    }
}

/// Mode source with settable fields
#[derive(Debug, Clone, Copy, Default)]
pub struct MockModeSource {
    pub flight_mode: FlightMode,
    pub path_ready: bool,
}

impl ModeSource for MockModeSource {
    fn flight_mode(&self) -> FlightMode {
        self.flight_mode
    }

    fn planner_path_ready(&self) -> bool {
        self.path_ready
    }
}
