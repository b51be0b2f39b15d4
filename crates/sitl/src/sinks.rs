//! Recording status and alarm sinks.
//!
//! Every publication is logged and kept with its simulation timestamp for
//! the run summary.

use serde::Serialize;

use path_manager_core::guidance::SequencerStatus;
use path_manager_core::traits::{AlarmSink, StatusSink};

/// One published status, as recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub at_ms: u64,
    pub active_segment: u16,
    pub path_counter: u16,
    pub status: String,
    pub timeout_s: u16,
}

/// Status sink keeping every publication
#[derive(Debug, Default)]
pub struct StatusLog {
    now_ms: u64,
    records: Vec<StatusRecord>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp for publications in the upcoming cycle
    pub fn set_time(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub fn records(&self) -> &[StatusRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StatusRecord> {
        self.records
    }
}

impl StatusSink for StatusLog {
    fn publish(&mut self, status: &SequencerStatus) {
        log::info!(
            "[{} ms] segment {} counter {} {} timeout {} s",
            self.now_ms,
            status.active_segment,
            status.path_counter,
            status.status.as_str(),
            status.timeout_s
        );
        self.records.push(StatusRecord {
            at_ms: self.now_ms,
            active_segment: status.active_segment,
            path_counter: status.path_counter,
            status: status.status.as_str().to_string(),
            timeout_s: status.timeout_s,
        });
    }
}

/// Alarm transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmRecord {
    pub at_ms: u64,
    pub critical: bool,
}

/// Alarm sink recording transitions
#[derive(Debug, Default)]
pub struct AlarmLog {
    now_ms: u64,
    critical: bool,
    records: Vec<AlarmRecord>,
}

impl AlarmLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn records(&self) -> &[AlarmRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AlarmRecord> {
        self.records
    }

    fn transition(&mut self, critical: bool) {
        if self.critical == critical {
            return;
        }
        self.critical = critical;
        self.records.push(AlarmRecord {
            at_ms: self.now_ms,
            critical,
        });
    }
}

impl AlarmSink for AlarmLog {
    fn set_critical(&mut self) {
        if !self.critical {
            log::warn!("[{} ms] path manager alarm CRITICAL", self.now_ms);
        }
        self.transition(true);
    }

    fn clear(&mut self) {
        if self.critical {
            log::info!("[{} ms] path manager alarm cleared", self.now_ms);
        }
        self.transition(false);
    }
}
