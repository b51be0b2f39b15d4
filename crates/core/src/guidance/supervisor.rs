//! Safety supervisors
//!
//! Watchdogs that run after the goal check when the segment did not
//! advance. The timeout supervisor bounds time spent on a segment; the
//! overshoot supervisor catches a vehicle that kept flying past the end of
//! a straight segment because nothing told it where to go next.

use crate::geometry::Vector2;
use crate::parameters::{AirspeedParams, PathManagerParams};
use crate::segment::PathSegmentDescriptor;

use super::status::{PathStatus, PreviousLocus, SequencerStatus};

/// Segment timeout check
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeoutSupervisor;

impl TimeoutSupervisor {
    /// Elapsed segment time exceeds the published timeout
    ///
    /// Returns `false` once the segment is flagged `TimedOut` or `Overshoot`.
    pub fn expired(&self, status: &SequencerStatus, segment_timer_ms: u64, now_ms: u64) -> bool {
        if status.status != PathStatus::InProgress {
            return false;
        }
        now_ms.saturating_sub(segment_timer_ms) > u64::from(status.timeout_s) * 1000
    }
}

/// Periodic overshoot check for straight segments
#[derive(Clone, Copy, Debug)]
pub struct OvershootSupervisor {
    period_ms: u32,
    /// Distance past the end locus tolerated before flagging (m)
    margin_m: f32,
    last_check_ms: u64,
}

impl OvershootSupervisor {
    pub fn new(period_ms: u32, margin_m: f32) -> Self {
        Self {
            period_ms,
            margin_m,
            last_check_ms: 0,
        }
    }

    /// Margin is `PM_OVS_MARGIN` seconds at best-climb airspeed
    pub fn from_params(params: &PathManagerParams, airspeed: &AirspeedParams) -> Self {
        Self::new(
            params.overshoot_period_ms,
            params.overshoot_margin_s * airspeed.best_climb,
        )
    }

    /// Apply new tunables, keeping the check phase
    pub fn reconfigure(&mut self, params: &PathManagerParams, airspeed: &AirspeedParams) {
        self.period_ms = params.overshoot_period_ms;
        self.margin_m = params.overshoot_margin_s * airspeed.best_climb;
    }

    pub fn margin_m(&self) -> f32 {
        self.margin_m
    }

    /// Period elapsed since the last check
    pub fn due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_check_ms) > u64::from(self.period_ms)
    }

    /// Run the check if due; `true` when an overshoot is detected
    pub fn poll(
        &mut self,
        now_ms: u64,
        position: Vector2,
        previous: &PreviousLocus,
        current: &PathSegmentDescriptor,
    ) -> bool {
        if !self.due(now_ms) {
            return false;
        }
        self.last_check_ms = now_ms;
        overshot(position, previous, current, self.margin_m)
    }
}

/// Position is beyond the end of a straight segment by more than `margin_m`
///
/// Arcs and zero-length segments never report an overshoot.
pub fn overshot(
    position: Vector2,
    previous: &PreviousLocus,
    current: &PathSegmentDescriptor,
    margin_m: f32,
) -> bool {
    if !current.is_straight() {
        return false;
    }
    let end = current.switching_locus.ne();
    let Some(direction) = (end - previous.position.ne()).normalized() else {
        return false;
    };
    let extended = end + direction * margin_m;
    (position - extended).dot(direction) > 0.0
}
