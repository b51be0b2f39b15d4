//! Segment Sequencer
//!
//! State machine that owns the active segment: which descriptor is flown,
//! where it started, how far along an arc the vehicle is and how long the
//! segment may take. It is driven by the path manager task, which decides
//! when to activate, advance or flag the segment.
//!
//! The sequencer reads descriptors from a [`SegmentStore`] and writes its
//! status through a [`StatusSink`]; it knows nothing about modes, alarms or
//! scheduling. Status is published only when it changes.

use libm::ceilf;

use crate::geometry::{NedPosition, Vector2, DEG_TO_RAD};
use crate::segment::{ArcRank, PathSegmentDescriptor, SegmentStore};
use crate::traits::StatusSink;
use crate::{log_debug, log_info, log_warn};

use super::progress::ArcProgress;
use super::status::{PathStatus, PreviousLocus, SequencerStatus, UNBOUNDED_TIMEOUT_S};

/// Segment sequencer
pub struct SegmentSequencer {
    status: SequencerStatus,
    last_published: Option<SequencerStatus>,
    previous: PreviousLocus,
    current: PathSegmentDescriptor,
    progress: ArcProgress,
    /// Time (ms) the active segment started
    segment_timer_ms: u64,
    /// Cleared on mode change; the next cycle activates the loaded path
    activated: bool,
    /// Set while an advance past the end of the store is being refused
    holding_last: bool,
}

impl SegmentSequencer {
    /// Create a sequencer waiting for activation
    pub const fn new() -> Self {
        Self {
            status: SequencerStatus {
                active_segment: 0,
                path_counter: 0,
                status: PathStatus::InProgress,
                timeout_s: 0,
            },
            last_published: None,
            previous: PreviousLocus {
                position: NedPosition::new(0.0, 0.0, 0.0),
                velocity: 0.0,
            },
            current: PathSegmentDescriptor {
                switching_locus: NedPosition::new(0.0, 0.0, 0.0),
                path_curvature: 0.0,
                arc_rank: ArcRank::Minor,
                number_of_orbits: 0,
                final_velocity: 0.0,
            },
            progress: ArcProgress::straight(),
            segment_timer_ms: 0,
            activated: false,
            holding_last: false,
        }
    }

    pub fn status(&self) -> &SequencerStatus {
        &self.status
    }

    pub fn previous_locus(&self) -> &PreviousLocus {
        &self.previous
    }

    pub fn current_segment(&self) -> &PathSegmentDescriptor {
        &self.current
    }

    pub fn progress(&self) -> &ArcProgress {
        &self.progress
    }

    pub fn segment_timer_ms(&self) -> u64 {
        self.segment_timer_ms
    }

    /// Whether a path is loaded and being flown
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Force the "just activated" state; the next cycle restarts the path
    pub fn request_activation(&mut self) {
        self.activated = false;
    }

    /// Start the loaded path from its first segment
    ///
    /// Resets the index, bumps the path counter so the follower notices the
    /// new path, then advances onto segment 1 (segment 0 anchors the start).
    ///
    /// A program without a segment after the anchor leaves the vehicle
    /// holding the anchor with an unbounded timeout. An empty store holds
    /// the last known locus.
    pub fn activate(&mut self, store: &dyn SegmentStore, now_ms: u64, sink: &mut dyn StatusSink) {
        self.current = match store.get(0) {
            Some(first) => first,
            None => {
                log_warn!("Activated on an empty segment store");
                PathSegmentDescriptor::line(self.current.switching_locus, 0.0)
            }
        };
        self.previous = PreviousLocus {
            position: self.current.switching_locus,
            velocity: self.current.final_velocity,
        };
        self.progress = ArcProgress::straight();

        self.status.active_segment = 0;
        self.status.path_counter = self.status.path_counter.wrapping_add(1);
        self.status.status = PathStatus::InProgress;
        self.status.timeout_s = UNBOUNDED_TIMEOUT_S;
        self.publish(sink);

        self.activated = true;
        self.holding_last = false;
        self.segment_timer_ms = now_ms;

        log_info!(
            "Path activated (counter {}, {} segments)",
            self.status.path_counter,
            store.count()
        );

        self.advance(store, now_ms, sink);
    }

    /// Move to the next segment
    ///
    /// Returns `false` when the store has no further descriptor; the current
    /// segment is then kept.
    pub fn advance(&mut self, store: &dyn SegmentStore, now_ms: u64, sink: &mut dyn StatusSink) -> bool {
        let next_index = self.status.active_segment.wrapping_add(1);
        let Some(next) = store.get(next_index) else {
            if !self.holding_last {
                log_warn!(
                    "No segment {} in store ({} segments), holding segment {}",
                    next_index,
                    store.count(),
                    self.status.active_segment
                );
                self.holding_last = true;
            }
            return false;
        };
        self.holding_last = false;

        // The descriptor at the current index is normally the one being
        // flown; after a store replacement only `current` is trustworthy.
        let past = store.get(self.status.active_segment).unwrap_or(self.current);
        self.previous = PreviousLocus {
            position: past.switching_locus,
            velocity: past.final_velocity,
        };

        self.status.active_segment = next_index;
        self.status.status = PathStatus::InProgress;
        self.current = next;

        self.progress = ArcProgress::begin(self.previous.position.ne(), &self.current);
        if self.progress.is_degenerate_arc() {
            log_warn!(
                "Segment {} arc has no center, skipping",
                self.status.active_segment
            );
        }

        self.status.timeout_s = segment_timeout_s(&self.previous, &self.current, &self.progress);
        self.segment_timer_ms = now_ms;
        self.publish(sink);

        log_debug!(
            "Advanced to segment {} (timeout {} s)",
            self.status.active_segment,
            self.status.timeout_s
        );
        true
    }

    /// Feed one position sample to the arc integrator
    pub fn update_progress(&mut self, position: Vector2, trim_cadence: u32) {
        self.progress.update(position, trim_cadence);
    }

    /// Set a non-nominal status code and publish it if new
    pub fn set_status(&mut self, status: PathStatus, sink: &mut dyn StatusSink) {
        self.status.status = status;
        self.publish(sink);
    }

    fn publish(&mut self, sink: &mut dyn StatusSink) {
        if self.last_published != Some(self.status) {
            sink.publish(&self.status);
            self.last_published = Some(self.status);
        }
    }
}

impl Default for SegmentSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Time budget (s) for flying `current` from `previous` at its final velocity
///
/// Straight segments use the chord; arcs use the target angle over the
/// curvature. A non-positive velocity yields the unbounded sentinel.
pub fn segment_timeout_s(
    previous: &PreviousLocus,
    current: &PathSegmentDescriptor,
    progress: &ArcProgress,
) -> u16 {
    let length = if current.is_straight() {
        previous
            .position
            .ne()
            .distance_to(current.switching_locus.ne())
    } else {
        progress.to_complete_deg() * DEG_TO_RAD / current.path_curvature
    };

    if current.final_velocity > 0.0 {
        let seconds = ceilf(length.abs() / current.final_velocity);
        if seconds.is_nan() {
            UNBOUNDED_TIMEOUT_S
        } else {
            seconds.clamp(0.0, UNBOUNDED_TIMEOUT_S as f32) as u16
        }
    } else {
        UNBOUNDED_TIMEOUT_S
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentProgram;
    use crate::traits::RecordingStatusSink;

    fn straight_program() -> SegmentProgram {
        SegmentProgram::from_slice(&[
            PathSegmentDescriptor::line(NedPosition::new(0.0, 0.0, 0.0), 10.0),
            PathSegmentDescriptor::line(NedPosition::new(120.0, 0.0, 0.0), 10.0),
            PathSegmentDescriptor::line(NedPosition::new(120.0, 80.0, 0.0), 10.0),
            PathSegmentDescriptor::line(NedPosition::new(-80.0, 80.0, 0.0), 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_sequencer_needs_activation() {
        let seq = SegmentSequencer::new();
        assert!(!seq.is_activated());
        assert_eq!(seq.status().path_counter, 0);
    }

    #[test]
    fn test_activate_advances_to_first_segment() {
        let store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();

        seq.activate(&store, 1_000, &mut sink);

        assert!(seq.is_activated());
        let status = seq.status();
        assert_eq!(status.active_segment, 1);
        assert_eq!(status.path_counter, 1);
        assert_eq!(status.status, PathStatus::InProgress);
        assert_eq!(status.timeout_s, 12);
        assert_eq!(seq.segment_timer_ms(), 1_000);
        assert_eq!(seq.previous_locus().position, NedPosition::new(0.0, 0.0, 0.0));
        assert_eq!(sink.last(), Some(status));
    }

    #[test]
    fn test_advance_records_previous_locus_and_timeout() {
        let store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);

        assert!(seq.advance(&store, 5_000, &mut sink));
        assert_eq!(seq.status().active_segment, 2);
        assert_eq!(seq.status().timeout_s, 8);
        assert_eq!(seq.previous_locus().position, NedPosition::new(120.0, 0.0, 0.0));
        assert!((seq.previous_locus().velocity - 10.0).abs() < 1e-6);
        assert_eq!(seq.segment_timer_ms(), 5_000);

        assert!(seq.advance(&store, 6_000, &mut sink));
        assert_eq!(seq.status().timeout_s, 20);
    }

    #[test]
    fn test_advance_past_end_keeps_segment() {
        let store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);
        seq.advance(&store, 0, &mut sink);
        seq.advance(&store, 0, &mut sink);
        let published = sink.count;

        assert!(!seq.advance(&store, 9_000, &mut sink));
        assert_eq!(seq.status().active_segment, 3);
        assert_eq!(seq.segment_timer_ms(), 0);
        assert_eq!(sink.count, published);
    }

    #[test]
    fn test_store_shrunk_under_sequencer() {
        let mut store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);
        seq.advance(&store, 0, &mut sink);
        seq.advance(&store, 0, &mut sink);

        store
            .replace(&[
                PathSegmentDescriptor::line(NedPosition::new(0.0, 0.0, 0.0), 10.0),
                PathSegmentDescriptor::line(NedPosition::new(10.0, 0.0, 0.0), 10.0),
            ])
            .unwrap();

        assert!(!seq.advance(&store, 0, &mut sink));
        assert_eq!(
            seq.current_segment().switching_locus,
            NedPosition::new(-80.0, 80.0, 0.0)
        );
    }

    #[test]
    fn test_path_counter_wraps() {
        let store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.status.path_counter = u16::MAX;
        seq.activate(&store, 0, &mut sink);
        assert_eq!(seq.status().path_counter, 0);
    }

    fn orbit_program() -> SegmentProgram {
        SegmentProgram::from_slice(&[
            PathSegmentDescriptor::line(NedPosition::new(0.0, 0.0, 0.0), 10.0),
            PathSegmentDescriptor::arc(
                NedPosition::new(100.0, 0.0, 0.0),
                1.0 / 50.0,
                ArcRank::Minor,
                5,
                10.0,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_reactivation_on_anchor_only_program_resets_path_state() {
        let mut store = orbit_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);
        assert!(seq.progress().arc_center().is_some());

        let hold = NedPosition::new(900.0, 900.0, 0.0);
        store
            .replace(&[PathSegmentDescriptor::line(hold, 10.0)])
            .unwrap();
        seq.request_activation();
        seq.activate(&store, 60_000, &mut sink);

        let status = *seq.status();
        assert_eq!(status.active_segment, 0);
        assert_eq!(status.path_counter, 2);
        assert_eq!(status.timeout_s, UNBOUNDED_TIMEOUT_S);
        assert_eq!(sink.last(), Some(&status));
        assert_eq!(seq.current_segment().switching_locus, hold);
        assert_eq!(seq.previous_locus().position, hold);
        assert!(seq.progress().arc_center().is_none());

        // A straight segment accumulates no arc angle
        seq.update_progress(Vector2::new(0.0, 50.0), 128);
        seq.update_progress(Vector2::new(50.0, 0.0), 128);
        assert_eq!(seq.progress().completed_deg(), 0.0);
    }

    #[test]
    fn test_activation_on_empty_store_holds_last_locus() {
        let mut store = orbit_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);

        store.clear();
        seq.activate(&store, 1_000, &mut sink);

        assert_eq!(seq.status().active_segment, 0);
        assert_eq!(seq.status().timeout_s, UNBOUNDED_TIMEOUT_S);
        assert!(seq.current_segment().is_straight());
        assert_eq!(
            seq.current_segment().switching_locus,
            NedPosition::new(100.0, 0.0, 0.0)
        );
        assert!(seq.progress().arc_center().is_none());
    }

    #[test]
    fn test_set_status_publishes_once() {
        let store = straight_program();
        let mut sink = RecordingStatusSink::new();
        let mut seq = SegmentSequencer::new();
        seq.activate(&store, 0, &mut sink);
        let before = sink.count;

        seq.set_status(PathStatus::TimedOut, &mut sink);
        seq.set_status(PathStatus::TimedOut, &mut sink);
        assert_eq!(sink.count, before + 1);
        assert_eq!(sink.last().map(|s| s.status), Some(PathStatus::TimedOut));

        seq.advance(&store, 0, &mut sink);
        assert_eq!(seq.status().status, PathStatus::InProgress);
    }

    #[test]
    fn test_timeout_straight_segment() {
        let prev = PreviousLocus {
            position: NedPosition::new(0.0, 0.0, 0.0),
            velocity: 0.0,
        };
        let seg = PathSegmentDescriptor::line(NedPosition::new(30.0, 40.0, 0.0), 10.0);
        assert_eq!(segment_timeout_s(&prev, &seg, &ArcProgress::straight()), 5);

        let seg = PathSegmentDescriptor::line(NedPosition::new(30.0, 41.0, 0.0), 10.0);
        assert_eq!(segment_timeout_s(&prev, &seg, &ArcProgress::straight()), 6);
    }

    #[test]
    fn test_timeout_zero_length_is_zero() {
        let prev = PreviousLocus::default();
        let seg = PathSegmentDescriptor::line(NedPosition::new(0.0, 0.0, 0.0), 10.0);
        assert_eq!(segment_timeout_s(&prev, &seg, &ArcProgress::straight()), 0);
    }

    #[test]
    fn test_timeout_unbounded_without_velocity() {
        let prev = PreviousLocus::default();
        let seg = PathSegmentDescriptor::line(NedPosition::new(100.0, 0.0, 0.0), 0.0);
        assert_eq!(
            segment_timeout_s(&prev, &seg, &ArcProgress::straight()),
            UNBOUNDED_TIMEOUT_S
        );
    }

    #[test]
    fn test_timeout_clamped_for_long_segment() {
        let prev = PreviousLocus::default();
        let seg = PathSegmentDescriptor::line(NedPosition::new(1.0e6, 0.0, 0.0), 1.0);
        assert_eq!(
            segment_timeout_s(&prev, &seg, &ArcProgress::straight()),
            UNBOUNDED_TIMEOUT_S
        );
    }

    #[test]
    fn test_timeout_arc_uses_swept_length() {
        // Quarter circle, r = 40 m: length 20*pi ~ 62.8 m at 10 m/s
        let prev = PreviousLocus {
            position: NedPosition::new(40.0, 0.0, 0.0),
            velocity: 10.0,
        };
        let seg = PathSegmentDescriptor::arc(
            NedPosition::new(0.0, 40.0, 0.0),
            1.0 / 40.0,
            ArcRank::Minor,
            0,
            10.0,
        );
        let progress = ArcProgress::begin(prev.position.ne(), &seg);
        assert_eq!(segment_timeout_s(&prev, &seg, &progress), 7);
    }

    #[test]
    fn test_timeout_counter_clockwise_arc_positive() {
        let prev = PreviousLocus {
            position: NedPosition::new(40.0, 0.0, 0.0),
            velocity: 10.0,
        };
        let seg = PathSegmentDescriptor::arc(
            NedPosition::new(0.0, -40.0, 0.0),
            -1.0 / 40.0,
            ArcRank::Minor,
            0,
            10.0,
        );
        let progress = ArcProgress::begin(prev.position.ne(), &seg);
        assert_eq!(segment_timeout_s(&prev, &seg, &progress), 7);
    }
}
