//! Goal detection
//!
//! Decides when the active segment is finished. Exact arrival never
//! happens in flight, so both strategies accept "close enough":
//!
//! - **Half-plane**: the vehicle crossed a plane at the end of the segment,
//!   oriented along the bisector of the current and next directions and
//!   pulled back by a lead distance so the follower can start turning early.
//! - **Threshold distance**: the vehicle is within a fixed radius of the
//!   switching locus.
//!
//! Checks only run inside an angular window before the end of the segment.
//! Straight segments are always inside the window.

use crate::geometry::{sign, Vector2, RAD_TO_DEG};
use crate::parameters::{AirspeedParams, PathManagerParams, SwitchingStrategy};
use crate::segment::PathSegmentDescriptor;

use super::progress::ArcProgress;
use super::status::PreviousLocus;

/// Everything the detector looks at for one evaluation
#[derive(Clone, Copy, Debug)]
pub struct GoalInput<'a> {
    pub position: Vector2,
    pub previous: &'a PreviousLocus,
    pub current: &'a PathSegmentDescriptor,
    /// Descriptor following the current one, if the store has it
    pub next: Option<&'a PathSegmentDescriptor>,
    pub progress: &'a ArcProgress,
}

/// Configured goal detector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalDetector {
    strategy: SwitchingStrategy,
    /// Lead distance of the half-plane (m)
    lead_m: f32,
    threshold_m: f32,
    proximity_deg: f32,
}

impl GoalDetector {
    pub fn new(strategy: SwitchingStrategy, lead_m: f32, threshold_m: f32, proximity_deg: f32) -> Self {
        Self {
            strategy,
            lead_m,
            threshold_m,
            proximity_deg,
        }
    }

    /// Build from settings; the lead is half-plane timing at best-climb airspeed
    pub fn from_params(params: &PathManagerParams, airspeed: &AirspeedParams) -> Self {
        Self::new(
            params.switching_strategy,
            params.half_plane_timing_s * airspeed.best_climb,
            params.threshold_distance_m,
            params.proximity_angle_deg,
        )
    }

    pub fn strategy(&self) -> SwitchingStrategy {
        self.strategy
    }

    /// Whether the vehicle is close enough to the end to run the goal test
    pub fn in_proximity(&self, current: &PathSegmentDescriptor, progress: &ArcProgress) -> bool {
        sign(current.path_curvature) * progress.remaining_deg() < self.proximity_deg
    }

    /// Proximity-gated goal test
    pub fn check(&self, input: &GoalInput<'_>) -> bool {
        self.in_proximity(input.current, input.progress) && self.segment_complete(input)
    }

    /// Goal test without the proximity gate
    pub fn segment_complete(&self, input: &GoalInput<'_>) -> bool {
        match self.strategy {
            SwitchingStrategy::HalfPlane => {
                // Without a further segment the vehicle holds the last one
                let Some(next) = input.next else {
                    return false;
                };
                if input.progress.is_degenerate_arc() {
                    return true;
                }
                if input.current.is_straight() {
                    half_plane_crossed(
                        input.position,
                        input.previous.position.ne(),
                        input.current,
                        next,
                        self.lead_m,
                    )
                } else {
                    arc_plane_crossed(input.current, input.progress, self.lead_m)
                }
            }
            SwitchingStrategy::ThresholdDistance => {
                if input.progress.is_degenerate_arc() {
                    return true;
                }
                input
                    .position
                    .distance_to(input.current.switching_locus.ne())
                    < self.threshold_m
            }
        }
    }
}

/// Straight segment: has `position` crossed the (pulled back) end plane?
fn half_plane_crossed(
    position: Vector2,
    start: Vector2,
    current: &PathSegmentDescriptor,
    next: &PathSegmentDescriptor,
    lead_m: f32,
) -> bool {
    let end = current.switching_locus.ne();
    let Some(direction) = (end - start).normalized() else {
        // Zero-length segment, nothing to fly
        return true;
    };

    let next_direction = if next.is_straight() {
        (next.switching_locus.ne() - end).normalized()
    } else {
        None
    };
    let normal = next_direction
        .and_then(|n| (direction + n).normalized())
        .unwrap_or(direction);

    let plane_point = end - direction * lead_m;
    (position - plane_point).dot(normal) > 0.0
}

/// Arc segment: has the swept angle plus the lead angle passed the target?
fn arc_plane_crossed(current: &PathSegmentDescriptor, progress: &ArcProgress, lead_m: f32) -> bool {
    let lead_deg = lead_m * current.path_curvature.abs() * RAD_TO_DEG;
    sign(current.path_curvature) * (progress.completed_deg() - progress.to_complete_deg()) + lead_deg
        > 0.0
}
