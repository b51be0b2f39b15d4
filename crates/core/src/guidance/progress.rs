//! Arc progress tracker
//!
//! Integrates the angle swept about the center of the active arc, one
//! position sample at a time. Summing small increments keeps the measure
//! valid across multiple orbits, where a direct start-to-current
//! measurement would wrap. Round-off is trimmed every `cadence` updates by
//! comparing the integral against the direct measurement modulo 360°.

use crate::geometry::{
    circular_modulus_deg, find_arc_center, measure_arc_rad, sign, ArcCenter, Vector2, RAD_TO_DEG,
};
use crate::segment::{ArcRank, PathSegmentDescriptor};

/// Angular progress along the active segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcProgress {
    /// Center solver outcome, `None` for straight segments
    center: Option<ArcCenter>,
    completed_deg: f32,
    to_complete_deg: f32,
    old_position: Vector2,
    start_position: Vector2,
    trim_counter: u32,
}

impl Default for ArcProgress {
    fn default() -> Self {
        Self::straight()
    }
}

impl ArcProgress {
    /// Progress for a straight segment: nothing to integrate
    pub const fn straight() -> Self {
        Self {
            center: None,
            completed_deg: 0.0,
            to_complete_deg: 0.0,
            old_position: Vector2::ZERO,
            start_position: Vector2::ZERO,
            trim_counter: 0,
        }
    }

    /// Start tracking `segment`, flown from `start`
    ///
    /// For arcs the target angle is the entry angle start→end about the
    /// center, forced to the turn direction, plus the requested full orbits.
    pub fn begin(start: Vector2, segment: &PathSegmentDescriptor) -> Self {
        if segment.is_straight() {
            return Self::straight();
        }

        let end = segment.switching_locus.ne();
        let curvature_sign = sign(segment.path_curvature);
        let outcome = find_arc_center(
            start,
            end,
            segment.radius(),
            segment.is_clockwise(),
            segment.arc_rank == ArcRank::Minor,
        );

        let to_complete_deg = match outcome {
            ArcCenter::Found(center) => {
                let mut entry_deg = measure_arc_rad(start, end, center) * RAD_TO_DEG;
                if curvature_sign * entry_deg < 0.0 {
                    entry_deg += 360.0 * curvature_sign;
                }
                curvature_sign * segment.number_of_orbits as f32 * 360.0 + entry_deg
            }
            _ => 0.0,
        };

        Self {
            center: Some(outcome),
            completed_deg: 0.0,
            to_complete_deg,
            old_position: start,
            start_position: start,
            trim_counter: 0,
        }
    }

    /// Integrate the angle swept since the previous sample
    ///
    /// No-op unless the segment is an arc with a center. Every `cadence`-th
    /// call re-measures start→current directly and folds the wrapped
    /// difference into the integral.
    pub fn update(&mut self, position: Vector2, cadence: u32) {
        let Some(center) = self.arc_center() else {
            return;
        };

        self.completed_deg += measure_arc_rad(self.old_position, position, center) * RAD_TO_DEG;
        self.old_position = position;

        self.trim_counter += 1;
        if self.trim_counter >= cadence.max(1) {
            self.trim_counter = 0;
            let direct_deg = measure_arc_rad(self.start_position, position, center) * RAD_TO_DEG;
            self.completed_deg += circular_modulus_deg(direct_deg - self.completed_deg);
        }
    }

    /// Arc center, if the segment is an arc and one was found
    pub fn arc_center(&self) -> Option<Vector2> {
        self.center.and_then(|c| c.center())
    }

    /// Arc segment whose center could not be constructed
    pub fn is_degenerate_arc(&self) -> bool {
        matches!(self.center, Some(c) if !c.is_found())
    }

    pub fn center_outcome(&self) -> Option<ArcCenter> {
        self.center
    }

    pub fn completed_deg(&self) -> f32 {
        self.completed_deg
    }

    pub fn to_complete_deg(&self) -> f32 {
        self.to_complete_deg
    }

    /// Angle still to fly, signed like the curvature
    pub fn remaining_deg(&self) -> f32 {
        self.to_complete_deg - self.completed_deg
    }
}
