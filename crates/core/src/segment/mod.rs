//! Path Segment Types
//!
//! A path is an ordered list of [`PathSegmentDescriptor`]s published by a
//! planner (or by a canned program, see [`programs`]). Descriptor `i`
//! describes how to fly from the switching locus of descriptor `i - 1` to its
//! own switching locus; descriptor 0 therefore only anchors the start of the
//! path.
//!
//! # Storage
//!
//! - Fixed-size descriptor array (max 32 segments)
//! - Read by index; the sequencer never mutates it
//! - Replaced wholesale when a new program is loaded

pub mod programs;
mod store;

pub use store::{SegmentProgram, SegmentStore, MAX_SEGMENTS};

use crate::geometry::NedPosition;

/// Which of the two geometrically valid arcs joins a chord at a given radius
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArcRank {
    /// Arc shorter than a half circle
    #[default]
    Minor,
    /// Arc longer than a half circle
    Major,
}

/// One segment of a path
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PathSegmentDescriptor {
    /// Point at which the vehicle switches to the next segment (NED, meters)
    pub switching_locus: NedPosition,
    /// Signed curvature (1/m). 0 = straight line, positive = clockwise turn
    pub path_curvature: f32,
    /// Arc selection for curved segments
    pub arc_rank: ArcRank,
    /// Full orbits to fly before the switching locus (curved segments)
    pub number_of_orbits: u32,
    /// Velocity at the end of the segment (m/s)
    pub final_velocity: f32,
}

impl PathSegmentDescriptor {
    /// Straight line ending at `locus`
    pub fn line(locus: NedPosition, final_velocity: f32) -> Self {
        Self {
            switching_locus: locus,
            final_velocity,
            ..Self::default()
        }
    }

    /// Arc of the given signed curvature ending at `locus`
    pub fn arc(
        locus: NedPosition,
        curvature: f32,
        arc_rank: ArcRank,
        number_of_orbits: u32,
        final_velocity: f32,
    ) -> Self {
        Self {
            switching_locus: locus,
            path_curvature: curvature,
            arc_rank,
            number_of_orbits,
            final_velocity,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.path_curvature == 0.0
    }

    pub fn is_arc(&self) -> bool {
        !self.is_straight()
    }

    /// Arc radius in meters (infinite for straight lines)
    pub fn radius(&self) -> f32 {
        1.0 / self.path_curvature
    }

    pub fn is_clockwise(&self) -> bool {
        self.path_curvature > 0.0
    }
}

/// Errors from segment store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentError {
    /// Program does not fit in the store
    StoreFull,
    /// Program has no descriptors
    EmptyProgram,
}

impl core::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SegmentError::StoreFull => write!(f, "segment store full (max {} segments)", MAX_SEGMENTS),
            SegmentError::EmptyProgram => write!(f, "segment program is empty"),
        }
    }
}
