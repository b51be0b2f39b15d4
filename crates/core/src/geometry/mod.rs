//! Path geometry
//!
//! Pure planar geometry used by guidance: arc center construction, swept
//! angle measurement and circular angle wrapping. All angles measured here
//! are signed with clockwise (north toward east) positive, matching the sign
//! convention of path curvature.

mod vector;

pub use vector::{NedPosition, Vector2};

use libm::{atan2f, fmodf, sqrtf};

/// Degrees per radian
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Radians per degree
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;

/// Points closer than this (per axis, meters) are considered coincident
const COINCIDENT_TOLERANCE_M: f32 = 1e-6;

/// Outcome of the arc center solver
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcCenter {
    /// A unique center satisfies the request
    Found(Vector2),
    /// Start and end are the same point; the circle is undefined
    CoincidentPoints,
    /// The radius is too small to connect the two points
    InsufficientRadius,
}

impl ArcCenter {
    pub fn center(&self) -> Option<Vector2> {
        match self {
            ArcCenter::Found(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ArcCenter::Found(_))
    }
}

/// Find the center of the circle of `radius` joining `start` to `end`.
///
/// `clockwise` selects the turn direction, `minor` selects the shorter of
/// the two arcs (`false` for the major arc). Only `|radius|` is used.
/// A 1% radius allowance absorbs round-off when the chord equals the
/// diameter.
pub fn find_arc_center(
    start: Vector2,
    end: Vector2,
    radius: f32,
    clockwise: bool,
    minor: bool,
) -> ArcCenter {
    let chord = end - start;
    if chord.north.abs() < COINCIDENT_TOLERANCE_M && chord.east.abs() < COINCIDENT_TOLERANCE_M {
        return ArcCenter::CoincidentPoints;
    }

    let midpoint = (start + end) * 0.5;

    // Perpendicular to the chord, pointing toward the center
    let normal = if clockwise == minor {
        Vector2::new(-chord.east, chord.north)
    } else {
        Vector2::new(chord.east, -chord.north)
    };

    // Distance along the perpendicular bisector, in units of |chord|
    let mut d2 = radius * radius / normal.dot(normal) - 0.25;
    if d2 < 0.0 {
        let allowance = radius * 0.01;
        if d2 > -(allowance * allowance) {
            d2 = 0.0;
        } else {
            return ArcCenter::InsufficientRadius;
        }
    }

    ArcCenter::Found(midpoint + normal * sqrtf(d2))
}

/// Signed angle (radians) swept from `from` to `to` about `center`.
///
/// Result lies in (-pi, pi]; positive is clockwise.
pub fn measure_arc_rad(from: Vector2, to: Vector2, center: Vector2) -> f32 {
    let a = from - center;
    let b = to - center;
    atan2f(a.cross(b), a.dot(b))
}

/// Wrap an angle in degrees into (-180, 180]
pub fn circular_modulus_deg(angle: f32) -> f32 {
    let mut wrapped = fmodf(angle + 180.0, 360.0);
    if wrapped <= 0.0 {
        wrapped += 360.0;
    }
    wrapped - 180.0
}

/// Sign of a value as -1, 0 or +1
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
