//! Canned segment programs
//!
//! Pre-generated programs loaded by the guidance dispatcher when the vehicle
//! enters a mode that has no planner behind it (return-to-home,
//! position-hold, and the demonstration pattern used when the planner is
//! absent). Every program starts with a descriptor anchored at the current
//! position so the first flown segment begins where the vehicle is.

use super::{ArcRank, PathSegmentDescriptor, SegmentError, SegmentProgram};
use crate::geometry::{NedPosition, Vector2};

/// Orbit count standing in for "loiter until told otherwise"
pub const HOLD_ORBITS: u32 = 1_000_000;

/// Inputs shared by all canned programs
#[derive(Clone, Copy, Debug)]
pub struct ProgramContext {
    /// Vehicle position when the program is loaded
    pub position: NedPosition,
    /// Commanded airspeed for every segment (m/s)
    pub cruise_speed: f32,
    /// Radius of loiter circles (m)
    pub loiter_radius: f32,
}

/// Fly home (NED origin, current altitude) and orbit it.
pub fn return_to_home(ctx: &ProgramContext) -> Result<SegmentProgram, SegmentError> {
    let home = NedPosition::new(0.0, 0.0, ctx.position.down);
    loiter_around(ctx, home)
}

/// Orbit the point where the vehicle currently is.
pub fn hold_position(ctx: &ProgramContext) -> Result<SegmentProgram, SegmentError> {
    loiter_around(ctx, ctx.position)
}

/// Racetrack pattern anchored at the current position.
///
/// Two straight legs joined by clockwise semicircles. The program ends on
/// the second semicircle, where the vehicle holds.
pub fn racetrack(ctx: &ProgramContext) -> Result<SegmentProgram, SegmentError> {
    let r = ctx.loiter_radius;
    let leg = 4.0 * r;
    let speed = ctx.cruise_speed;
    let p = ctx.position;

    // Semicircle chords equal the leg width (2r)
    let turn = 1.0 / r;

    SegmentProgram::from_slice(&[
        PathSegmentDescriptor::line(p, speed),
        PathSegmentDescriptor::line(p.offset_ne(Vector2::new(leg, 0.0)), speed),
        PathSegmentDescriptor::arc(
            p.offset_ne(Vector2::new(leg, 2.0 * r)),
            turn,
            ArcRank::Minor,
            0,
            speed,
        ),
        PathSegmentDescriptor::line(p.offset_ne(Vector2::new(0.0, 2.0 * r)), speed),
        PathSegmentDescriptor::arc(p, turn, ArcRank::Minor, 0, speed),
    ])
}

/// Straight leg onto the loiter circle around `center`, then an endless
/// clockwise orbit.
fn loiter_around(
    ctx: &ProgramContext,
    center: NedPosition,
) -> Result<SegmentProgram, SegmentError> {
    let r = ctx.loiter_radius;
    let speed = ctx.cruise_speed;

    // Entry and exit loci are diametrically opposed so the arc center
    // resolves to `center` regardless of arc rank.
    let entry = center.offset_ne(Vector2::new(r, 0.0));
    let exit = center.offset_ne(Vector2::new(-r, 0.0));

    SegmentProgram::from_slice(&[
        PathSegmentDescriptor::line(ctx.position, speed),
        PathSegmentDescriptor::line(entry, speed),
        PathSegmentDescriptor::arc(exit, 1.0 / r, ArcRank::Minor, HOLD_ORBITS, speed),
    ])
}
