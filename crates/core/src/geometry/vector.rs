//! Planar and NED vector types
//!
//! Positions are expressed in a local North-East-Down frame (meters).
//! Guidance runs in the horizontal plane, so most math uses [`Vector2`]
//! (north, east); the down component only travels with segment loci.

use core::ops::{Add, Mul, Sub};

use libm::sqrtf;

/// Horizontal vector (north, east) in meters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub north: f32,
    pub east: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(north: f32, east: f32) -> Self {
        Self { north, east }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.north * other.north + self.east * other.east
    }

    /// Z component of the 3D cross product `self x other`.
    ///
    /// Positive when `other` lies clockwise of `self` seen from above
    /// (north rotating toward east).
    pub fn cross(self, other: Self) -> f32 {
        self.north * other.east - self.east * other.north
    }

    pub fn magnitude(self) -> f32 {
        sqrtf(self.dot(self))
    }

    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).magnitude()
    }

    /// Unit vector in the same direction, `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > f32::EPSILON {
            Some(self * (1.0 / mag))
        } else {
            None
        }
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.north + rhs.north, self.east + rhs.east)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.north - rhs.north, self.east - rhs.east)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.north * rhs, self.east * rhs)
    }
}

/// Position in the local NED frame (meters, down positive)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NedPosition {
    pub north: f32,
    pub east: f32,
    pub down: f32,
}

impl NedPosition {
    pub const fn new(north: f32, east: f32, down: f32) -> Self {
        Self { north, east, down }
    }

    /// Horizontal projection
    pub fn ne(&self) -> Vector2 {
        Vector2::new(self.north, self.east)
    }

    /// Same altitude, horizontally offset by `offset`
    pub fn offset_ne(&self, offset: Vector2) -> Self {
        Self::new(self.north + offset.north, self.east + offset.east, self.down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, -1.0);
        assert_eq!(a + b, Vector2::new(4.0, 3.0));
        assert_eq!(a - b, Vector2::new(2.0, 5.0));
        assert_eq!(a * 2.0, Vector2::new(6.0, 8.0));
        assert!((a.magnitude() - 5.0).abs() < 1e-6);
        assert!((a.dot(b) - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_cross_sign_is_clockwise_positive() {
        let north = Vector2::new(1.0, 0.0);
        let east = Vector2::new(0.0, 1.0);
        // North to east is a clockwise rotation seen from above
        assert!(north.cross(east) > 0.0);
        assert!(east.cross(north) < 0.0);
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert!(Vector2::ZERO.normalized().is_none());
        let unit = Vector2::new(0.0, 10.0).normalized().unwrap();
        assert!((unit.east - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ned_projection_and_offset() {
        let p = NedPosition::new(10.0, -5.0, -100.0);
        assert_eq!(p.ne(), Vector2::new(10.0, -5.0));
        let q = p.offset_ne(Vector2::new(1.0, 1.0));
        assert_eq!(q, NedPosition::new(11.0, -4.0, -100.0));
    }
}
