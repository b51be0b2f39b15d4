//! Kinematic point-mass vehicle with a built-in path follower.
//!
//! Flies at constant ground speed with a turn rate limit. Straight segments
//! are tracked by steering toward a point a fixed lookahead ahead of the
//! vehicle's projection on the segment; arcs by blending the circle tangent
//! with a radial correction. No external dependencies, deterministic.

use async_trait::async_trait;

use path_manager_core::geometry::{find_arc_center, NedPosition, Vector2};
use path_manager_core::segment::ArcRank;

use crate::adapter::{FollowerCommand, VehicleAdapter};
use crate::config::VehicleConfig;
use crate::error::SitlError;

/// Configuration for the kinematic vehicle.
#[derive(Debug, Clone)]
pub struct KinematicConfig {
    pub start: NedPosition,
    /// Initial heading in radians, clockwise from north.
    pub heading_rad: f32,
    /// Ground speed in m/s.
    pub speed: f32,
    /// Maximum turn rate in rad/s.
    pub max_turn_rate: f32,
    /// Lookahead distance of the line follower in meters.
    pub lookahead_m: f32,
    /// Follower reported running after this much simulated time.
    pub follower_start_ms: u64,
}

impl Default for KinematicConfig {
    fn default() -> Self {
        Self::from(&VehicleConfig::default())
    }
}

impl From<&VehicleConfig> for KinematicConfig {
    fn from(config: &VehicleConfig) -> Self {
        let [north, east, down] = config.start;
        Self {
            start: NedPosition::new(north, east, down),
            heading_rad: config.heading_deg.to_radians(),
            speed: config.speed,
            max_turn_rate: config.max_turn_rate_dps.to_radians(),
            lookahead_m: 2.0 * config.speed,
            follower_start_ms: config.follower_start_ms,
        }
    }
}

/// Kinematic vehicle adapter.
pub struct KinematicVehicle {
    config: KinematicConfig,
    name: String,
    position: NedPosition,
    heading: f32,
}

impl KinematicVehicle {
    pub fn new(name: &str, config: KinematicConfig) -> Self {
        Self {
            name: name.to_string(),
            position: config.start,
            heading: config.heading_rad,
            config,
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new("kinematic", KinematicConfig::default())
    }

    /// Heading in radians, clockwise from north.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Direction the follower wants to fly for `command`.
    fn desired_direction(&self, command: &FollowerCommand) -> Option<Vector2> {
        let p = self.position.ne();
        let start = command.previous.ne();
        let end = command.segment.switching_locus.ne();

        if command.segment.is_arc() {
            let segment = &command.segment;
            let center = find_arc_center(
                start,
                end,
                segment.radius(),
                segment.is_clockwise(),
                segment.arc_rank == ArcRank::Minor,
            )
            .center();
            if let Some(center) = center {
                let radius = segment.radius().abs();
                let radial = p - center;
                let distance = radial.magnitude();
                let outward = radial.normalized()?;
                let tangent = if segment.is_clockwise() {
                    Vector2::new(-outward.east, outward.north)
                } else {
                    Vector2::new(outward.east, -outward.north)
                };
                let correction = ((radius - distance) / self.config.lookahead_m).clamp(-1.0, 1.0);
                return (tangent + outward * correction).normalized();
            }
            // No circle through the endpoints: head for the end
            return (end - p).normalized();
        }

        let Some(direction) = (end - start).normalized() else {
            return (end - p).normalized();
        };
        let along = (p - start).dot(direction);
        let carrot = start + direction * (along + self.config.lookahead_m);
        (carrot - p).normalized()
    }
}

fn wrap_pi(angle: f32) -> f32 {
    let mut a = angle % std::f32::consts::TAU;
    if a > std::f32::consts::PI {
        a -= std::f32::consts::TAU;
    } else if a < -std::f32::consts::PI {
        a += std::f32::consts::TAU;
    }
    a
}

#[async_trait]
impl VehicleAdapter for KinematicVehicle {
    fn adapter_type(&self) -> &'static str {
        "kinematic"
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn step(
        &mut self,
        dt_s: f32,
        command: Option<&FollowerCommand>,
    ) -> Result<(), SitlError> {
        if !dt_s.is_finite() || dt_s < 0.0 {
            return Err(SitlError::Adapter(format!("invalid time step {dt_s}")));
        }

        if let Some(desired) = command.and_then(|c| self.desired_direction(c)) {
            let target_heading = desired.east.atan2(desired.north);
            let error = wrap_pi(target_heading - self.heading);
            let max_delta = self.config.max_turn_rate * dt_s;
            self.heading = wrap_pi(self.heading + error.clamp(-max_delta, max_delta));
        }

        let distance = self.config.speed * dt_s;
        self.position = self.position.offset_ne(Vector2::new(
            distance * self.heading.cos(),
            distance * self.heading.sin(),
        ));
        Ok(())
    }

    fn position(&self) -> NedPosition {
        self.position
    }

    fn follower_running(&self, sim_time_ms: u64) -> bool {
        sim_time_ms >= self.config.follower_start_ms
    }
}
