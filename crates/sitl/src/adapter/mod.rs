pub mod kinematic;

use async_trait::async_trait;

use path_manager_core::geometry::NedPosition;
use path_manager_core::segment::PathSegmentDescriptor;

pub use kinematic::{KinematicConfig, KinematicVehicle};

use crate::error::SitlError;

/// Segment the simulated path follower is asked to fly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerCommand {
    /// Start of the segment
    pub previous: NedPosition,
    pub segment: PathSegmentDescriptor,
}

/// Pluggable vehicle backend flying the active segment.
///
/// Implementations must be `Send + Sync` so they can be stored as
/// `Box<dyn VehicleAdapter>`.
#[async_trait]
pub trait VehicleAdapter: Send + Sync {
    /// Unique identifier for this adapter type (e.g., "kinematic").
    fn adapter_type(&self) -> &'static str;

    /// Human-readable name for this adapter instance.
    fn name(&self) -> &str;

    /// Advance the vehicle by `dt_s` seconds.
    ///
    /// With no command the vehicle keeps its heading.
    async fn step(&mut self, dt_s: f32, command: Option<&FollowerCommand>)
        -> Result<(), SitlError>;

    /// Current position in the local NED frame.
    fn position(&self) -> NedPosition;

    /// Whether the vehicle's path follower is running at `sim_time_ms`.
    fn follower_running(&self, sim_time_ms: u64) -> bool;
}
