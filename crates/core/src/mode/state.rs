//! Mode types
//!
//! `FlightMode` is the vehicle-level mode reported by the flight status;
//! `GuidanceMode` is what the path manager is doing about it.

/// Vehicle flight mode as seen by the path manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightMode {
    #[default]
    Manual,
    Stabilized,
    PositionHold,
    ReturnToHome,
    PathPlanner,
}

/// Guidance program driving the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuidanceMode {
    /// Path manager idle
    #[default]
    None,
    ReturnHome,
    HoldPosition,
    PathPlanner,
}

impl GuidanceMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, GuidanceMode::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GuidanceMode::None => "None",
            GuidanceMode::ReturnHome => "ReturnHome",
            GuidanceMode::HoldPosition => "HoldPosition",
            GuidanceMode::PathPlanner => "PathPlanner",
        }
    }
}
