//! Mode resolver trait definition
//!
//! A resolver maps the external mode signal to a [`GuidanceMode`]. The
//! variant is chosen when the path manager is built: a vehicle without a
//! planner uses [`FlightModeResolver`](super::FlightModeResolver) and flies
//! canned programs, a vehicle with one uses
//! [`PlannerReadyResolver`](super::PlannerReadyResolver).

use super::state::GuidanceMode;
use crate::traits::ModeSource;

/// Maps the sampled mode signal to a guidance mode
pub trait ModeResolver {
    /// Resolve the guidance mode for this cycle
    fn resolve(&self, source: &dyn ModeSource) -> GuidanceMode;

    /// Whether entering a mode loads that mode's canned program
    fn loads_canned_programs(&self) -> bool;

    /// Resolver name for logging
    fn name(&self) -> &'static str;
}

/// Flight mode driven resolver (no planner on board)
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightModeResolver;

impl ModeResolver for FlightModeResolver {
    fn resolve(&self, source: &dyn ModeSource) -> GuidanceMode {
        use super::state::FlightMode;

        match source.flight_mode() {
            FlightMode::ReturnToHome => GuidanceMode::ReturnHome,
            FlightMode::PositionHold => GuidanceMode::HoldPosition,
            FlightMode::PathPlanner => GuidanceMode::PathPlanner,
            _ => GuidanceMode::None,
        }
    }

    fn loads_canned_programs(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "flight-mode"
    }
}

/// Planner-ready flag driven resolver
///
/// The planner publishes the segments itself, so nothing is loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerReadyResolver;

impl ModeResolver for PlannerReadyResolver {
    fn resolve(&self, source: &dyn ModeSource) -> GuidanceMode {
        if source.planner_path_ready() {
            GuidanceMode::PathPlanner
        } else {
            GuidanceMode::None
        }
    }

    fn loads_canned_programs(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "planner-ready"
    }
}
