//! Guidance mode dispatcher
//!
//! Samples the mode signal every cycle and reports transitions. On entering
//! a mode the dispatcher loads that mode's canned program into the segment
//! store, once, when the resolver asks for it.

use super::state::GuidanceMode;
use super::traits::ModeResolver;
use crate::segment::programs::{hold_position, racetrack, return_to_home, ProgramContext};
use crate::segment::{SegmentError, SegmentProgram, SegmentStore};
use crate::traits::ModeSource;
use crate::{log_error, log_info};

/// Result of one dispatcher update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeUpdate {
    pub mode: GuidanceMode,
    /// Mode differs from the previous cycle
    pub changed: bool,
}

/// Guidance mode dispatcher
pub struct ModeDispatcher<R: ModeResolver> {
    resolver: R,
    mode: GuidanceMode,
}

impl<R: ModeResolver> ModeDispatcher<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            mode: GuidanceMode::None,
        }
    }

    pub fn mode(&self) -> GuidanceMode {
        self.mode
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve this cycle's mode, loading a canned program on entry
    ///
    /// A program that fails to load is logged; the store keeps whatever it
    /// held before.
    pub fn update(
        &mut self,
        source: &dyn ModeSource,
        store: &mut dyn SegmentStore,
        ctx: &ProgramContext,
    ) -> ModeUpdate {
        let mode = self.resolver.resolve(source);
        if mode == self.mode {
            return ModeUpdate {
                mode,
                changed: false,
            };
        }

        log_info!(
            "Guidance mode {} -> {}",
            self.mode.as_str(),
            mode.as_str()
        );
        self.mode = mode;

        if self.resolver.loads_canned_programs() {
            if let Some(program) = canned_program(mode, ctx) {
                if let Err(e) = program.and_then(|p| store.replace(p.as_slice())) {
                    log_error!("Failed to load {} program: {}", mode.as_str(), e);
                }
            }
        }

        ModeUpdate {
            mode,
            changed: true,
        }
    }
}

/// Canned program for `mode`, `None` for modes without one
pub fn canned_program(
    mode: GuidanceMode,
    ctx: &ProgramContext,
) -> Option<Result<SegmentProgram, SegmentError>> {
    match mode {
        GuidanceMode::None => None,
        GuidanceMode::ReturnHome => Some(return_to_home(ctx)),
        GuidanceMode::HoldPosition => Some(hold_position(ctx)),
        GuidanceMode::PathPlanner => Some(racetrack(ctx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NedPosition;
    use crate::mode::{FlightMode, FlightModeResolver, PlannerReadyResolver};
    use crate::segment::PathSegmentDescriptor;
    use crate::traits::MockModeSource;

    fn ctx() -> ProgramContext {
        ProgramContext {
            position: NedPosition::new(200.0, -40.0, -50.0),
            cruise_speed: 12.0,
            loiter_radius: 60.0,
        }
    }

    fn planner_store() -> SegmentProgram {
        SegmentProgram::from_slice(&[
            PathSegmentDescriptor::line(NedPosition::new(0.0, 0.0, 0.0), 10.0),
            PathSegmentDescriptor::line(NedPosition::new(50.0, 0.0, 0.0), 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_change_loads_program_once() {
        let mut dispatcher = ModeDispatcher::new(FlightModeResolver);
        let mut store = SegmentProgram::new();
        let source = MockModeSource {
            flight_mode: FlightMode::ReturnToHome,
            path_ready: false,
        };

        let update = dispatcher.update(&source, &mut store, &ctx());
        assert!(update.changed);
        assert_eq!(update.mode, GuidanceMode::ReturnHome);
        assert_eq!(store.count(), 3);

        // A program replaced behind the dispatcher stays untouched
        store.clear();
        let update = dispatcher.update(&source, &mut store, &ctx());
        assert!(!update.changed);
        assert!(store.is_empty());
    }

    #[test]
    fn test_leaving_to_none_loads_nothing() {
        let mut dispatcher = ModeDispatcher::new(FlightModeResolver);
        let mut store = planner_store();
        let mut source = MockModeSource {
            flight_mode: FlightMode::PositionHold,
            path_ready: false,
        };
        dispatcher.update(&source, &mut store, &ctx());
        let loaded = store.as_slice().to_vec();

        source.flight_mode = FlightMode::Manual;
        let update = dispatcher.update(&source, &mut store, &ctx());
        assert!(update.changed);
        assert_eq!(update.mode, GuidanceMode::None);
        assert_eq!(store.as_slice(), &loaded[..]);
    }

    #[test]
    fn test_planner_resolver_keeps_store() {
        let mut dispatcher = ModeDispatcher::new(PlannerReadyResolver);
        let mut store = planner_store();
        let source = MockModeSource {
            flight_mode: FlightMode::ReturnToHome,
            path_ready: true,
        };
        let update = dispatcher.update(&source, &mut store, &ctx());
        assert!(update.changed);
        assert_eq!(update.mode, GuidanceMode::PathPlanner);
        assert_eq!(store.as_slice(), planner_store().as_slice());
    }

    #[test]
    fn test_canned_program_per_mode() {
        assert!(canned_program(GuidanceMode::None, &ctx()).is_none());
        for mode in [
            GuidanceMode::ReturnHome,
            GuidanceMode::HoldPosition,
            GuidanceMode::PathPlanner,
        ] {
            let program = canned_program(mode, &ctx()).unwrap().unwrap();
            assert_eq!(
                program.as_slice()[0].switching_locus,
                ctx().position,
                "{:?} must start at the vehicle",
                mode
            );
        }
    }
}
