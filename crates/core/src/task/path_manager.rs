//! Path manager task body
//!
//! One [`PathManager`] owns all guidance state. The runtime calls
//! [`PathManager::cycle`] once per period with the collaborators bundled in
//! [`CycleIo`]; each cycle runs, in order:
//!
//! 1. mode dispatch (idle modes end the cycle here)
//! 2. path activation after a mode change
//! 3. arc progress integration
//! 4. goal check, proximity-gated
//! 5. advance, else (while the segment is unflagged) timeout check, else
//!    overshoot check when due

use crate::guidance::{
    GoalDetector, GoalInput, OvershootSupervisor, PathStatus, SegmentSequencer, TimeoutSupervisor,
};
use crate::mode::{GuidanceMode, ModeDispatcher, ModeResolver};
use crate::parameters::{AirspeedParams, ParameterStore, PathManagerParams};
use crate::segment::programs::ProgramContext;
use crate::segment::SegmentStore;
use crate::traits::{AlarmSink, ModeSource, PositionSource, StatusSink};
use crate::{log_error, log_info, log_warn};

use super::schedule::{ConfigError, PeriodicSchedule};
use super::settings::SettingsNotifier;

/// Collaborators sampled or written during one cycle
pub struct CycleIo<'a> {
    pub position: &'a dyn PositionSource,
    pub modes: &'a dyn ModeSource,
    pub store: &'a mut dyn SegmentStore,
    pub status: &'a mut dyn StatusSink,
    pub alarm: &'a mut dyn AlarmSink,
}

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub mode: GuidanceMode,
    pub mode_changed: bool,
    pub activated: bool,
    pub advanced: bool,
    pub timed_out: bool,
    pub overshoot: bool,
}

impl CycleReport {
    /// Guidance idle; the runtime sleeps the idle remainder
    pub fn is_idle(&self) -> bool {
        !self.mode.is_active()
    }
}

/// Guidance segment sequencer task state
pub struct PathManager<R: ModeResolver> {
    dispatcher: ModeDispatcher<R>,
    sequencer: SegmentSequencer,
    goal: GoalDetector,
    timeout: TimeoutSupervisor,
    overshoot: OvershootSupervisor,
    params: PathManagerParams,
    airspeed: AirspeedParams,
    schedule: PeriodicSchedule,
    /// Overshoot raised the alarm and nothing cleared it yet
    overshoot_alarm: bool,
}

impl<R: ModeResolver> PathManager<R> {
    /// Build with explicit settings; the schedule starts at `start_ms`
    pub fn new(
        resolver: R,
        params: PathManagerParams,
        airspeed: AirspeedParams,
        start_ms: u64,
    ) -> Result<Self, ConfigError> {
        log_info!("Path manager using {} resolver", resolver.name());
        Ok(Self {
            dispatcher: ModeDispatcher::new(resolver),
            sequencer: SegmentSequencer::new(),
            goal: GoalDetector::from_params(&params, &airspeed),
            timeout: TimeoutSupervisor,
            overshoot: OvershootSupervisor::from_params(&params, &airspeed),
            schedule: PeriodicSchedule::new(params.update_period_ms, start_ms)?,
            params,
            airspeed,
            overshoot_alarm: false,
        })
    }

    /// Build from the parameter store
    pub fn from_store(resolver: R, store: &ParameterStore, start_ms: u64) -> Result<Self, ConfigError> {
        Self::new(
            resolver,
            PathManagerParams::from_store(store),
            AirspeedParams::from_store(store),
            start_ms,
        )
    }

    pub fn sequencer(&self) -> &SegmentSequencer {
        &self.sequencer
    }

    pub fn mode(&self) -> GuidanceMode {
        self.dispatcher.mode()
    }

    pub fn params(&self) -> &PathManagerParams {
        &self.params
    }

    pub fn airspeed(&self) -> &AirspeedParams {
        &self.airspeed
    }

    pub fn schedule(&self) -> &PeriodicSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut PeriodicSchedule {
        &mut self.schedule
    }

    /// Re-read tunables if a change was notified; call at the top of a cycle
    pub fn poll_settings(&mut self, notifier: &SettingsNotifier, store: &ParameterStore) -> bool {
        if !notifier.take() {
            return false;
        }
        self.apply_settings(
            PathManagerParams::from_store(store),
            AirspeedParams::from_store(store),
        );
        true
    }

    /// Replace the tunables
    pub fn apply_settings(&mut self, params: PathManagerParams, airspeed: AirspeedParams) {
        if let Err(e) = self.schedule.set_period(params.update_period_ms) {
            log_error!("Keeping update period {} ms: {}", self.schedule.period_ms(), e);
        }
        self.goal = GoalDetector::from_params(&params, &airspeed);
        self.overshoot.reconfigure(&params, &airspeed);
        self.params = params;
        self.airspeed = airspeed;
        log_info!("Path manager settings reloaded");
    }

    /// Run one cycle at `now_ms`
    pub fn cycle(&mut self, now_ms: u64, io: CycleIo<'_>) -> CycleReport {
        let position = io.position.position();
        let ctx = ProgramContext {
            position,
            cruise_speed: self.airspeed.cruise,
            loiter_radius: self.airspeed.loiter_radius,
        };

        let update = self.dispatcher.update(io.modes, &mut *io.store, &ctx);
        let mut report = CycleReport {
            mode: update.mode,
            mode_changed: update.changed,
            ..CycleReport::default()
        };
        if update.changed {
            self.sequencer.request_activation();
        }
        if !update.mode.is_active() {
            return report;
        }

        if !self.sequencer.is_activated() {
            if self.overshoot_alarm {
                io.alarm.clear();
                self.overshoot_alarm = false;
            }
            self.sequencer.activate(&*io.store, now_ms, &mut *io.status);
            report.activated = true;
            return report;
        }

        let position = position.ne();
        self.sequencer
            .update_progress(position, self.params.trim_cadence);

        let status = *self.sequencer.status();
        let next = io.store.get(status.active_segment.wrapping_add(1));
        let goal_reached = self.goal.check(&GoalInput {
            position,
            previous: self.sequencer.previous_locus(),
            current: self.sequencer.current_segment(),
            next: next.as_ref(),
            progress: self.sequencer.progress(),
        });

        if goal_reached && self.sequencer.advance(&*io.store, now_ms, &mut *io.status) {
            report.advanced = true;
        } else if status.status != PathStatus::InProgress {
            // A flagged segment stays flagged until advance or activation
        } else if self
            .timeout
            .expired(&status, self.sequencer.segment_timer_ms(), now_ms)
        {
            log_warn!(
                "Segment {} timed out after {} s",
                status.active_segment,
                status.timeout_s
            );
            self.sequencer.set_status(PathStatus::TimedOut, &mut *io.status);
            report.timed_out = true;
        } else if self.overshoot.poll(
            now_ms,
            position,
            self.sequencer.previous_locus(),
            self.sequencer.current_segment(),
        ) {
            log_error!("Overshoot on segment {}", status.active_segment);
            self.sequencer.set_status(PathStatus::Overshoot, &mut *io.status);
            io.alarm.set_critical();
            self.overshoot_alarm = true;
            report.overshoot = true;
        }

        report
    }
}
