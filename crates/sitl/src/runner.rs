//! Simulation runner
//!
//! Drives one [`PathManager`] in real tokio time against a simulated
//! vehicle:
//!
//! 1. poll the startup barrier every `FOLLOWER_POLL_MS` until the vehicle's
//!    path follower runs
//! 2. run path manager cycles on the drift-free schedule, sleeping with
//!    `sleep_until` on absolute wake times
//! 3. between cycles, step the vehicle along the active segment and replay
//!    the scenario's mode and setting timelines
//!
//! Under a paused tokio runtime the whole run is deterministic.

use std::future::Future;
use std::time::Instant as WallInstant;

use serde::Serialize;
use tokio::time::sleep_until;

use path_manager_core::geometry::NedPosition;
use path_manager_core::mode::{FlightMode, FlightModeResolver, ModeResolver, PlannerReadyResolver};
use path_manager_core::parameters::{default_store, ParameterStore};
use path_manager_core::segment::SegmentProgram;
use path_manager_core::task::{
    CycleIo, CycleStats, PathManager, SettingsNotifier, StartupBarrier, FOLLOWER_POLL_MS,
};
use path_manager_core::traits::{FollowerMonitor, ModeSource, PositionSource, TimeSource};

use crate::adapter::{FollowerCommand, KinematicConfig, KinematicVehicle, VehicleAdapter};
use crate::clock::TokioClock;
use crate::config::{ModeChange, ResolverKind, ScenarioConfig, SettingChange};
use crate::error::SitlError;
use crate::settings::SettingsHandle;
use crate::sinks::{AlarmLog, AlarmRecord, StatusLog, StatusRecord};

/// Mode signals as replayed from the scenario timeline
#[derive(Debug, Clone, Copy, Default)]
struct ScenarioModes {
    flight_mode: FlightMode,
    path_ready: bool,
}

impl ModeSource for ScenarioModes {
    fn flight_mode(&self) -> FlightMode {
        self.flight_mode
    }

    fn planner_path_ready(&self) -> bool {
        self.path_ready
    }
}

/// Vehicle position sampled once per cycle
struct SampledPosition(NedPosition);

impl PositionSource for SampledPosition {
    fn position(&self) -> NedPosition {
        self.0
    }
}

struct FollowerState(bool);

impl FollowerMonitor for FollowerState {
    fn follower_running(&self) -> bool {
        self.0
    }
}

/// Serializable copy of the task statistics
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatsRecord {
    pub cycle_count: u64,
    pub idle_cycles: u64,
    pub overruns: u32,
    pub avg_execution_us: u32,
    pub max_execution_us: u32,
}

impl From<&CycleStats> for StatsRecord {
    fn from(stats: &CycleStats) -> Self {
        Self {
            cycle_count: stats.cycle_count,
            idle_cycles: stats.idle_cycles,
            overruns: stats.overruns,
            avg_execution_us: stats.avg_execution_us,
            max_execution_us: stats.max_execution_us,
        }
    }
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub resolver: &'static str,
    pub adapter: String,
    /// Simulated time at which the startup barrier opened
    pub released_at_ms: u64,
    pub ended_at_ms: u64,
    /// Stopped by the shutdown signal before `duration_ms`
    pub interrupted: bool,
    pub final_mode: &'static str,
    pub final_position: [f32; 3],
    pub settings_reloads: u32,
    pub statuses: Vec<StatusRecord>,
    pub alarms: Vec<AlarmRecord>,
    pub stats: StatsRecord,
}

impl RunSummary {
    /// Last published status, if any
    pub fn last_status(&self) -> Option<&StatusRecord> {
        self.statuses.last()
    }
}

/// One scenario run
pub struct Runner<R: ModeResolver> {
    resolver: R,
    scenario: ScenarioConfig,
    vehicle: Box<dyn VehicleAdapter>,
    settings: SettingsHandle,
}

impl<R: ModeResolver> Runner<R> {
    /// Build a runner; scenario parameter overrides are applied here
    pub fn new(
        resolver: R,
        scenario: ScenarioConfig,
        vehicle: Box<dyn VehicleAdapter>,
    ) -> Result<Self, SitlError> {
        let mut store = default_store().map_err(|e| SitlError::parameter("defaults", e))?;
        scenario.apply_parameters(&mut store)?;
        Ok(Self {
            resolver,
            scenario,
            vehicle,
            settings: SettingsHandle::new(store),
        })
    }

    /// Handle for parameter writes during the run
    pub fn settings(&self) -> SettingsHandle {
        self.settings.clone()
    }

    /// Run until `duration_ms` of simulated time or until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<RunSummary, SitlError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let Self {
            resolver,
            scenario,
            mut vehicle,
            settings,
        } = self;
        let resolver_name = resolver.name();

        let clock = TokioClock::start();
        let duration_ms = scenario.duration_ms;
        let mut modes = ScenarioModes::default();
        let mut mode_timeline = sorted_mode_changes(&scenario.mode_changes);
        let mut setting_timeline = sorted_setting_changes(&scenario.setting_changes);
        let mut store = if resolver.loads_canned_programs() {
            SegmentProgram::new()
        } else {
            scenario.program()?
        };
        let mut status_log = StatusLog::new();
        let mut alarm_log = AlarmLog::new();
        let mut interrupted = false;
        let mut last_step_ms = 0;

        log::info!(
            "Running scenario '{}' with {} resolver on {} vehicle '{}'",
            scenario.name,
            resolver_name,
            vehicle.adapter_type(),
            vehicle.name()
        );

        // Startup barrier
        let mut barrier = StartupBarrier::new();
        let released_at_ms = loop {
            let now = clock.now_ms();
            step_vehicle(vehicle.as_mut(), now, &mut last_step_ms, None).await?;
            alarm_log.set_time(now);
            let follower = FollowerState(vehicle.follower_running(now));
            if barrier.poll(&follower, &mut alarm_log) {
                break now;
            }
            if now >= duration_ms {
                return Err(SitlError::Timeout("path follower"));
            }
            tokio::select! {
                _ = sleep_until(clock.instant_at(now + u64::from(FOLLOWER_POLL_MS))) => {}
                _ = &mut shutdown => return Err(SitlError::Timeout("path follower")),
            }
        };

        let mut settings_rx = settings.subscribe();
        let mut params: ParameterStore = settings_rx.borrow_and_update().clone();
        let notifier = SettingsNotifier::new();
        let mut settings_reloads = 0u32;
        let mut stats = CycleStats::default();
        let mut manager = PathManager::from_store(resolver, &params, released_at_ms)?;
        // Built from the current store already
        notifier.take();

        loop {
            let wake_ms = manager.schedule().next_wake_ms();
            if wake_ms >= duration_ms {
                break;
            }
            tokio::select! {
                _ = sleep_until(clock.instant_at(wake_ms)) => {}
                _ = &mut shutdown => {
                    log::info!("Shutdown requested");
                    interrupted = true;
                    break;
                }
            }
            let now = clock.now_ms();

            let command = if manager.mode().is_active() && manager.sequencer().is_activated() {
                Some(FollowerCommand {
                    previous: manager.sequencer().previous_locus().position,
                    segment: *manager.sequencer().current_segment(),
                })
            } else {
                None
            };
            step_vehicle(vehicle.as_mut(), now, &mut last_step_ms, command.as_ref()).await?;

            apply_mode_changes(&mut mode_timeline, now, &mut modes);
            for change in drain_due(&mut setting_timeline, now, |c| c.at_ms) {
                if let Err(e) = settings.set(&change.name, change.value) {
                    log::warn!("Setting change at {} ms rejected: {}", change.at_ms, e);
                }
            }

            if settings_rx.has_changed().unwrap_or(false) {
                params = settings_rx.borrow_and_update().clone();
                notifier.notify();
            }
            if manager.poll_settings(&notifier, &params) {
                settings_reloads += 1;
            }

            status_log.set_time(now);
            alarm_log.set_time(now);
            let position = SampledPosition(vehicle.position());
            let started = WallInstant::now();
            let report = manager.cycle(
                now,
                CycleIo {
                    position: &position,
                    modes: &modes,
                    store: &mut store,
                    status: &mut status_log,
                    alarm: &mut alarm_log,
                },
            );
            let execution_us = started.elapsed().as_micros().min(u128::from(u32::MAX)) as u32;
            stats.record(
                execution_us,
                now.saturating_sub(wake_ms),
                manager.schedule().period_ms(),
                report.is_idle(),
            );
            manager.schedule_mut().advance(report.is_idle());
        }

        let ended_at_ms = clock.now_ms();
        log::info!(
            "Scenario '{}' finished at {} ms after {} cycles ({} overruns)",
            scenario.name,
            ended_at_ms,
            stats.cycle_count,
            stats.overruns
        );

        let p = vehicle.position();
        Ok(RunSummary {
            scenario: scenario.name,
            resolver: resolver_name,
            adapter: vehicle.name().to_string(),
            released_at_ms,
            ended_at_ms,
            interrupted,
            final_mode: manager.mode().as_str(),
            final_position: [p.north, p.east, p.down],
            settings_reloads,
            statuses: status_log.into_records(),
            alarms: alarm_log.into_records(),
            stats: StatsRecord::from(&stats),
        })
    }
}

/// Advance the vehicle to `now_ms`
async fn step_vehicle(
    vehicle: &mut dyn VehicleAdapter,
    now_ms: u64,
    last_step_ms: &mut u64,
    command: Option<&FollowerCommand>,
) -> Result<(), SitlError> {
    let dt_s = now_ms.saturating_sub(*last_step_ms) as f32 / 1000.0;
    *last_step_ms = now_ms;
    if dt_s > 0.0 {
        vehicle.step(dt_s, command).await?;
    }
    Ok(())
}

/// Run `scenario` on a kinematic vehicle with the resolver it names
pub async fn run_scenario<F>(scenario: ScenarioConfig, shutdown: F) -> Result<RunSummary, SitlError>
where
    F: Future<Output = ()>,
{
    let vehicle = Box::new(KinematicVehicle::new(
        &scenario.name,
        KinematicConfig::from(&scenario.vehicle),
    ));
    match scenario.resolver {
        ResolverKind::FlightMode => {
            Runner::new(FlightModeResolver, scenario, vehicle)?
                .run(shutdown)
                .await
        }
        ResolverKind::PlannerReady => {
            Runner::new(PlannerReadyResolver, scenario, vehicle)?
                .run(shutdown)
                .await
        }
    }
}

fn sorted_mode_changes(changes: &[ModeChange]) -> Vec<ModeChange> {
    let mut sorted = changes.to_vec();
    sorted.sort_by_key(|c| c.at_ms);
    sorted.reverse();
    sorted
}

fn sorted_setting_changes(changes: &[SettingChange]) -> Vec<SettingChange> {
    let mut sorted = changes.to_vec();
    sorted.sort_by_key(|c| c.at_ms);
    sorted.reverse();
    sorted
}

/// Pop every entry due at `now_ms` from a timeline kept in reverse order
fn drain_due<T>(timeline: &mut Vec<T>, now_ms: u64, at_ms: impl Fn(&T) -> u64) -> Vec<T> {
    let mut due = Vec::new();
    while timeline.last().is_some_and(|c| at_ms(c) <= now_ms) {
        if let Some(change) = timeline.pop() {
            due.push(change);
        }
    }
    due
}

fn apply_mode_changes(timeline: &mut Vec<ModeChange>, now_ms: u64, modes: &mut ScenarioModes) {
    for change in drain_due(timeline, now_ms, |c| c.at_ms) {
        if let Some(mode) = change.flight_mode {
            modes.flight_mode = mode.into();
            log::info!("[{} ms] flight mode {:?}", now_ms, modes.flight_mode);
        }
        if let Some(ready) = change.path_ready {
            modes.path_ready = ready;
            log::info!("[{} ms] planner path ready: {}", now_ms, ready);
        }
    }
}
