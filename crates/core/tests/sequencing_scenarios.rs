//! End-to-end sequencing scenarios driven through `PathManager::cycle`.

use libm::{cosf, sinf};
use path_manager_core::geometry::{
    circular_modulus_deg, measure_arc_rad, NedPosition, Vector2, DEG_TO_RAD, RAD_TO_DEG,
};
use path_manager_core::guidance::{overshot, ArcProgress, PathStatus, PreviousLocus};
use path_manager_core::mode::{FlightMode, ModeResolver, PlannerReadyResolver};
use path_manager_core::parameters::{AirspeedParams, PathManagerParams};
use path_manager_core::segment::{ArcRank, PathSegmentDescriptor, SegmentProgram};
use path_manager_core::task::{CycleIo, CycleReport, PathManager};
use path_manager_core::traits::{MockModeSource, MockPosition, RecordingAlarm, RecordingStatusSink};

const PERIOD_MS: u64 = 100;

struct Vehicle {
    position: MockPosition,
    modes: MockModeSource,
    store: SegmentProgram,
    status: RecordingStatusSink,
    alarm: RecordingAlarm,
}

impl Vehicle {
    fn with_program(program: &[PathSegmentDescriptor]) -> Self {
        Self {
            position: MockPosition::new(0.0, 0.0),
            modes: MockModeSource {
                flight_mode: FlightMode::Manual,
                path_ready: true,
            },
            store: SegmentProgram::from_slice(program).unwrap(),
            status: RecordingStatusSink::new(),
            alarm: RecordingAlarm::default(),
        }
    }

    fn cycle<R: ModeResolver>(&mut self, pm: &mut PathManager<R>, now_ms: u64) -> CycleReport {
        pm.cycle(
            now_ms,
            CycleIo {
                position: &self.position,
                modes: &self.modes,
                store: &mut self.store,
                status: &mut self.status,
                alarm: &mut self.alarm,
            },
        )
    }

    fn published_indices(&self) -> Vec<u16> {
        self.status
            .published
            .iter()
            .map(|s| s.active_segment)
            .collect()
    }
}

fn planner_manager() -> PathManager<PlannerReadyResolver> {
    PathManager::new(
        PlannerReadyResolver,
        PathManagerParams::default(),
        AirspeedParams::default(),
        0,
    )
    .unwrap()
}

fn line(north: f32, east: f32, velocity: f32) -> PathSegmentDescriptor {
    PathSegmentDescriptor::line(NedPosition::new(north, east, 0.0), velocity)
}

/// Anchor plus three straight segments with timeouts 12 s, 8 s and 20 s
fn three_leg_path() -> Vec<PathSegmentDescriptor> {
    vec![
        line(0.0, 0.0, 10.0),
        line(120.0, 0.0, 10.0),
        line(120.0, 80.0, 10.0),
        line(-80.0, 80.0, 10.0),
    ]
}

#[test]
fn goal_reached_before_timeout_advances_once() {
    let mut vehicle = Vehicle::with_program(&three_leg_path());
    let mut pm = planner_manager();

    let report = vehicle.cycle(&mut pm, 0);
    assert!(report.activated);
    assert_eq!(pm.sequencer().status().timeout_s, 12);

    // 15 m/s northbound reaches the end of segment 1 after 8 s
    let mut now = 0;
    while pm.sequencer().status().active_segment == 1 {
        now += PERIOD_MS;
        assert!(now < 12_000, "segment 1 should finish before its timeout");
        vehicle.position.set(now as f32 * 0.015, 0.0);
        vehicle.cycle(&mut pm, now);
    }

    assert_eq!(vehicle.published_indices(), vec![0, 1, 2]);
    assert!(vehicle.status.published.iter().all(|s| s.path_counter == 1));
    assert!(vehicle
        .status
        .published
        .iter()
        .all(|s| s.status == PathStatus::InProgress));
    assert_eq!(pm.sequencer().status().timeout_s, 8);
}

#[test]
fn goal_never_reached_times_out_on_segment_one() {
    let mut vehicle = Vehicle::with_program(&three_leg_path());
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);

    // 5 m/s covers only 60 m of the 120 m leg before the timeout
    let mut now = 0;
    while now < 12_500 {
        now += PERIOD_MS;
        vehicle.position.set(now as f32 * 0.005, 0.0);
        vehicle.cycle(&mut pm, now);
    }

    let status = pm.sequencer().status();
    assert_eq!(status.status, PathStatus::TimedOut);
    assert_eq!(status.active_segment, 1);
    assert_eq!(status.path_counter, 1);
    let timed_out = vehicle
        .status
        .published
        .iter()
        .filter(|s| s.status == PathStatus::TimedOut)
        .count();
    assert_eq!(timed_out, 1);
}

#[test]
fn final_segment_is_held_under_half_plane() {
    let mut vehicle = Vehicle::with_program(&[line(0.0, 0.0, 10.0), line(100.0, 0.0, 10.0)]);
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);

    for step in 1..=30 {
        vehicle.position.set(100.0 + step as f32, 0.0);
        let report = vehicle.cycle(&mut pm, step * PERIOD_MS);
        assert!(!report.advanced);
    }
    assert_eq!(pm.sequencer().status().active_segment, 1);
}

#[test]
fn arc_segment_completes_after_swept_angle() {
    // Clockwise quarter circle about (100, 50), entered heading north
    let center = Vector2::new(100.0, 50.0);
    let mut vehicle = Vehicle::with_program(&[
        line(0.0, 0.0, 10.0),
        line(100.0, 0.0, 10.0),
        PathSegmentDescriptor::arc(
            NedPosition::new(150.0, 50.0, 0.0),
            1.0 / 50.0,
            ArcRank::Minor,
            0,
            10.0,
        ),
        line(150.0, 200.0, 10.0),
    ]);
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);

    vehicle.position.set(100.5, 0.0);
    assert!(vehicle.cycle(&mut pm, 100).advanced);
    assert_eq!(pm.sequencer().status().active_segment, 2);
    assert!((pm.sequencer().progress().to_complete_deg() - 90.0).abs() < 0.01);

    let mut now = 100;
    for step in 1..=19 {
        let a = (-90.0 + step as f32 * 5.0) * DEG_TO_RAD;
        let p = center + Vector2::new(50.0 * cosf(a), 50.0 * sinf(a));
        vehicle.position.set(p.north, p.east);
        now += PERIOD_MS;
        vehicle.cycle(&mut pm, now);

        if step <= 17 {
            assert_eq!(pm.sequencer().status().active_segment, 2, "step {}", step);
        }
    }
    assert_eq!(pm.sequencer().status().active_segment, 3);
}

#[test]
fn drift_correction_bounds_error_after_128_updates() {
    let radius = 50.0;
    let on_circle = |deg: f32| {
        let a = deg * DEG_TO_RAD;
        Vector2::new(radius * cosf(a), radius * sinf(a))
    };
    let start = on_circle(0.0);
    let segment = PathSegmentDescriptor::arc(
        NedPosition::new(0.0, radius, 0.0),
        1.0 / radius,
        ArcRank::Minor,
        3,
        10.0,
    );
    let mut progress = ArcProgress::begin(start, &segment);

    let mut heading = 0.0;
    for _ in 0..128 {
        heading += 3.7;
        progress.update(on_circle(heading), 128);
    }

    let direct_deg = measure_arc_rad(start, on_circle(heading), Vector2::ZERO) * RAD_TO_DEG;
    let error = circular_modulus_deg(direct_deg - progress.completed_deg());
    assert!(error.abs() < 1e-3, "residual error {}", error);
    assert!((progress.completed_deg() - heading).abs() < 0.05);
}

#[test]
fn overshoot_fires_only_on_straight_segments() {
    let previous = PreviousLocus::default();
    let straight = line(100.0, 0.0, 10.0);
    let arc = PathSegmentDescriptor::arc(
        NedPosition::new(100.0, 0.0, 0.0),
        1.0 / 60.0,
        ArcRank::Major,
        0,
        10.0,
    );

    for north in [150.5_f32, 200.0, 1000.0] {
        let p = Vector2::new(north, -30.0);
        assert!(overshot(p, &previous, &straight, 50.0));
        assert!(!overshot(p, &previous, &arc, 50.0));
    }
    assert!(!overshot(Vector2::new(149.5, 0.0), &previous, &straight, 50.0));
}

/// Non-InProgress status codes in publication order
fn flags(vehicle: &Vehicle) -> Vec<PathStatus> {
    vehicle
        .status
        .published
        .iter()
        .map(|s| s.status)
        .filter(|s| *s != PathStatus::InProgress)
        .collect()
}

#[test]
fn overshoot_stays_flagged_past_the_timeout() {
    // Segment 1 has a 10 s budget and is never completed (last segment)
    let mut vehicle = Vehicle::with_program(&[line(0.0, 0.0, 10.0), line(100.0, 0.0, 10.0)]);
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);

    vehicle.position.set(50.0, 0.0);
    for tick in 1..=200 {
        let now = tick * PERIOD_MS;
        if now == 5_000 {
            // Well past the 50 m overshoot margin
            vehicle.position.set(400.0, 0.0);
        }
        vehicle.cycle(&mut pm, now);
    }

    assert_eq!(flags(&vehicle), vec![PathStatus::Overshoot]);
    assert_eq!(pm.sequencer().status().status, PathStatus::Overshoot);
    assert_eq!(pm.sequencer().status().active_segment, 1);
    assert_eq!(vehicle.alarm.raised, 1);
    assert!(vehicle.alarm.critical);
    // Activation (0), segment 1, overshoot
    assert_eq!(vehicle.status.count, 3);
}

#[test]
fn timed_out_segment_is_not_reflagged_as_overshoot() {
    let mut vehicle = Vehicle::with_program(&[line(0.0, 0.0, 10.0), line(100.0, 0.0, 10.0)]);
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);

    vehicle.position.set(50.0, 0.0);
    for tick in 1..=200 {
        let now = tick * PERIOD_MS;
        if now == 12_000 {
            vehicle.position.set(400.0, 0.0);
        }
        vehicle.cycle(&mut pm, now);
    }

    assert_eq!(flags(&vehicle), vec![PathStatus::TimedOut]);
    assert_eq!(pm.sequencer().status().status, PathStatus::TimedOut);
    assert_eq!(vehicle.alarm.raised, 0);
}

#[test]
fn reactivation_onto_anchor_only_program_starts_clean() {
    let mut vehicle = Vehicle::with_program(&[
        line(0.0, 0.0, 10.0),
        PathSegmentDescriptor::arc(
            NedPosition::new(100.0, 0.0, 0.0),
            1.0 / 50.0,
            ArcRank::Minor,
            5,
            10.0,
        ),
    ]);
    let mut pm = planner_manager();
    vehicle.cycle(&mut pm, 0);
    assert!(pm.sequencer().progress().arc_center().is_some());

    // Planner withdraws the path and republishes a single hold point
    vehicle.modes.path_ready = false;
    vehicle.cycle(&mut pm, 100);
    vehicle.store = SegmentProgram::from_slice(&[line(900.0, 900.0, 10.0)]).unwrap();
    vehicle.modes.path_ready = true;
    assert!(vehicle.cycle(&mut pm, 200).activated);

    let status = *pm.sequencer().status();
    assert_eq!(status.path_counter, 2);
    assert_eq!(status.active_segment, 0);
    assert_eq!(status.timeout_s, u16::MAX);
    assert!(pm.sequencer().progress().arc_center().is_none());

    // Holding the point neither times out nor accumulates arc angle
    for tick in 3..=100 {
        vehicle.position.set(50.0 + tick as f32, 0.0);
        vehicle.cycle(&mut pm, tick * PERIOD_MS);
    }
    assert_eq!(pm.sequencer().status().status, PathStatus::InProgress);
    assert_eq!(pm.sequencer().progress().completed_deg(), 0.0);
}
