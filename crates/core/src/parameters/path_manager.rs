//! Path Manager Parameter Definitions
//!
//! Defines the tunables of the guidance segment sequencer.
//!
//! # Parameters
//!
//! - `PM_SWITCH` - Goal detection strategy (0=half-plane, 1=threshold distance)
//! - `PM_HP_TIMING` - Half-plane lead time in seconds
//! - `PM_BBALL_DIST` - Threshold-distance switching radius in meters
//! - `PM_PROX_ANGLE` - Angular window before an arc's end where goal checks run (deg)
//! - `PM_TRIM_COUNT` - Progress updates between arc drift corrections
//! - `PM_OVS_MARGIN` - Overshoot margin in seconds of reference airspeed
//! - `PM_OVS_PERIOD` - Overshoot check period in milliseconds
//! - `PM_UPDATE_MS` - Nominal task period in milliseconds

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_SWITCH: i32 = 0;
const DEFAULT_HP_TIMING: f32 = 0.0;
const DEFAULT_BBALL_DIST: f32 = 10.0;
const DEFAULT_PROX_ANGLE: f32 = 30.0;
const DEFAULT_TRIM_COUNT: i32 = 128;
const DEFAULT_OVS_MARGIN: f32 = 5.0;
const DEFAULT_OVS_PERIOD: i32 = 1000;
const DEFAULT_UPDATE_MS: i32 = 100;

/// Longest nominal period the task supports
pub const MAX_UPDATE_MS: u32 = 200;

/// How the goal detector decides a segment is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchingStrategy {
    /// Vehicle crossed the plane at the end of the segment
    #[default]
    HalfPlane,
    /// Vehicle is within a fixed distance of the end locus
    ThresholdDistance,
}

impl SwitchingStrategy {
    fn from_index(index: i32) -> Self {
        match index {
            1 => SwitchingStrategy::ThresholdDistance,
            _ => SwitchingStrategy::HalfPlane,
        }
    }
}

/// Sequencer tunables loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathManagerParams {
    pub switching_strategy: SwitchingStrategy,
    /// Seconds of reference airspeed the half-plane is pulled back by
    pub half_plane_timing_s: f32,
    pub threshold_distance_m: f32,
    pub proximity_angle_deg: f32,
    pub trim_cadence: u32,
    pub overshoot_margin_s: f32,
    pub overshoot_period_ms: u32,
    pub update_period_ms: u32,
}

impl Default for PathManagerParams {
    fn default() -> Self {
        Self {
            switching_strategy: SwitchingStrategy::from_index(DEFAULT_SWITCH),
            half_plane_timing_s: DEFAULT_HP_TIMING,
            threshold_distance_m: DEFAULT_BBALL_DIST,
            proximity_angle_deg: DEFAULT_PROX_ANGLE,
            trim_cadence: DEFAULT_TRIM_COUNT as u32,
            overshoot_margin_s: DEFAULT_OVS_MARGIN,
            overshoot_period_ms: DEFAULT_OVS_PERIOD as u32,
            update_period_ms: DEFAULT_UPDATE_MS as u32,
        }
    }
}

impl PathManagerParams {
    /// Register path manager parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("PM_SWITCH", ParamValue::Int(DEFAULT_SWITCH), ParamFlags::empty())?;
        store.register(
            "PM_HP_TIMING",
            ParamValue::Float(DEFAULT_HP_TIMING),
            ParamFlags::empty(),
        )?;
        store.register(
            "PM_BBALL_DIST",
            ParamValue::Float(DEFAULT_BBALL_DIST),
            ParamFlags::empty(),
        )?;
        store.register(
            "PM_PROX_ANGLE",
            ParamValue::Float(DEFAULT_PROX_ANGLE),
            ParamFlags::empty(),
        )?;
        // Debug tunable, kept out of ground station listings
        store.register(
            "PM_TRIM_COUNT",
            ParamValue::Int(DEFAULT_TRIM_COUNT),
            ParamFlags::HIDDEN,
        )?;
        store.register(
            "PM_OVS_MARGIN",
            ParamValue::Float(DEFAULT_OVS_MARGIN),
            ParamFlags::empty(),
        )?;
        store.register(
            "PM_OVS_PERIOD",
            ParamValue::Int(DEFAULT_OVS_PERIOD),
            ParamFlags::empty(),
        )?;
        store.register(
            "PM_UPDATE_MS",
            ParamValue::Int(DEFAULT_UPDATE_MS),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load path manager parameters from parameter store
    ///
    /// Out-of-range values are clamped; missing values fall back to defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            switching_strategy: SwitchingStrategy::from_index(
                store.load_int("PM_SWITCH", DEFAULT_SWITCH, 0, 1),
            ),
            half_plane_timing_s: store.load_float("PM_HP_TIMING", DEFAULT_HP_TIMING, 0.0, 10.0),
            threshold_distance_m: store.load_float(
                "PM_BBALL_DIST",
                DEFAULT_BBALL_DIST,
                0.1,
                1000.0,
            ),
            proximity_angle_deg: store.load_float(
                "PM_PROX_ANGLE",
                DEFAULT_PROX_ANGLE,
                1.0,
                360.0,
            ),
            trim_cadence: store.load_int("PM_TRIM_COUNT", DEFAULT_TRIM_COUNT, 1, 10_000) as u32,
            overshoot_margin_s: store.load_float("PM_OVS_MARGIN", DEFAULT_OVS_MARGIN, 0.0, 60.0),
            overshoot_period_ms: store.load_int("PM_OVS_PERIOD", DEFAULT_OVS_PERIOD, 100, 60_000)
                as u32,
            update_period_ms: store.load_int(
                "PM_UPDATE_MS",
                DEFAULT_UPDATE_MS,
                1,
                MAX_UPDATE_MS as i32,
            ) as u32,
        }
    }
}
