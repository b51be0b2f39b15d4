//! Airspeed Parameter Definitions
//!
//! Reference airspeeds and the loiter radius used by canned segment
//! programs and by the distance-based tunables of the sequencer.
//!
//! # Parameters
//!
//! - `ARSPD_CLIMB` - Best-climb airspeed in m/s, reference for lead and margin distances
//! - `ARSPD_CRUISE` - Cruise airspeed in m/s, final velocity of canned segments
//! - `PM_LOIT_RAD` - Loiter circle radius of canned programs in meters

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_CLIMB: f32 = 10.0;
const DEFAULT_CRUISE: f32 = 12.0;
const DEFAULT_LOITER_RADIUS: f32 = 60.0;

const MIN_AIRSPEED: f32 = 0.0;
const MAX_AIRSPEED: f32 = 100.0;
const MIN_LOITER_RADIUS: f32 = 5.0;
const MAX_LOITER_RADIUS: f32 = 1000.0;

/// Airspeed parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirspeedParams {
    pub best_climb: f32,
    pub cruise: f32,
    pub loiter_radius: f32,
}

impl Default for AirspeedParams {
    fn default() -> Self {
        Self {
            best_climb: DEFAULT_CLIMB,
            cruise: DEFAULT_CRUISE,
            loiter_radius: DEFAULT_LOITER_RADIUS,
        }
    }
}

impl AirspeedParams {
    /// Register airspeed parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("ARSPD_CLIMB", ParamValue::Float(DEFAULT_CLIMB), ParamFlags::empty())?;
        store.register(
            "ARSPD_CRUISE",
            ParamValue::Float(DEFAULT_CRUISE),
            ParamFlags::empty(),
        )?;
        store.register(
            "PM_LOIT_RAD",
            ParamValue::Float(DEFAULT_LOITER_RADIUS),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load airspeed parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            best_climb: store.load_float("ARSPD_CLIMB", DEFAULT_CLIMB, MIN_AIRSPEED, MAX_AIRSPEED),
            cruise: store.load_float("ARSPD_CRUISE", DEFAULT_CRUISE, MIN_AIRSPEED, MAX_AIRSPEED),
            loiter_radius: store.load_float(
                "PM_LOIT_RAD",
                DEFAULT_LOITER_RADIUS,
                MIN_LOITER_RADIUS,
                MAX_LOITER_RADIUS,
            ),
        }
    }
}
