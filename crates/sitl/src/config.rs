//! Scenario configuration
//!
//! A scenario is a JSON document describing one simulated flight: which
//! mode resolver the path manager uses, the segment program (for the
//! planner-ready variant), the mode timeline, parameter overrides and the
//! simulated vehicle.
//!
//! ```json
//! {
//!   "name": "square",
//!   "resolver": "planner_ready",
//!   "duration_ms": 60000,
//!   "segments": [
//!     { "locus": [0, 0, -50], "velocity": 12 },
//!     { "locus": [200, 0, -50], "velocity": 12 }
//!   ],
//!   "parameters": { "PM_SWITCH": 0, "ARSPD_CLIMB": 11.0 },
//!   "mode_changes": [ { "at_ms": 0, "path_ready": true } ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use path_manager_core::geometry::NedPosition;
use path_manager_core::mode::FlightMode;
use path_manager_core::parameters::{ParamValue, ParameterStore};
use path_manager_core::segment::{ArcRank, PathSegmentDescriptor, SegmentProgram, MAX_SEGMENTS};

use crate::error::SitlError;

/// Mode resolver variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Canned programs selected by flight mode
    #[default]
    FlightMode,
    /// Segments published by a planner, gated by the path-ready flag
    PlannerReady,
}

/// Flight mode as written in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightModeConfig {
    Manual,
    Stabilized,
    PositionHold,
    ReturnToHome,
    PathPlanner,
}

impl From<FlightModeConfig> for FlightMode {
    fn from(mode: FlightModeConfig) -> Self {
        match mode {
            FlightModeConfig::Manual => FlightMode::Manual,
            FlightModeConfig::Stabilized => FlightMode::Stabilized,
            FlightModeConfig::PositionHold => FlightMode::PositionHold,
            FlightModeConfig::ReturnToHome => FlightMode::ReturnToHome,
            FlightModeConfig::PathPlanner => FlightMode::PathPlanner,
        }
    }
}

/// Arc rank as written in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArcRankConfig {
    #[default]
    Minor,
    Major,
}

/// One segment descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Switching locus, north/east/down in meters
    pub locus: [f32; 3],
    #[serde(default)]
    pub curvature: f32,
    #[serde(default)]
    pub arc_rank: ArcRankConfig,
    #[serde(default)]
    pub orbits: u32,
    pub velocity: f32,
}

impl SegmentConfig {
    pub fn to_descriptor(&self) -> PathSegmentDescriptor {
        let [north, east, down] = self.locus;
        PathSegmentDescriptor::arc(
            NedPosition::new(north, east, down),
            self.curvature,
            match self.arc_rank {
                ArcRankConfig::Minor => ArcRank::Minor,
                ArcRankConfig::Major => ArcRank::Major,
            },
            self.orbits,
            self.velocity,
        )
    }
}

/// Mode signal change at a point in simulated time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChange {
    pub at_ms: u64,
    #[serde(default)]
    pub flight_mode: Option<FlightModeConfig>,
    #[serde(default)]
    pub path_ready: Option<bool>,
}

/// Parameter write at a point in simulated time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingChange {
    pub at_ms: u64,
    pub name: String,
    pub value: f64,
}

/// Simulated vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Initial position, north/east/down in meters
    pub start: [f32; 3],
    /// Initial heading in degrees (clockwise from north)
    pub heading_deg: f32,
    /// Ground speed in m/s
    pub speed: f32,
    /// Turn rate limit in degrees per second
    pub max_turn_rate_dps: f32,
    /// Follower considered running after this much simulated time
    pub follower_start_ms: u64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 0.0, -50.0],
            heading_deg: 0.0,
            speed: 12.0,
            max_turn_rate_dps: 30.0,
            follower_start_ms: 0,
        }
    }
}

/// Complete scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub resolver: ResolverKind,
    /// Simulated time after which the run stops
    pub duration_ms: u64,
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
    /// Parameter overrides applied before the run
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub mode_changes: Vec<ModeChange>,
    #[serde(default)]
    pub setting_changes: Vec<SettingChange>,
    #[serde(default)]
    pub vehicle: VehicleConfig,
}

fn default_name() -> String {
    "scenario".to_string()
}

impl ScenarioConfig {
    /// Load and validate a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SitlError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a scenario document
    pub fn from_json(text: &str) -> Result<Self, SitlError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SitlError> {
        if self.duration_ms == 0 {
            return Err(SitlError::InvalidScenario(
                "duration_ms must be positive".into(),
            ));
        }
        if self.segments.len() > MAX_SEGMENTS {
            return Err(SitlError::InvalidScenario(format!(
                "{} segments exceed the store capacity of {}",
                self.segments.len(),
                MAX_SEGMENTS
            )));
        }
        if self.resolver == ResolverKind::PlannerReady && self.segments.len() < 2 {
            return Err(SitlError::InvalidScenario(
                "planner_ready scenarios need an anchor and at least one segment".into(),
            ));
        }
        if self.vehicle.speed <= 0.0 || self.vehicle.max_turn_rate_dps <= 0.0 {
            return Err(SitlError::InvalidScenario(
                "vehicle speed and turn rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Segment program to publish before the run
    pub fn program(&self) -> Result<SegmentProgram, SitlError> {
        let mut program = SegmentProgram::new();
        for segment in &self.segments {
            program.push(segment.to_descriptor())?;
        }
        Ok(program)
    }

    /// Apply the parameter overrides to `store`
    pub fn apply_parameters(&self, store: &mut ParameterStore) -> Result<(), SitlError> {
        for (name, value) in &self.parameters {
            set_parameter(store, name, *value)?;
        }
        Ok(())
    }
}

/// Write `value` to `name`, converted to the registered type
pub fn set_parameter(store: &mut ParameterStore, name: &str, value: f64) -> Result<(), SitlError> {
    let typed = match store.get(name) {
        Some(ParamValue::Int(_)) => ParamValue::Int(value.round() as i32),
        Some(ParamValue::Float(_)) => ParamValue::Float(value as f32),
        Some(ParamValue::Bool(_)) => ParamValue::Bool(value != 0.0),
        None => {
            return Err(SitlError::parameter(
                name,
                path_manager_core::parameters::ParameterError::InvalidConfig,
            ))
        }
    };
    store
        .set(name, typed)
        .map_err(|e| SitlError::parameter(name, e))
}
