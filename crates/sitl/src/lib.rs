//! Software-in-the-loop runtime for the path manager
//!
//! Runs `path_manager_core`'s periodic task on tokio against a kinematic
//! vehicle, replaying a JSON scenario of mode and parameter changes.

pub mod adapter;
pub mod clock;
pub mod config;
pub mod error;
pub mod runner;
pub mod settings;
pub mod sinks;

pub use adapter::{FollowerCommand, KinematicConfig, KinematicVehicle, VehicleAdapter};
pub use clock::TokioClock;
pub use config::{ResolverKind, ScenarioConfig};
pub use error::SitlError;
pub use runner::{run_scenario, RunSummary, Runner};
pub use settings::SettingsHandle;
pub use sinks::{AlarmLog, AlarmRecord, StatusLog, StatusRecord};
