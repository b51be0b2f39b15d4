//! Parameter management types and utilities
//!
//! This module provides the runtime parameter store and the typed parameter
//! groups of the path manager. Persistence is handled outside the core.

pub mod airspeed;
pub mod error;
pub mod path_manager;
pub mod storage;

pub use airspeed::AirspeedParams;
pub use error::ParameterError;
pub use path_manager::{PathManagerParams, SwitchingStrategy, MAX_UPDATE_MS};
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};

/// Create a store with every path manager parameter registered
pub fn default_store() -> Result<ParameterStore, ParameterError> {
    let mut store = ParameterStore::new();
    PathManagerParams::register_defaults(&mut store)?;
    AirspeedParams::register_defaults(&mut store)?;
    Ok(store)
}
