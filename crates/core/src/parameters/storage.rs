//! Parameter Storage Types
//!
//! Provides the `ParameterStore`: a fixed-capacity name/value map with
//! per-parameter flags and a change counter. Components read their settings
//! through `*Params::from_store` at a safe point of their own loop; writers
//! only bump the counter.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is hidden from ground station listings
        const HIDDEN = 0b00000001;
        /// Parameter is read-only (cannot be modified at runtime)
        const READ_ONLY = 0b00000010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Numeric view used by loaders that accept either representation
    pub fn as_f32(&self) -> f32 {
        match self {
            ParamValue::Bool(v) => *v as i32 as f32,
            ParamValue::Int(v) => *v as f32,
            ParamValue::Float(v) => *v,
        }
    }

    fn same_kind(&self, other: &ParamValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    /// Parameter flags
    pub flags: ParamFlags,
}

/// Parameter store for configuration management
#[derive(Clone)]
pub struct ParameterStore {
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    metadata: FnvIndexMap<String<PARAM_NAME_LEN>, ParamMetadata, MAX_PARAMS>,
    /// Incremented on every successful `set`
    generation: u32,
}

fn key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut key = String::<PARAM_NAME_LEN>::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
            generation: 0,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(&key(name).ok()?)
    }

    /// Set parameter value
    ///
    /// The parameter must already be registered with a value of the same type.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = key(name)?;

        let current = self
            .parameters
            .get(&key)
            .ok_or(ParameterError::InvalidConfig)?;
        if !current.same_kind(&value) {
            return Err(ParameterError::TypeMismatch);
        }

        if let Some(meta) = self.metadata.get(&key) {
            if meta.flags.contains(ParamFlags::READ_ONLY) {
                return Err(ParameterError::ReadOnly);
            }
        }

        self.parameters
            .insert(key, value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = key(name)?;

        if self.parameters.contains_key(&key) {
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(key, ParamMetadata { flags })
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Check if parameter is hidden
    pub fn is_hidden(&self, name: &str) -> bool {
        key(name)
            .ok()
            .and_then(|k| self.metadata.get(&k).map(|m| m.flags.contains(ParamFlags::HIDDEN)))
            .unwrap_or(false)
    }

    /// Iterate visible parameter names
    pub fn iter_names(&self) -> impl Iterator<Item = &String<PARAM_NAME_LEN>> {
        self.parameters
            .keys()
            .filter(move |name| !self.is_hidden(name.as_str()))
    }

    /// Change counter, bumped by every successful `set`
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Total parameter count (including hidden parameters)
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Read a float parameter clamped to `[min, max]`, `default` if absent
    pub fn load_float(&self, name: &str, default: f32, min: f32, max: f32) -> f32 {
        match self.get(name) {
            Some(value) => {
                let v = value.as_f32();
                if v.is_nan() {
                    default
                } else {
                    v.clamp(min, max)
                }
            }
            None => default,
        }
    }

    /// Read an integer parameter clamped to `[min, max]`, `default` if absent
    pub fn load_int(&self, name: &str, default: i32, min: i32, max: i32) -> i32 {
        match self.get(name) {
            Some(ParamValue::Int(v)) => (*v).clamp(min, max),
            Some(ParamValue::Float(v)) if !v.is_nan() => (*v as i32).clamp(min, max),
            Some(ParamValue::Bool(v)) => (*v as i32).clamp(min, max),
            _ => default,
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
