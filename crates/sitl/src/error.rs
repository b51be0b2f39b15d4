use path_manager_core::parameters::ParameterError;
use path_manager_core::segment::SegmentError;
use path_manager_core::task::ConfigError;

/// Errors that can occur while loading or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SitlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Parameter {name}: {source_error}")]
    Parameter {
        name: String,
        source_error: ParameterError,
    },

    #[error("Segment program: {0}")]
    Segment(SegmentError),

    #[error("Task configuration: {0}")]
    Config(ConfigError),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Timeout waiting for {0}")]
    Timeout(&'static str),
}

impl From<SegmentError> for SitlError {
    fn from(e: SegmentError) -> Self {
        Self::Segment(e)
    }
}

impl From<ConfigError> for SitlError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl SitlError {
    pub fn parameter(name: &str, error: ParameterError) -> Self {
        Self::Parameter {
            name: name.to_string(),
            source_error: error,
        }
    }
}
