use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid {name} range [{min}, {max}): bounds must be finite with min < max")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("simulation count must be at least 1")]
    InvalidSimulationCount,

    #[error("bin width must be finite and positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("recognition threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("cannot aggregate an empty result table")]
    EmptyResultTable,

    #[error("failed to load parameter file {path}: {reason}")]
    ParameterFile { path: String, reason: String },
}

impl SimulationError {
    /// Configuration errors are fatal and raised before any trial is drawn.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, SimulationError::EmptyResultTable)
    }
}
