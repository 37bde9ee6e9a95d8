use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Invalid dimensions: {processes} processes x {resources} resources \
         (both must be at least 1)"
    )]
    InvalidDimensions { processes: usize, resources: usize },

    #[error("Dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value in {what} at index {index}: {value} (must be non-negative)")]
    InvalidValue {
        what: String,
        index: usize,
        value: i64,
    },

    #[error(
        "Inconsistent state: P{process} holds {allocated} of R{resource} \
         but declares max demand {max_demand}"
    )]
    InconsistentState {
        process: usize,
        resource: usize,
        allocated: u64,
        max_demand: u64,
    },

    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// True for failures caused by the shape or content of supplied matrices.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimensions { .. }
                | Error::DimensionMismatch { .. }
                | Error::InvalidValue { .. }
                | Error::InconsistentState { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
