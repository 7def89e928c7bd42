use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config expects a {config}-dimensional grid, got {grid} dimensions")]
    DimensionMismatch { config: usize, grid: usize },

    #[error("invalid domain: {0}")]
    InvalidDomain(String),
}

impl From<validator::ValidationErrors> for GrainError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrainError>;
