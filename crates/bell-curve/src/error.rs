use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("Cannot build a distribution from zero scores")]
    Empty,

    #[error("Jitter fraction must be in (0, 0.5], got {0}")]
    InvalidJitter(f64),

    #[error("Invalid distribution options: {0}")]
    InvalidOptions(String),

    #[error("Density error: {0}")]
    Density(String),
}
