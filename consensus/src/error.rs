use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("no validators were assigned to transaction {0}")]
    NoValidators(String),

    #[error("validator selection bounds are invalid: min {min}, max {max}")]
    InvalidBounds { min: usize, max: usize },
}
