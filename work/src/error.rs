use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("hash has {actual} leading zero hex digits, {required} required")]
    InsufficientDifficulty { actual: u32, required: u32 },

    #[error("difficulty {0} exceeds the 64 hex digits of a digest")]
    UnreachableDifficulty(u32),

    #[error("no nonce up to {max_nonce} meets difficulty {difficulty}")]
    NonceSpaceExhausted { max_nonce: u64, difficulty: u32 },
}
