//! Block proof-of-work.
//!
//! A block hash is SHA-256 over the block's fields followed by the decimal
//! nonce. Mining searches nonces upward from zero until the hex rendering of
//! the hash starts with `difficulty` zero digits. The work carries no stake;
//! it only paces block production.

pub mod error;
pub mod generator;
pub mod template;
pub mod validator;

pub use error::WorkError;
pub use generator::WorkGenerator;
pub use template::WorkTemplate;
pub use validator::{meets_difficulty, validate_work, MAX_DIFFICULTY};

/// A nonce together with the hash it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkSolution {
    pub nonce: u64,
    pub hash: aegis_types::BlockHash,
}
