//! Consensus for security-event transactions.
//!
//! A simulated permissioned vote, not a BFT protocol:
//! - The [`ValidatorSelector`] picks up to seven active validators
//!   specialized for the transaction type.
//! - Each validator casts a [`Vote`] whose confidence blends its security
//!   score, reputation, specialization and a small random jitter.
//! - A transaction is valid when positive votes reach `ceil(0.67 * total)`.
//! - The [`ProposerSelector`] credits the next block to the strongest
//!   active node.
//!
//! ## Module overview
//!
//! - [`selector`]: Eligibility policy and validator ranking.
//! - [`vote`]: Per-validator vote confidence.
//! - [`quorum`]: Quorum rule, threat level and recommendation text.
//! - [`result`]: The per-transaction [`ConsensusResult`].
//! - [`engine`]: Concurrent voting rounds.
//! - [`proposer`]: Block proposer selection.
//! - [`error`]: Consensus error types.

pub mod engine;
pub mod error;
pub mod proposer;
pub mod quorum;
pub mod result;
pub mod selector;
pub mod vote;

pub use engine::{ConsensusEngine, Decision, REPUTATION_REWARD};
pub use error::ConsensusError;
pub use proposer::{ProposerSelector, SYSTEM_PROPOSER};
pub use quorum::{quorum_reached, recommendation, required_votes, threat_level};
pub use result::ConsensusResult;
pub use selector::{Eligibility, Selection, ValidatorSelector};
pub use vote::{vote_confidence, Vote, VOTE_THRESHOLD};
