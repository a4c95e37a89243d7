//! Fundamental types for the Aegis simulated security ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! digests, identifiers, timestamps, network parameters, and state enums.
//!
//! Aegis is a *simulation*: validator nodes are in-process records, block
//! signatures are hash commitments, and proof-of-work carries no stake.

pub mod error;
pub mod hash;
pub mod ids;
pub mod params;
pub mod state;
pub mod time;

pub use error::AegisError;
pub use hash::{BlockHash, BlockSignature, MerkleRoot, TxHash};
pub use ids::{NodeId, TransactionId};
pub use params::NetworkParams;
pub use state::{NodeStatus, Priority, ThreatLevel, TransactionStatus, TransactionType, ValidatorType};
pub use time::{Clock, SystemClock, Timestamp};
