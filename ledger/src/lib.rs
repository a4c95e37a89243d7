//! Append-only chain of security blocks.
//!
//! Block 0 is the genesis block, seeded directly without a work search.
//! Every later block carries a batch of validated transactions, links to
//! its predecessor by hash, and meets the proof-of-work difficulty. Blocks
//! are never modified or removed once appended.

pub mod block;
pub mod error;
pub mod genesis;
pub mod store;

pub use block::{BlockCandidate, SecurityBlock};
pub use error::LedgerError;
pub use genesis::{genesis_block, GENESIS_PROPOSER};
pub use store::LedgerStore;
