//! Validator node registry.
//!
//! Owns the fixed pool of simulated validator nodes. Nodes are created once
//! at startup, mutated by the network tick (telemetry jitter, status flips,
//! reputation drift) and by consensus (bounded reputation rewards and
//! counters), and never removed.

pub mod error;
pub mod layout;
pub mod node;
pub mod registry;

pub use error::RegistryError;
pub use layout::RegistryLayout;
pub use node::{clamp_score, ValidatorNode};
pub use registry::{NodeRegistry, RegistrySummary};
