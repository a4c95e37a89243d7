//! Security-event transactions and the pool that buffers them.
//!
//! A transaction is created from a [`TransactionDraft`] on submission,
//! waits `pending` in the [`TransactionPool`] and is decided exactly once
//! by a consensus cycle, ending `validated` or `rejected`.

pub mod error;
pub mod pool;
pub mod transaction;
pub mod validation;

pub use error::TransactionError;
pub use pool::TransactionPool;
pub use transaction::{new_transaction_id, SecurityTransaction, TransactionDraft};
pub use validation::{validate_draft, MAX_PAYLOAD_BYTES};
