//! Stateless checks on submitted drafts.

use crate::error::TransactionError;
use crate::transaction::TransactionDraft;

/// Upper bound on the serialized payload of one transaction.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Validate a draft before it enters the pool.
pub fn validate_draft(draft: &TransactionDraft) -> Result<(), TransactionError> {
    if draft.source.trim().is_empty() {
        return Err(TransactionError::EmptySource);
    }
    let size = serde_json::to_vec(&draft.payload)?.len();
    if size > MAX_PAYLOAD_BYTES {
        return Err(TransactionError::PayloadTooLarge {
            size,
            limit: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(())
}
