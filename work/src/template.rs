//! The nonce-independent part of a block hash.

use sha2::{Digest, Sha256};

use aegis_types::BlockHash;

/// Hasher state primed with every hashed block field except the nonce.
///
/// Cloning the primed state per attempt avoids rehashing the (possibly
/// large) serialized transaction list for every nonce.
#[derive(Clone)]
pub struct WorkTemplate {
    primed: Sha256,
}

impl WorkTemplate {
    pub fn new(prefix: &[u8]) -> Self {
        let mut primed = Sha256::new();
        primed.update(prefix);
        Self { primed }
    }

    /// Hash of the template completed with `nonce` in decimal.
    pub fn hash(&self, nonce: u64) -> BlockHash {
        let mut hasher = self.primed.clone();
        hasher.update(nonce.to_string().as_bytes());
        BlockHash::new(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_appends_decimal_nonce() {
        let template = WorkTemplate::new(b"0100genesis");
        let expected: [u8; 32] = Sha256::digest(b"0100genesis42").into();
        assert_eq!(template.hash(42), BlockHash::new(expected));
    }

    #[test]
    fn template_is_reusable() {
        let template = WorkTemplate::new(b"prefix");
        assert_eq!(template.hash(7), template.hash(7));
        assert_ne!(template.hash(7), template.hash(8));
    }
}
