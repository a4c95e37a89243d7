//! 32-byte digest types for transactions, blocks, Merkle roots and signatures.
//!
//! All digests serialize as lowercase hex strings so they read the same in
//! JSON responses, logs and hash preimages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AegisError;

macro_rules! define_digest {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            /// The all-zero sentinel value.
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Lowercase hex rendering (64 characters).
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Number of leading `'0'` characters in the hex rendering.
            pub fn leading_zero_hex_digits(&self) -> u32 {
                let mut count = 0;
                for byte in &self.0 {
                    if *byte == 0 {
                        count += 2;
                        continue;
                    }
                    if byte >> 4 == 0 {
                        count += 1;
                    }
                    break;
                }
                count
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}\u{2026})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = AegisError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s).map_err(|e| AegisError::InvalidDigest(e.to_string()))?;
                let array: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
                    AegisError::InvalidDigest(format!("expected 32 bytes, got {}", v.len()))
                })?;
                Ok(Self(array))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_digest!(
    /// Content hash of a security transaction's immutable payload fields.
    TxHash
);

define_digest!(
    /// Hash of a mined block. Genesis links to [`BlockHash::ZERO`].
    BlockHash
);

define_digest!(
    /// Root of the pairwise hash tree over a block's transaction hashes.
    /// An empty batch yields [`MerkleRoot::ZERO`].
    MerkleRoot
);

define_digest!(
    /// Hash commitment over a block's core fields. Not an asymmetric signature.
    BlockSignature
);

impl From<TxHash> for MerkleRoot {
    fn from(hash: TxHash) -> Self {
        Self(*hash.as_bytes())
    }
}
