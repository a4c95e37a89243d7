use proptest::prelude::*;

use aegis_types::{BlockHash, MerkleRoot, Timestamp, TransactionStatus, TxHash};

fn any_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Validated),
        Just(TransactionStatus::Rejected),
    ]
}

proptest! {
    /// BlockHash::is_zero is true only for all-zero bytes.
    #[test]
    fn block_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = BlockHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Hex display parses back to the same digest.
    #[test]
    fn tx_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let parsed: TxHash = hash.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// Leading-zero count always matches the hex string's leading '0' run.
    #[test]
    fn leading_zero_digits_match_hex(bytes in prop::array::uniform32(0u8..=3)) {
        let hash = BlockHash::new(bytes);
        let expected = hash.to_hex().chars().take_while(|c| *c == '0').count() as u32;
        prop_assert_eq!(hash.leading_zero_hex_digits(), expected);
    }

    /// Converting a transaction hash into a Merkle root keeps the bytes.
    #[test]
    fn merkle_root_from_tx_hash(bytes in prop::array::uniform32(0u8..)) {
        let root = MerkleRoot::from(TxHash::new(bytes));
        prop_assert_eq!(root.as_bytes(), &bytes);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
        prop_assert_eq!(now.elapsed_since(t), 0);
    }

    /// No transition ever leaves a terminal status.
    #[test]
    fn terminal_statuses_never_move(from in any_status(), to in any_status()) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
        if from.can_transition_to(to) {
            prop_assert!(to.is_terminal());
        }
    }
}
