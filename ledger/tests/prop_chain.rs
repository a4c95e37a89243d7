use proptest::prelude::*;

use aegis_ledger::LedgerStore;
use aegis_transactions::{SecurityTransaction, TransactionDraft};
use aegis_types::{Priority, Timestamp, TransactionId, TransactionType};
use aegis_work::{meets_difficulty, WorkGenerator};

fn tx(batch: usize, n: usize) -> SecurityTransaction {
    let draft = TransactionDraft::new(
        TransactionType::DataIntegrity,
        serde_json::json!({ "batch": batch, "n": n }),
        "fim",
        Priority::Low,
    );
    SecurityTransaction::from_draft(draft, TransactionId::new(&format!("{batch}-{n}")), Timestamp::new(1)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every chain built by mining and appending verifies: links hold, stored
    /// hashes recompute, and each non-genesis hash meets the difficulty.
    #[test]
    fn mined_chains_verify(batches in prop::collection::vec(1usize..5, 1..6), difficulty in 0u32..3) {
        let mut store = LedgerStore::new(Timestamp::new(100), difficulty).unwrap();
        let mut expected_txs = 0;
        for (b, size) in batches.iter().enumerate() {
            let txs = (0..*size).map(|n| tx(b, n)).collect();
            let candidate = store.next_candidate(Timestamp::new(200 + b as u64), txs, "node-001".into());
            let solution = WorkGenerator::default().generate(&candidate.work_template().unwrap(), difficulty).unwrap();
            store.append(candidate.seal(solution)).unwrap();
            expected_txs += size;
        }

        prop_assert!(store.verify_chain().is_ok());
        prop_assert_eq!(store.height(), batches.len() + 1);
        prop_assert_eq!(store.total_transactions(), expected_txs);
        for pair in store.blocks().windows(2) {
            prop_assert_eq!(pair[1].previous_hash, pair[0].hash);
            prop_assert_eq!(pair[1].compute_hash().unwrap(), pair[1].hash);
            prop_assert!(meets_difficulty(&pair[1].hash, difficulty));
        }
    }
}
